use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::{PromptCollection, Table};
use crate::text;

const BUNDLED_TABLES: &str = include_str!("../data/tables.json");
const BUNDLED_PROMPTS: &str = include_str!("../data/prompts.json");

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {document} document: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("table {table_id} ({title}) row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        table_id: u32,
        title: String,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("area key `{0}` appears more than once")]
    DuplicateArea(String),
    #[error("table collection is empty")]
    NoTables,
}

/// The two read-only playbook documents, validated once at startup.
#[derive(Debug, Clone)]
pub struct DataStore {
    tables: Vec<Table>,
    prompts: PromptCollection,
}

impl DataStore {
    pub fn load(config: &Config) -> Result<Self, StoreError> {
        let tables = match &config.tables_path {
            Some(path) => read_document(path)?,
            None => BUNDLED_TABLES.to_string(),
        };
        let prompts = match &config.prompts_path {
            Some(path) => read_document(path)?,
            None => BUNDLED_PROMPTS.to_string(),
        };
        Self::from_json(&tables, &prompts)
    }

    pub fn from_json(tables: &str, prompts: &str) -> Result<Self, StoreError> {
        let by_id: BTreeMap<u32, Table> =
            serde_json::from_str(tables).map_err(|source| StoreError::Parse {
                document: "table collection",
                source,
            })?;
        let prompts: PromptCollection =
            serde_json::from_str(prompts).map_err(|source| StoreError::Parse {
                document: "prompt collection",
                source,
            })?;

        let tables: Vec<Table> = by_id
            .into_iter()
            .map(|(id, mut table)| {
                table.id = id;
                table
            })
            .collect();

        Self::new(tables, prompts)
    }

    pub fn new(tables: Vec<Table>, prompts: PromptCollection) -> Result<Self, StoreError> {
        if tables.is_empty() {
            return Err(StoreError::NoTables);
        }

        for table in &tables {
            let expected = table.columns.len();
            if let Some((row, cells)) = table
                .rows
                .iter()
                .enumerate()
                .find(|(_, cells)| cells.len() != expected)
            {
                return Err(StoreError::RaggedRow {
                    table_id: table.id,
                    title: table.title.clone(),
                    row: row + 1,
                    found: cells.len(),
                    expected,
                });
            }
        }

        let mut seen = HashSet::new();
        for area in &prompts.areas {
            if !seen.insert(area.key.as_str()) {
                return Err(StoreError::DuplicateArea(area.key.clone()));
            }
        }

        log::debug!(
            "loaded {} tables and {} prompt areas",
            tables.len(),
            prompts.areas.len()
        );

        Ok(DataStore { tables, prompts })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: u32) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn first_table(&self) -> &Table {
        &self.tables[0]
    }

    pub fn prompts(&self) -> &PromptCollection {
        &self.prompts
    }

    pub fn table_id_from_slug(&self, slug: &str) -> Option<u32> {
        self.tables
            .iter()
            .find(|t| text::slugify(&t.title) == slug)
            .map(|t| t.id)
    }

    /// Resolves a slug to a table, silently falling back to the first table.
    pub fn resolve_table(&self, slug: &str) -> &Table {
        self.table_id_from_slug(slug)
            .and_then(|id| self.table(id))
            .unwrap_or_else(|| self.first_table())
    }

    /// Closest table slug for a mistyped one, if any is close at all.
    pub fn suggest_slug(&self, input: &str) -> Option<String> {
        let matcher = SkimMatcherV2::default();
        self.tables
            .iter()
            .map(Table::slug)
            .filter_map(|slug| matcher.fuzzy_match(&slug, input).map(|score| (score, slug)))
            .max_by_key(|(score, _)| *score)
            .map(|(_, slug)| slug)
    }

    /// Position of a table in display order.
    pub fn position(&self, id: u32) -> usize {
        self.tables.iter().position(|t| t.id == id).unwrap_or(0)
    }
}

fn read_document(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
