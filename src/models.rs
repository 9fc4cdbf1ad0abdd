use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

use crate::text;

pub const TASK_ID_COLUMN: &str = "Task Id";
pub const TASK_COLUMN: &str = "Task";
pub const HOW_TO_COLUMN: &str = "How to Do?";
pub const AUTOMATION_COLUMN: &str = "Can it be done using Automation/Copilot?";
pub const AUTOMATION_YES: &str = "Yes";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl CellValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // Integral floats print without the fraction, so `1.0` keys as `1`.
            CellValue::Number(n) => match n.as_f64() {
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", v as i64),
                _ => write!(f, "{}", n),
            },
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    #[serde(skip)]
    pub id: u32,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn slug(&self) -> String {
        text::slugify(&self.title)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    /// Display text of a cell; null and out-of-range cells read as empty.
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.cell(row, column)
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptTask {
    pub task: String,
    #[serde(rename = "copilotPrompt")]
    pub copilot_prompt: String,
    #[serde(default)]
    pub area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptArea {
    pub key: String,
    pub tasks: Vec<PromptTask>,
}

impl PromptArea {
    pub fn label(&self) -> String {
        text::humanize_area(&self.key)
    }
}

/// Area-keyed prompt document, kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptCollection {
    pub areas: Vec<PromptArea>,
}

impl<'de> Deserialize<'de> for PromptCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AreasVisitor;

        impl<'de> Visitor<'de> for AreasVisitor {
            type Value = PromptCollection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of area keys to task lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut areas = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, tasks)) = map.next_entry::<String, Vec<PromptTask>>()? {
                    areas.push(PromptArea { key, tasks });
                }
                Ok(PromptCollection { areas })
            }
        }

        deserializer.deserialize_map(AreasVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatPrompt {
    pub id: usize,
    pub area_label: String,
    pub task: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Azure,
    Aiml,
    Frontend,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[Category::Azure, Category::Aiml, Category::Frontend]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Azure => "Azure BI",
            Category::Aiml => "AI & ML",
            Category::Frontend => "Front-End",
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn next(&self) -> Category {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> Category {
        let all = Self::all();
        let idx = self.index();
        all[if idx == 0 { all.len() - 1 } else { idx - 1 }]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LandingSection {
    pub table_id: u32,
    pub glyph: &'static str,
    pub description: &'static str,
    pub category: Category,
}

pub const LANDING_SECTIONS: &[LandingSection] = &[
    LandingSection {
        table_id: 1,
        glyph: "⌕",
        description: "Create inventory list, document ownership, and identify data sources for comprehensive analysis.",
        category: Category::Azure,
    },
    LandingSection {
        table_id: 2,
        glyph: "⇩",
        description: "Extract and load data from various sources into data platform efficiently.",
        category: Category::Azure,
    },
    LandingSection {
        table_id: 3,
        glyph: "⚙",
        description: "Transform and process raw data into structured, analytics-ready formats.",
        category: Category::Azure,
    },
    LandingSection {
        table_id: 4,
        glyph: "⇧",
        description: "Publish processed data to consumption layers for business intelligence use.",
        category: Category::Azure,
    },
    LandingSection {
        table_id: 5,
        glyph: "▤",
        description: "Build semantic models and curated datasets for advanced analytics and insights.",
        category: Category::Azure,
    },
    LandingSection {
        table_id: 6,
        glyph: "▦",
        description: "Create reports and dashboards to visualize data and drive business decisions.",
        category: Category::Azure,
    },
];
