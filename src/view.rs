//! Screen selection and its shareable location encoding.

use std::fmt;
use url::form_urlencoded;

use crate::models::{Category, LandingSection, Table, LANDING_SECTIONS};
use crate::store::DataStore;

pub const ROOT_PATH: &str = "/";
pub const TABLE_DETAILS_PATH: &str = "/table-details";
pub const PROMPT_LIBRARY_PATH: &str = "/prompt-library";

/// Exactly one visible screen, with its modal payload where it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Landing { category: Category },
    Table { table_id: u32, modal: Option<String> },
    TaskCatalog,
    PromptLibrary,
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Landing {
            category: Category::default(),
        }
    }
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Landing { .. } => "Home",
            Screen::Table { .. } => "Playbook",
            Screen::TaskCatalog => "Task Catalog",
            Screen::PromptLibrary => "Prompts Library",
        }
    }

    pub fn from_location(store: &DataStore, location: &Location) -> Screen {
        match location.path.as_str() {
            TABLE_DETAILS_PATH => Screen::TaskCatalog,
            PROMPT_LIBRARY_PATH => Screen::PromptLibrary,
            _ => match location.table.as_deref() {
                None | Some("") => Screen::default(),
                Some(slug) => Screen::Table {
                    table_id: store.resolve_table(slug).id,
                    modal: location
                        .prompt
                        .then(|| location.task_id.clone().unwrap_or_default()),
                },
            },
        }
    }

    pub fn to_location(&self, store: &DataStore) -> Location {
        match self {
            Screen::Landing { .. } => Location::root(),
            Screen::TaskCatalog => Location::path(TABLE_DETAILS_PATH),
            Screen::PromptLibrary => Location::path(PROMPT_LIBRARY_PATH),
            Screen::Table { table_id, modal } => {
                let table = store.table(*table_id).unwrap_or_else(|| store.first_table());
                Location {
                    path: ROOT_PATH.to_string(),
                    table: Some(table.slug()),
                    prompt: modal.is_some(),
                    task_id: modal.clone(),
                }
            }
        }
    }

    pub fn open_table(table: &Table) -> Screen {
        Screen::Table {
            table_id: table.id,
            modal: None,
        }
    }
}

/// Route path plus the `table`, `prompt` and `taskId` query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub table: Option<String>,
    pub prompt: bool,
    pub task_id: Option<String>,
}

impl Location {
    pub fn root() -> Self {
        Location::path(ROOT_PATH)
    }

    pub fn path(path: &str) -> Self {
        Location {
            path: path.to_string(),
            table: None,
            prompt: false,
            task_id: None,
        }
    }

    /// Accepts a path with query (`/?table=assess`), a bare query, or a full URL.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (path, query) = match url::Url::parse(input) {
            Ok(url) => (url.path().to_string(), url.query().unwrap_or_default().to_string()),
            Err(_) => {
                let without_fragment = input.split('#').next().unwrap_or_default();
                match without_fragment.split_once('?') {
                    Some((path, query)) => (path.to_string(), query.to_string()),
                    None => (without_fragment.to_string(), String::new()),
                }
            }
        };

        let mut location = Location::path(&normalize_path(&path));
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "table" => location.table = Some(value.into_owned()),
                "prompt" => location.prompt = value == "true",
                "taskId" => location.task_id = Some(value.into_owned()),
                _ => {}
            }
        }
        location
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(table) = &self.table {
            query.append_pair("table", table);
        }
        if self.prompt {
            query.append_pair("prompt", "true");
        }
        if let Some(task_id) = &self.task_id {
            query.append_pair("taskId", task_id);
        }
        let query = query.finish();

        if query.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}?{}", self.path, query)
        }
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed {
        "" => ROOT_PATH.to_string(),
        TABLE_DETAILS_PATH | PROMPT_LIBRARY_PATH => trimmed.to_string(),
        other if !other.starts_with('/') => normalize_path(&format!("/{}", other)),
        _ => ROOT_PATH.to_string(),
    }
}

/// Landing cards for a category, skipping sections whose table is absent.
pub fn landing_cards(store: &DataStore, category: Category) -> Vec<(&'static LandingSection, &Table)> {
    LANDING_SECTIONS
        .iter()
        .filter(|section| section.category == category)
        .filter_map(|section| store.table(section.table_id).map(|table| (section, table)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_table_param_is_the_landing_page() {
        let store = fixtures::store();
        assert_eq!(Screen::from_location(&store, &Location::parse("/")), Screen::default());
        assert_eq!(Screen::from_location(&store, &Location::parse("")), Screen::default());
        assert_eq!(Screen::from_location(&store, &Location::parse("/?table=")), Screen::default());
        assert_eq!(
            Screen::from_location(&store, &Location::parse("/?table=&prompt=true&taskId=1")),
            Screen::default()
        );
    }

    #[test]
    fn table_param_resolves_slug_with_fallback() {
        let store = fixtures::store();
        assert_eq!(
            Screen::from_location(&store, &Location::parse("/?table=data-ingestion-prep")),
            Screen::Table { table_id: 2, modal: None }
        );
        assert_eq!(
            Screen::from_location(&store, &Location::parse("?table=unknown")),
            Screen::Table { table_id: 1, modal: None }
        );
    }

    #[test]
    fn prompt_and_task_id_open_the_modal() {
        let store = fixtures::store();
        let location = Location::parse("https://playbook.example/?table=assess&prompt=true&taskId=1");
        assert_eq!(
            Screen::from_location(&store, &location),
            Screen::Table { table_id: 1, modal: Some("1".to_string()) }
        );

        let location = Location::parse("/?table=assess&prompt=false&taskId=1");
        assert_eq!(
            Screen::from_location(&store, &location),
            Screen::Table { table_id: 1, modal: None }
        );
    }

    #[test]
    fn routes_select_library_screens() {
        let store = fixtures::store();
        assert_eq!(
            Screen::from_location(&store, &Location::parse("/prompt-library/")),
            Screen::PromptLibrary
        );
        assert_eq!(
            Screen::from_location(&store, &Location::parse("table-details")),
            Screen::TaskCatalog
        );
        assert_eq!(
            Screen::from_location(&store, &Location::parse("/elsewhere?table=assess")),
            Screen::Table { table_id: 1, modal: None }
        );
    }

    #[test]
    fn screens_round_trip_through_locations() {
        let store = fixtures::store();
        let screens = [
            Screen::default(),
            Screen::TaskCatalog,
            Screen::PromptLibrary,
            Screen::Table { table_id: 2, modal: None },
            Screen::Table { table_id: 1, modal: Some("3".to_string()) },
        ];
        for screen in screens {
            let encoded = screen.to_location(&store).to_string();
            assert_eq!(Screen::from_location(&store, &Location::parse(&encoded)), screen);
        }
    }

    #[test]
    fn location_encodes_query_parameters() {
        let store = fixtures::store();
        let screen = Screen::Table { table_id: 1, modal: Some("1".to_string()) };
        assert_eq!(
            screen.to_location(&store).to_string(),
            "/?table=assess&prompt=true&taskId=1"
        );
        assert_eq!(Screen::PromptLibrary.to_location(&store).to_string(), "/prompt-library");
    }

    #[test]
    fn landing_cards_skip_missing_tables() {
        let store = fixtures::store();
        let ids: Vec<u32> = landing_cards(&store, Category::Azure)
            .iter()
            .map(|(_, table)| table.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(landing_cards(&store, Category::Aiml).is_empty());
    }
}
