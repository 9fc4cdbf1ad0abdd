use std::time::Instant;

use crate::ack::CopiedFlag;
use crate::clipboard::CopyText;
use crate::models::{FlatPrompt, PromptCollection};
use crate::text;

pub const ALL_AREAS: &str = "All";
pub const EMPTY_STATE: &str = "No prompts found matching your criteria.";

/// How flattened records are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Numbering {
    /// One sequence across the whole document (prompt library).
    #[default]
    Sequential,
    /// Restarts at 1 in every area; labels prefer the entry's own `area` (task catalog).
    PerArea,
}

/// Expands area → tasks into one record per task, in document order.
pub fn flatten(doc: &PromptCollection, numbering: Numbering) -> Vec<FlatPrompt> {
    let mut records = Vec::new();

    for area in &doc.areas {
        let key_label = area.label();
        for (index, task) in area.tasks.iter().enumerate() {
            let (id, area_label) = match numbering {
                Numbering::Sequential => (records.len() + 1, key_label.clone()),
                Numbering::PerArea => (
                    index + 1,
                    task.area.clone().unwrap_or_else(|| key_label.clone()),
                ),
            };
            records.push(FlatPrompt {
                id,
                area_label,
                task: task.task.clone(),
                prompt: task.copilot_prompt.clone(),
            });
        }
    }

    records
}

pub fn matches_search(record: &FlatPrompt, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    record.prompt.to_lowercase().contains(&needle)
        || record.area_label.to_lowercase().contains(&needle)
        || record.task.to_lowercase().contains(&needle)
        || record.id.to_string().contains(&needle)
}

pub fn matches_area(record: &FlatPrompt, area: &str) -> bool {
    area == ALL_AREAS || text::normalize_text(&record.area_label) == text::normalize_text(area)
}

/// Search, filter and modal state of one library screen.
///
/// Holds no records: every query re-flattens the document it is given.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    numbering: Numbering,
    search: String,
    area: String,
    detail: Option<FlatPrompt>,
    copied: CopiedFlag<FlatPrompt>,
}

impl PromptLibrary {
    pub fn new(numbering: Numbering) -> Self {
        PromptLibrary {
            numbering,
            search: String::new(),
            area: ALL_AREAS.to_string(),
            detail: None,
            copied: CopiedFlag::default(),
        }
    }

    pub fn records(&self, doc: &PromptCollection) -> Vec<FlatPrompt> {
        flatten(doc, self.numbering)
    }

    /// Filter choices: `All` followed by each area label in first-seen order.
    pub fn areas(&self, doc: &PromptCollection) -> Vec<String> {
        let mut areas = vec![ALL_AREAS.to_string()];
        for record in self.records(doc) {
            if !areas.contains(&record.area_label) {
                areas.push(record.area_label);
            }
        }
        areas
    }

    pub fn search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
    }

    pub fn filter_by_area(&mut self, area: impl Into<String>) {
        self.area = area.into();
    }

    pub fn area_filter(&self) -> &str {
        &self.area
    }

    pub fn cycle_area(&mut self, doc: &PromptCollection, forward: bool) {
        let areas = self.areas(doc);
        let current = areas.iter().position(|a| *a == self.area).unwrap_or(0);
        let next = if forward {
            (current + 1) % areas.len()
        } else if current == 0 {
            areas.len() - 1
        } else {
            current - 1
        };
        self.area = areas[next].clone();
    }

    /// Records passing both the search and the area predicate, in document order.
    pub fn visible(&self, doc: &PromptCollection) -> Vec<FlatPrompt> {
        self.records(doc)
            .into_iter()
            .filter(|r| matches_search(r, &self.search) && matches_area(r, &self.area))
            .collect()
    }

    /// Opens the modal on this record. Ids repeat across areas under `PerArea`, so the whole record is kept.
    pub fn view_detail(&mut self, record: &FlatPrompt) {
        self.detail = Some(record.clone());
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.copied.clear();
    }

    pub fn detail(&self) -> Option<&FlatPrompt> {
        self.detail.as_ref()
    }

    pub fn copy_prompt(&mut self, record: &FlatPrompt, clipboard: &mut impl CopyText, now: Instant) {
        clipboard.copy(&record.prompt);
        self.copied.mark(record.clone(), now);
    }

    pub fn is_copied(&self, record: &FlatPrompt, now: Instant) -> bool {
        self.copied.is_set(record, now)
    }

    pub fn expire_copied(&mut self, now: Instant) -> bool {
        self.copied.expire(now)
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        PromptLibrary::new(Numbering::Sequential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ack::COPIED_WINDOW;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::store::fixtures;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::time::Duration;

    fn doc() -> PromptCollection {
        fixtures::store().prompts().clone()
    }

    #[test]
    fn flatten_assigns_sequential_ids_and_labels() {
        let records = flatten(&doc(), Numbering::Sequential);
        let summary: Vec<(usize, &str, &str)> = records
            .iter()
            .map(|r| (r.id, r.area_label.as_str(), r.task.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "Assess", "Inventory"),
                (2, "Assess", "Data Sources Identification"),
                (3, "Data Ingestion Prep", "Connector Setup"),
                (4, "Semantic Modeling", "DAX Measures"),
            ]
        );
    }

    #[test]
    fn per_area_numbering_restarts_and_prefers_entry_area() {
        let records = flatten(&doc(), Numbering::PerArea);
        let ids: Vec<usize> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 1, 1]);
        assert_eq!(records[2].area_label, "Data Ingestion");
        assert_eq!(records[3].area_label, "Semantic Modeling");
    }

    #[test]
    fn empty_search_and_all_areas_show_everything() {
        let library = PromptLibrary::default();
        assert_eq!(library.visible(&doc()), flatten(&doc(), Numbering::Sequential));
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut library = PromptLibrary::default();
        library.search("AZURE");
        let upper = library.visible(&doc());
        library.search("azure");
        let lower = library.visible(&doc());

        assert_eq!(upper, lower);
        let ids: Vec<usize> = upper.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn search_matches_ids_tasks_and_areas() {
        let mut library = PromptLibrary::default();
        library.search("3");
        assert_eq!(library.visible(&doc()).len(), 1);
        library.search("ingestion");
        assert_eq!(library.visible(&doc())[0].id, 3);
        library.search("connector");
        assert_eq!(library.visible(&doc())[0].id, 3);
        library.search("nothing like this");
        assert!(library.visible(&doc()).is_empty());
    }

    #[test]
    fn area_filter_uses_normalized_labels() {
        let mut library = PromptLibrary::default();
        library.filter_by_area("semantic   MODELING");
        let ids: Vec<usize> = library.visible(&doc()).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4]);

        library.search("inventory");
        assert!(library.visible(&doc()).is_empty());
    }

    #[test]
    fn areas_lists_all_then_first_seen_labels() {
        let library = PromptLibrary::default();
        assert_eq!(
            library.areas(&doc()),
            vec!["All", "Assess", "Data Ingestion Prep", "Semantic Modeling"]
        );
    }

    #[test]
    fn cycle_area_wraps() {
        let doc = doc();
        let mut library = PromptLibrary::default();
        library.cycle_area(&doc, false);
        assert_eq!(library.area_filter(), "Semantic Modeling");
        library.cycle_area(&doc, true);
        assert_eq!(library.area_filter(), ALL_AREAS);
    }

    #[test]
    fn copy_marks_only_that_record_for_the_window() {
        let doc = doc();
        let records = flatten(&doc, Numbering::Sequential);
        let mut library = PromptLibrary::default();
        let mut clipboard = RecordingClipboard::default();
        let start = Instant::now();

        library.view_detail(&records[0]);
        library.copy_prompt(&records[0], &mut clipboard, start);

        assert_eq!(clipboard.copied, vec![records[0].prompt.clone()]);
        assert!(library.is_copied(&records[0], start));
        assert!(!library.is_copied(&records[1], start));
        assert!(library.is_copied(&records[0], start + Duration::from_millis(1999)));
        assert!(!library.is_copied(&records[0], start + COPIED_WINDOW));
    }

    #[test]
    fn closing_detail_clears_copied_flag() {
        let doc = doc();
        let records = flatten(&doc, Numbering::Sequential);
        let mut library = PromptLibrary::default();
        let mut clipboard = RecordingClipboard::default();
        let now = Instant::now();

        library.view_detail(&records[1]);
        assert_eq!(library.detail().map(|r| r.id), Some(2));
        library.copy_prompt(&records[1], &mut clipboard, now);
        library.close_detail();

        assert_eq!(library.detail(), None);
        assert!(!library.is_copied(&records[1], now));
    }

    #[test]
    fn per_area_detail_keeps_the_chosen_area() {
        let doc = doc();
        let records = flatten(&doc, Numbering::PerArea);
        let connector = &records[2];
        assert_eq!((connector.id, connector.task.as_str()), (1, "Connector Setup"));

        let mut library = PromptLibrary::new(Numbering::PerArea);
        let mut clipboard = RecordingClipboard::default();
        let now = Instant::now();
        library.view_detail(connector);
        library.copy_prompt(connector, &mut clipboard, now);

        assert_eq!(library.detail(), Some(connector));
        assert_eq!(clipboard.copied, vec!["Write linked service JSON.".to_string()]);
        assert!(library.is_copied(connector, now));
        assert!(!library.is_copied(&records[0], now));
    }

    fn arb_doc() -> impl Strategy<Value = PromptCollection> {
        let task = ("[a-zA-Z ]{0,12}", "[a-zA-Z0-9 ]{0,24}").prop_map(|(task, prompt)| {
            crate::models::PromptTask { task, copilot_prompt: prompt, area: None }
        });
        prop::collection::vec(("[A-Z][a-z]{1,6}([A-Z][a-z]{1,6})?", prop::collection::vec(task, 0..4)), 0..5)
            .prop_map(|areas| PromptCollection {
                areas: areas
                    .into_iter()
                    .map(|(key, tasks)| crate::models::PromptArea { key, tasks })
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn flatten_is_stable_and_dense(doc in arb_doc()) {
            let first = flatten(&doc, Numbering::Sequential);
            let second = flatten(&doc, Numbering::Sequential);
            prop_assert_eq!(&first, &second);
            let ids: Vec<usize> = first.iter().map(|r| r.id).collect();
            let expected: Vec<usize> = (1..=first.len()).collect();
            prop_assert_eq!(ids, expected);
        }

        #[test]
        fn search_ignores_case(doc in arb_doc(), needle in "[a-zA-Z]{0,3}") {
            let mut library = PromptLibrary::default();
            library.search(needle.to_uppercase());
            let upper = library.visible(&doc);
            library.search(needle.to_lowercase());
            prop_assert_eq!(upper, library.visible(&doc));
        }
    }
}
