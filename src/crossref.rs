use crate::models::{PromptCollection, PromptTask, Table, TASK_COLUMN};
use crate::table_view;
use crate::text::{humanize_area, normalize_text};

pub const PROMPT_NOT_AVAILABLE: &str = "Prompt not available for this task.";
const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalDetails {
    pub area: String,
    pub task: String,
    pub prompt: String,
}

/// Finds the prompt for a task of the area named `area_title`.
///
/// Exact normalized task match first, then containment either way. First hit in
/// document order wins, so overlapping task names resolve to the earlier entry.
pub fn find_prompt<'a>(
    prompts: &'a PromptCollection,
    area_title: &str,
    task_name: &str,
) -> Option<&'a PromptTask> {
    let wanted_area = normalize_text(area_title);
    let area = prompts
        .areas
        .iter()
        .find(|area| normalize_text(&humanize_area(&area.key)) == wanted_area)?;

    if task_name.is_empty() {
        return None;
    }
    let wanted = normalize_text(task_name);

    area.tasks
        .iter()
        .find(|item| normalize_text(&item.task) == wanted)
        .or_else(|| {
            area.tasks.iter().find(|item| {
                let candidate = normalize_text(&item.task);
                candidate.contains(&wanted) || wanted.contains(&candidate)
            })
        })
}

/// Area, task and prompt shown when a table row's automation link is opened.
pub fn modal_details(prompts: &PromptCollection, table: &Table, task_key: &str) -> ModalDetails {
    let task = table_view::find_row(table, task_key)
        .zip(table.column_index(TASK_COLUMN))
        .map(|(row, column)| table.cell_text(row, column))
        .unwrap_or_default();
    let matched = find_prompt(prompts, &table.title, &task);

    log::debug!(
        "modal for {:?} key {:?}: task {:?}, prompt found: {}",
        table.title,
        task_key,
        task,
        matched.is_some()
    );

    ModalDetails {
        area: non_empty_or_placeholder(&table.title),
        task: match matched {
            Some(prompt) => non_empty_or_placeholder(&prompt.task),
            None => non_empty_or_placeholder(&task),
        },
        prompt: matched
            .map(|p| p.copilot_prompt.clone())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PROMPT_NOT_AVAILABLE.to_string()),
    }
}

fn non_empty_or_placeholder(value: &str) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}
