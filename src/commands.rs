use anyhow::{bail, Result};
use std::io::Write;
use std::time::Instant;

use crate::clipboard::CopyText;
use crate::crossref;
use crate::library::{Numbering, PromptLibrary, EMPTY_STATE};
use crate::store::DataStore;
use crate::table_view::{self, GridCell};
use crate::view::Screen;

const ACTION_MARKER: &str = "[prompt ↗]";

pub fn list_tables(store: &DataStore, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Tables:")?;
    writeln!(out, "-------")?;
    for table in store.tables() {
        writeln!(out, "{} | {} | {}", table.id, table.slug(), table.title)?;
    }
    Ok(())
}

pub fn print_table(store: &DataStore, slug: &str, out: &mut impl Write) -> Result<()> {
    if store.table_id_from_slug(slug).is_none() {
        let fallback = store.first_table();
        log::warn!("no table with slug '{}', showing '{}'", slug, fallback.slug());
        if let Some(suggestion) = store.suggest_slug(slug) {
            eprintln!("'{}' not found. Did you mean '{}'?", slug, suggestion);
        }
    }

    let grid = table_view::project(store.resolve_table(slug));
    writeln!(out, "{}", grid.title)?;
    writeln!(out, "{}", "=".repeat(grid.title.chars().count()))?;
    writeln!(out, "{}", grid.headers.join(" | "))?;
    for row in &grid.rows {
        let cells: Vec<&str> = row
            .iter()
            .map(|cell| match cell {
                GridCell::Text(text) => text.as_str(),
                GridCell::Action { .. } => ACTION_MARKER,
            })
            .collect();
        writeln!(out, "{}", cells.join(" | "))?;
    }
    Ok(())
}

pub fn list_prompts(
    store: &DataStore,
    search: Option<&str>,
    area: &str,
    catalog: bool,
    out: &mut impl Write,
) -> Result<()> {
    let numbering = if catalog {
        Numbering::PerArea
    } else {
        Numbering::Sequential
    };
    let mut library = PromptLibrary::new(numbering);
    library.search(search.unwrap_or_default());
    library.filter_by_area(area);

    let visible = library.visible(store.prompts());
    if visible.is_empty() {
        writeln!(out, "{}", EMPTY_STATE)?;
        return Ok(());
    }
    for record in visible {
        writeln!(out, "{} | {} | {} | {}", record.id, record.task, record.area_label, record.prompt)?;
    }
    Ok(())
}

pub fn show_prompt(store: &DataStore, id: usize, out: &mut impl Write) -> Result<()> {
    let library = PromptLibrary::default();
    let Some(record) = library.records(store.prompts()).into_iter().find(|r| r.id == id) else {
        bail!("no prompt with id {}", id);
    };
    writeln!(out, "Area: {}", placeholder(&record.area_label))?;
    writeln!(out, "Task: {}", placeholder(&record.task))?;
    writeln!(out, "Prompt:")?;
    writeln!(out, "{}", placeholder(&record.prompt))?;
    Ok(())
}

pub fn copy_prompt(
    store: &DataStore,
    id: usize,
    clipboard: &mut impl CopyText,
    out: &mut impl Write,
) -> Result<()> {
    let mut library = PromptLibrary::default();
    let Some(record) = library.records(store.prompts()).into_iter().find(|r| r.id == id) else {
        bail!("no prompt with id {}", id);
    };
    library.copy_prompt(&record, clipboard, Instant::now());
    writeln!(out, "Copied prompt {} ({})", record.id, record.task)?;
    Ok(())
}

pub fn resolve(store: &DataStore, slug: &str, task_id: &str, out: &mut impl Write) -> Result<()> {
    let table = store.resolve_table(slug);
    let details = crossref::modal_details(store.prompts(), table, task_id);
    writeln!(out, "Area: {}", details.area)?;
    writeln!(out, "Task: {}", details.task)?;
    writeln!(out, "Prompt:")?;
    writeln!(out, "{}", details.prompt)?;
    Ok(())
}

pub fn link(store: &DataStore, slug: &str, task_id: Option<&str>, out: &mut impl Write) -> Result<()> {
    let screen = Screen::Table {
        table_id: store.resolve_table(slug).id,
        modal: task_id.map(str::to_string),
    };
    writeln!(out, "{}", screen.to_location(store))?;
    Ok(())
}

fn placeholder(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
