use crate::extract::{element_text, selector};
use scraper::{ElementRef, Html};
use serde::Serialize;

/// A table as a header row plus data rows
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Extracts all tables from a document
///
/// Rows are attributed to the nearest enclosing `<table>`, so nested tables
/// come out as separate tables. The header row is the first row when it sits
/// in `<thead>` or consists only of `<th>` cells; otherwise columns are named
/// by index (`"0"`, `"1"`, ...). Tables without data rows are skipped.
pub fn extract_tables(document: &Html) -> Vec<Table> {
    let (Some(table_sel), Some(row_sel)) = (selector("table"), selector("tr")) else {
        return Vec::new();
    };

    let mut tables = Vec::new();

    for table in document.select(&table_sel) {
        let rows: Vec<ElementRef<'_>> = table
            .select(&row_sel)
            .filter(|row| belongs_to(*row, table))
            .collect();

        if let Some(parsed) = build_table(&rows) {
            tables.push(parsed);
        }
    }

    tracing::debug!("Extracted {} tables", tables.len());
    tables
}

/// Whether `table` is the closest `<table>` ancestor of `row`
fn belongs_to(row: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    row.ancestors()
        .find(|node| {
            node.value()
                .as_element()
                .map_or(false, |el| el.name() == "table")
        })
        .map_or(false, |node| node.id() == table.id())
}

fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .collect()
}

fn is_header_row(row: ElementRef<'_>, cells: &[ElementRef<'_>]) -> bool {
    let in_thead = row
        .parent()
        .and_then(|p| p.value().as_element().map(|el| el.name() == "thead"))
        .unwrap_or(false);

    in_thead || (!cells.is_empty() && cells.iter().all(|c| c.value().name() == "th"))
}

fn build_table(rows: &[ElementRef<'_>]) -> Option<Table> {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    let mut headers: Option<Vec<String>> = None;

    for (index, row) in rows.iter().enumerate() {
        let row_cells = cells(*row);
        let texts: Vec<String> = row_cells.iter().map(|c| element_text(*c, " ")).collect();

        if index == 0 && is_header_row(*row, &row_cells) {
            headers = Some(texts);
        } else if !texts.is_empty() {
            grid.push(texts);
        }
    }

    if grid.is_empty() {
        return None;
    }

    let width = grid
        .iter()
        .map(Vec::len)
        .chain(headers.iter().map(Vec::len))
        .max()
        .unwrap_or(0);

    let mut headers = headers.unwrap_or_default();
    for column in headers.len()..width {
        headers.push(column.to_string());
    }

    for row in &mut grid {
        row.resize(width, String::new());
    }

    Some(Table {
        headers,
        rows: grid,
    })
}
