//! Census table extraction from the hospital's HTML export.
//!
//! The export is a single HTML page with one large table holding every bed,
//! interleaved with `ESPECIALIDAD:` header rows, page banners and totals.
//! This module only turns that table into a rectangular grid of cleaned
//! text; deciding what each row means is the record builder's job.

use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Upper bounds from the HTML table model.
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// One table row of cleaned cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell text by column index; empty when the column does not exist.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The census table selected from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CensusTable {
    pub rows: Vec<RawRow>,
    /// Column count after span expansion; every row is padded to it.
    pub width: usize,
    /// Number of tables present in the document.
    pub tables_found: usize,
}

impl CensusTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse the document and return its census table.
///
/// The census table is the table with the most rows; on a tie the first one
/// in document order wins. Cell text has non-breaking spaces replaced,
/// whitespace collapsed and is trimmed; the first cell of every row is
/// upper-cased so header and noise matching is case-insensitive.
///
/// # Errors
///
/// [`IngestError::EmptyDocument`] for blank input, [`IngestError::NoTable`]
/// when no table has at least one row.
pub fn extract_census_table(html: &str) -> Result<CensusTable> {
    if html.trim().is_empty() {
        return Err(IngestError::EmptyDocument);
    }

    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;

    let mut tables_found = 0usize;
    let mut best: Option<Vec<Vec<String>>> = None;
    for table in document.select(&table_selector) {
        tables_found += 1;
        let grid = table_grid(table, &row_selector);
        debug!(table = tables_found, rows = grid.len(), "table parsed");
        if best.as_ref().is_none_or(|current| grid.len() > current.len()) {
            best = Some(grid);
        }
    }

    let grid = best.filter(|grid| !grid.is_empty()).ok_or(IngestError::NoTable)?;
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let rows = grid
        .into_iter()
        .map(|mut cells| {
            cells.resize(width, String::new());
            if let Some(first) = cells.first_mut() {
                *first = first.to_uppercase();
            }
            RawRow::new(cells)
        })
        .collect::<Vec<_>>();

    debug!(tables_found, rows = rows.len(), width, "census table selected");
    Ok(CensusTable {
        rows,
        width,
        tables_found,
    })
}

/// Read a census document from disk.
///
/// The export is usually UTF-8; older exports are Latin-1. Bytes that are
/// not valid UTF-8 are decoded as Latin-1 so accented headers survive.
pub fn read_census_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), "document is not UTF-8, decoding as Latin-1");
            err.into_bytes().iter().map(|&byte| char::from(byte)).collect()
        }
    };
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Normalize cell text: NBSP to space, collapse whitespace, trim.
pub fn normalize_cell(raw: &str) -> String {
    raw.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| IngestError::Selector {
        css: css.to_string(),
        message: err.to_string(),
    })
}

/// A cell still covering rows below the one that declared it.
#[derive(Debug, Clone)]
struct Carry {
    text: String,
    remaining: usize,
}

/// Expand one table into a grid, honoring `colspan` and `rowspan`.
///
/// Rows of nested tables are not part of this table's grid.
fn table_grid(table: ElementRef<'_>, row_selector: &Selector) -> Vec<Vec<String>> {
    let mut carry: Vec<Option<Carry>> = Vec::new();
    let mut grid = Vec::new();

    for row in table
        .select(row_selector)
        .filter(|row| owning_table(*row).is_some_and(|owner| owner.id() == table.id()))
    {
        let mut out: Vec<String> = Vec::new();
        let mut col = 0usize;

        for cell in row_cells(row) {
            take_carried(&mut carry, &mut out, &mut col);
            let text = normalize_cell(&cell.text().collect::<String>());
            let colspan = span(cell, "colspan", MAX_COLSPAN);
            let rowspan = span(cell, "rowspan", MAX_ROWSPAN);
            for _ in 0..colspan {
                if rowspan > 1 {
                    if carry.len() <= col {
                        carry.resize(col + 1, None);
                    }
                    carry[col] = Some(Carry {
                        text: text.clone(),
                        remaining: rowspan - 1,
                    });
                }
                out.push(text.clone());
                col += 1;
            }
        }

        // Spans from earlier rows may extend past this row's last cell.
        if let Some(last) = carry.iter().rposition(Option::is_some) {
            while col <= last {
                match carry[col].as_mut() {
                    Some(pending) => {
                        out.push(pending.text.clone());
                        pending.remaining -= 1;
                        if pending.remaining == 0 {
                            carry[col] = None;
                        }
                    }
                    None => out.push(String::new()),
                }
                col += 1;
            }
        }

        if !out.is_empty() {
            grid.push(out);
        }
    }
    grid
}

/// Fill `out` from spans carried down into the current position.
fn take_carried(carry: &mut [Option<Carry>], out: &mut Vec<String>, col: &mut usize) {
    while let Some(slot) = carry.get_mut(*col) {
        let Some(pending) = slot.as_mut() else {
            break;
        };
        out.push(pending.text.clone());
        pending.remaining -= 1;
        if pending.remaining == 0 {
            *slot = None;
        }
        *col += 1;
    }
}

fn row_cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
}

fn span(cell: ElementRef<'_>, attr: &str, max: usize) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(1)
        .min(max)
}

fn owning_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "table")
}
