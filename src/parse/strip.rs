use scraper::{ElementRef, Html};

use crate::static_selector;

const SUBMISSION_HEADER: &str = "Submission";
const SUBMISSION_STATUS_MARKER: &str = "lblSubmissionStatus";
/// Rows narrower than this are spacers or pagers and are left alone.
const MIN_ROW_CELLS: usize = 6;

static_selector!(TABLE_SELECTOR <- "table");
static_selector!(HEADER_SELECTOR <- "th");
static_selector!(ROW_SELECTOR <- "tr");
static_selector!(CELL_SELECTOR <- "th, td");

/// Removes the submission status column from the assignments table.
///
/// Every header cell mentioning "Submission" is dropped, then every row with at least
/// [`MIN_ROW_CELLS`] cells loses the first cell that renders a `lblSubmissionStatus` label.
/// Input without a `<table>` comes back untouched.
pub fn strip_submission_column(table_html: &str) -> String {
    let mut fragment = Html::parse_fragment(table_html);

    let Some(table) = fragment.select(&TABLE_SELECTOR).next() else {
        log::debug!("no table element in fragment, leaving it as is");
        return table_html.to_owned();
    };
    let table_id = table.id();

    let headers: Vec<_> = table
        .select(&HEADER_SELECTOR)
        .filter(|th| th.text().collect::<String>().contains(SUBMISSION_HEADER))
        .map(|th| th.id())
        .collect();
    for id in headers {
        if let Some(mut th) = fragment.tree.get_mut(id) {
            th.detach();
        }
    }

    let Some(table) = fragment.tree.get(table_id).and_then(ElementRef::wrap) else {
        return table_html.to_owned();
    };
    let status_cells: Vec<_> = table
        .select(&ROW_SELECTOR)
        .filter_map(|row| {
            let cells: Vec<_> = row.select(&CELL_SELECTOR).collect();
            if cells.len() < MIN_ROW_CELLS {
                return None;
            }
            cells
                .into_iter()
                .find(|cell| cell.html().contains(SUBMISSION_STATUS_MARKER))
                .map(|cell| cell.id())
        })
        .collect();
    for id in status_cells {
        if let Some(mut cell) = fragment.tree.get_mut(id) {
            cell.detach();
        }
    }

    fragment.root_element().inner_html()
}
