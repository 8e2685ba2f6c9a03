/// Opening tag of the course portal summary grid, exactly as the portal renders it.
pub const TABLE_START_MARKER: &str = r##"<table class="Grid" cellspacing="0" rules="all" bordercolor="#D8D8D8" border="1" id="ctl00_DataContent_gvPortalSummary""##;
const TABLE_END_MARKER: &str = "</table>";

/// Slices the assignments table out of the course portal page.
///
/// This is a plain substring search: the table starts at the first occurrence of
/// [`TABLE_START_MARKER`] and ends with the first `</table>` after it. Returns an empty
/// string if either end is missing.
pub fn extract_table(page: &str) -> &str {
    let Some(start) = page.find(TABLE_START_MARKER) else {
        return "";
    };
    let Some(len) = page[start..].find(TABLE_END_MARKER) else {
        return "";
    };
    &page[start..start + len + TABLE_END_MARKER.len()]
}
