mod extract;
mod form_tokens;
pub mod static_selector;
mod strip;

pub use extract::{extract_table, TABLE_START_MARKER};
pub use form_tokens::FormTokens;
pub use strip::strip_submission_column;
