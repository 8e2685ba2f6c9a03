use scraper::Html;

use crate::static_selector;

/// ASP.NET hidden state the login form must echo back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormTokens {
    pub view_state: String,
    pub view_state_generator: String,
    pub event_validation: String,
}

impl FormTokens {
    /// Reads the hidden inputs from the login page. Missing inputs become empty strings;
    /// the portal decides whether it accepts the post without them.
    pub fn from_html(page: &str) -> Self {
        static_selector!(VIEW_STATE <- r#"input[name="__VIEWSTATE"]"#);
        static_selector!(VIEW_STATE_GENERATOR <- r#"input[name="__VIEWSTATEGENERATOR"]"#);
        static_selector!(EVENT_VALIDATION <- r#"input[name="__EVENTVALIDATION"]"#);

        let document = Html::parse_document(page);
        let value_of = |selector: &scraper::Selector| {
            document
                .select(selector)
                .next()
                .and_then(|input| input.attr("value"))
                .unwrap_or_default()
                .to_owned()
        };

        Self {
            view_state: value_of(&*VIEW_STATE),
            view_state_generator: value_of(&*VIEW_STATE_GENERATOR),
            event_validation: value_of(&*EVENT_VALIDATION),
        }
    }
}
