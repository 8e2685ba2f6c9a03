use std::sync::OnceLock;

use scraper::Selector;

/// A css selector compiled on first use and shared afterwards.
#[derive(Debug)]
pub(crate) struct StaticSelector {
    cell: OnceLock<Selector>,
    css: &'static str,
}

impl StaticSelector {
    pub(crate) const fn new(css: &'static str) -> Self {
        Self {
            cell: OnceLock::new(),
            css,
        }
    }
}

impl core::ops::Deref for StaticSelector {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        // selectors are literals in this crate, so a parse failure is a programming error
        self.cell.get_or_init(|| match Selector::parse(self.css) {
            Ok(sel) => sel,
            Err(e) => panic!("Error parsing static selector {}: {:?}", self.css, e),
        })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::static_selector::StaticSelector =
            $crate::parse::static_selector::StaticSelector::new($sel);
    };
}
