mod multithreaded_cache;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;

pub use multithreaded_cache::MultithreadedCache as Multithreaded;

pub const REFRESH_INTERVAL: Duration = Duration::minutes(5);

/// Pakistan Standard Time, where the portal and its students are.
const PORTAL_UTC_OFFSET_SECS: i32 = 5 * 60 * 60;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S PKT";

/// The latest stripped assignments table and when it was captured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    html: String,
    last_updated: String,
    #[serde(skip)]
    cached_at: Option<DateTime<Utc>>,
}

impl TableSnapshot {
    pub fn new(html: String, cached_at: DateTime<Utc>) -> Self {
        Self {
            html,
            last_updated: render_timestamp(cached_at),
            cached_at: Some(cached_at),
        }
    }

    #[inline]
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[inline]
    #[must_use]
    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    #[cfg(test)]
    pub const fn is_empty(&self) -> bool {
        self.cached_at.is_none()
    }

    /// `None` until the first successful refresh.
    #[must_use]
    pub fn time_since_refresh(&self) -> Option<Duration> {
        self.cached_at
            .map(|cached_at| Utc::now().signed_duration_since(cached_at))
    }
}

fn render_timestamp(at: DateTime<Utc>) -> String {
    let offset =
        FixedOffset::east_opt(PORTAL_UTC_OFFSET_SECS).expect("portal utc offset should be in range");
    at.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string()
}
