use std::{sync::Arc, time::Duration};

use chrono::Utc;
use futures_locks::{Mutex, RwLock};
use tokio::time::{sleep_until, Instant};
use tracing::instrument;

use crate::{
    cache::{Multithreaded, TableSnapshot, REFRESH_INTERVAL},
    error::{Error, Result},
    fetch::Portal,
    parse::{extract_table, strip_submission_column},
};

/// Runs refresh cycles against the portal, one at a time, and publishes the results.
pub struct Refresher {
    portal: Portal,
    cache: Arc<Multithreaded>,
    running: Mutex<()>,
    next_tick: RwLock<Option<Instant>>,
}

impl Refresher {
    pub fn new(portal: Portal, cache: Arc<Multithreaded>) -> Self {
        Self {
            portal,
            cache,
            running: Mutex::new(()),
            next_tick: RwLock::new(None),
        }
    }

    pub const fn cache(&self) -> &Arc<Multithreaded> {
        &self.cache
    }

    /// One login, fetch, extract, strip and publish cycle.
    ///
    /// Waits for any cycle already in flight. On error the cached snapshot is left as it
    /// was, so readers keep getting the last good table.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Arc<TableSnapshot>> {
        let _running = self.running.lock().await;

        let result = self.cycle().await;
        match &result {
            Ok(()) => log::info!("Assignments fetched and stored."),
            Err(Error::ExtractionEmpty) => log::warn!("No HTML table found."),
            Err(e) => log::error!("Error fetching assignments: {e}"),
        }
        result?;
        Ok(self.cache.get().await)
    }

    async fn cycle(&self) -> Result<()> {
        let session = self.portal.login().await?;
        let page = self.portal.fetch_assignments_page(session).await?;
        let table = extract_table(&page);
        if table.is_empty() {
            return Err(Error::ExtractionEmpty);
        }
        let html = strip_submission_column(table);
        self.cache.replace(TableSnapshot::new(html, Utc::now())).await;
        Ok(())
    }

    /// Time left until the timer fires, `None` while [`Refresher::run`] is not running.
    ///
    /// Follows the timer only: manual refreshes and failed cycles do not move it.
    pub async fn time_until_refresh(&self) -> Option<Duration> {
        self.next_tick
            .read()
            .await
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Refreshes every [`REFRESH_INTERVAL`], starting one interval from now.
    ///
    /// A cycle that overruns its slot pushes the schedule back instead of firing twice.
    pub async fn run(self: Arc<Self>) {
        let period = REFRESH_INTERVAL
            .to_std()
            .expect("refresh interval to be positive");
        let mut next = Instant::now() + period;
        loop {
            *self.next_tick.write().await = Some(next);
            sleep_until(next).await;
            log::debug!("Scheduled refresh");
            // failures are logged inside refresh and the stale table stays up
            let _res = self.refresh().await;

            next += period;
            let now = Instant::now();
            if next <= now {
                next = now + period;
            }
        }
    }
}
