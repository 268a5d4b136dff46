use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::adapters::backend::InspectionApi;
use crate::adapters::page::{LIVE_BODY_ID, LIVE_STATUS_ID, Page};
use crate::domain::inspection::parse_items;
use crate::domain::query::recent_query;
use crate::ui::messages;
use crate::ui::render::live_rows;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Active,
    Inactive { missing: &'static str },
}

impl Activation {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Rendered { rows: usize },
    Skipped,
    Failed(String),
}

/// One fetch-and-render cycle of the live table.
pub struct LiveFeed<P, A> {
    page: Arc<P>,
    api: Arc<A>,
}

impl<P, A> Clone for LiveFeed<P, A> {
    fn clone(&self) -> Self {
        Self {
            page: Arc::clone(&self.page),
            api: Arc::clone(&self.api),
        }
    }
}

impl<P, A> LiveFeed<P, A>
where
    P: Page,
    A: InspectionApi,
{
    pub fn new(page: Arc<P>, api: Arc<A>) -> Self {
        Self { page, api }
    }

    pub fn probe(&self) -> Activation {
        for id in [LIVE_STATUS_ID, LIVE_BODY_ID] {
            if !self.page.has_element(id) {
                return Activation::Inactive { missing: id };
            }
        }
        Activation::Active
    }

    /// Failures only touch the status line: the previous rows stay on screen
    /// and the next tick retries.
    pub async fn poll_once(&self) -> PollOutcome {
        if !self.probe().is_active() {
            return PollOutcome::Skipped;
        }

        self.page.set_text(LIVE_STATUS_ID, messages::LOADING);
        let query = recent_query(self.page.query());

        match self.api.recent(&query).await {
            Ok(body) => {
                let events = parse_items(&body);
                self.page.set_html(LIVE_BODY_ID, &live_rows(&events));
                self.page.set_text(LIVE_STATUS_ID, messages::OK);
                tracing::debug!(rows = events.len(), "live feed rendered");
                PollOutcome::Rendered { rows: events.len() }
            }
            Err(error) => {
                tracing::warn!(error = %error, "live poll cycle failed");
                self.page.set_text(LIVE_STATUS_ID, messages::LIVE_RETRYING);
                PollOutcome::Failed(error.to_string())
            }
        }
    }
}

/// Owns the recurring poll task. At most one task is alive per poller:
/// `start` cancels the previous task before scheduling a new one.
pub struct LivePoller<P, A> {
    feed: LiveFeed<P, A>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl<P, A> LivePoller<P, A>
where
    P: Page,
    A: InspectionApi,
{
    pub fn new(page: Arc<P>, api: Arc<A>, period: Duration) -> Self {
        Self {
            feed: LiveFeed::new(page, api),
            period: period.max(Duration::from_millis(1)),
            task: None,
        }
    }

    pub fn feed(&self) -> &LiveFeed<P, A> {
        &self.feed
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Polls immediately, then every `period`. Must be called from within a
    /// tokio runtime. Does nothing when the page has no live table.
    pub fn start(&mut self) -> Activation {
        let activation = self.feed.probe();
        if let Activation::Inactive { missing } = activation {
            tracing::debug!(missing, "live feed not present on page");
            return activation;
        }

        self.stop();

        let feed = self.feed.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                feed.poll_once().await;
            }
        }));

        tracing::info!(
            poll_interval_ms = period.as_millis() as u64,
            "live feed polling started"
        );
        Activation::Active
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("live feed polling stopped");
        }
    }

    pub fn restart(&mut self) -> Activation {
        self.stop();
        self.start()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl<P, A> Drop for LivePoller<P, A> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
