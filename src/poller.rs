//! Status-change detection loop
//!
//! Each iteration fetches the latest statuses, picks the newest submission,
//! renders its verdict and forwards it to the chat when the text differs from
//! the last message that was actually delivered. Iteration errors are
//! reported to the same chat once per distinct error.

use std::{future::Future, time::Duration};

use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    domain::{StatusResponse, validate_response},
    notifier::Notifier,
    result::PollError,
    verdict::{Catalog, Locale, render_verdict},
};

/// Source of homework status responses
pub trait StatusSource {
    /// Fetch every status change since `from_date` (unix seconds)
    fn fetch_status(
        &self,
        from_date: i64,
    ) -> impl Future<Output = Result<StatusResponse, PollError>> + Send;
}

/// State carried between iterations; lives only in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopState {
    /// Cursor sent as `from_date` on the next request
    pub timestamp: i64,
    /// Last status message the chat actually received
    pub last_notified_status: String,
    /// Last error reported to the chat
    pub last_error: Option<PollError>,
}

impl LoopState {
    pub fn new(timestamp: i64) -> Self {
        Self { timestamp, ..Default::default() }
    }
}

#[derive(Debug)]
pub struct HomeworkPoller<S, N> {
    source: S,
    notifier: N,
    catalog: &'static Catalog,
    retry_period: Duration,
    state: LoopState,
}

impl<S, N> HomeworkPoller<S, N>
where
    S: StatusSource,
    N: Notifier,
{
    /// Create a poller whose cursor starts at the current time
    pub fn new(source: S, notifier: N, locale: Locale, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            catalog: locale.catalog(),
            retry_period,
            state: LoopState::new(Utc::now().timestamp()),
        }
    }

    /// Replace the loop state, e.g. to start from a known cursor
    pub fn with_state(mut self, state: LoopState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Poll until `shutdown` resolves
    ///
    /// Errors never end the loop. `shutdown` is only observed while sleeping
    /// between iterations.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            retry_period = ?self.retry_period,
            from_date = self.state.timestamp,
            "Starting homework poller"
        );
        tokio::pin!(shutdown);

        loop {
            self.poll_once().await;

            tokio::select! {
                _ = sleep(self.retry_period) => {}
                _ = &mut shutdown => {
                    info!("Homework poller received shutdown signal");
                    break;
                }
            }
        }

        debug!("Homework poller loop ended");
    }

    /// Run one iteration, reporting any error to the chat
    pub async fn poll_once(&mut self) {
        if let Err(e) = self.check_statuses().await {
            self.report_error(e).await;
        }
    }

    /// Fetch, validate and forward the newest submission's verdict
    #[instrument(skip(self), fields(from_date = self.state.timestamp))]
    pub async fn check_statuses(&mut self) -> Result<(), PollError> {
        let response = self.source.fetch_status(self.state.timestamp).await?;
        let record = validate_response(&response)?;

        if let Some(current_date) = response.current_date() {
            self.state.timestamp = current_date;
        }

        let message = render_verdict(&record, self.catalog)?;
        self.notify_if_changed(message).await;
        Ok(())
    }

    /// Deliver `message` unless it is the one the chat already has
    ///
    /// Returns whether a delivery happened. A failed delivery leaves the
    /// stored status untouched so the next iteration tries again.
    pub async fn notify_if_changed(&mut self, message: String) -> bool {
        if message == self.state.last_notified_status {
            debug!("Homework status unchanged");
            return false;
        }

        if self.deliver(&message).await {
            self.state.last_notified_status = message;
            true
        } else {
            false
        }
    }

    /// Tell the operator about an iteration error unless it repeats the last one
    pub async fn report_error(&mut self, error: PollError) {
        error!(error = %error, "Program malfunction");

        if self.state.last_error.as_ref() == Some(&error) {
            debug!("Error already reported, not sending again");
            return;
        }

        let text = self.catalog.malfunction(&error);
        self.state.last_error = Some(error);
        self.deliver(&text).await;
    }

    async fn deliver(&self, text: &str) -> bool {
        match self.notifier.deliver(text).await {
            Ok(()) => {
                info!(message = text, "Message delivered to chat");
                true
            },
            Err(e) => {
                warn!(error = %e, "Failed to deliver message to chat");
                false
            },
        }
    }
}
