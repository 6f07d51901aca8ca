use std::sync::Arc;
use std::time::Duration;

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::{
    errors::AppResult,
    services::attempt_session::{AttemptSession, SessionView, SubmitOutcome, SubmitReason},
};

/// Owns a loaded session and the background task that ticks it.
///
/// User actions and ticks serialise on the session mutex. Autosave requests
/// are sent without holding it, so answering never waits on the network.
pub struct SessionRunner {
    session: Arc<Mutex<AttemptSession>>,
    ticker: Option<JoinHandle<()>>,
}

impl SessionRunner {
    pub fn start(session: AttemptSession, tick_interval: Duration) -> Self {
        let session = Arc::new(Mutex::new(session));
        let ticker = tokio::spawn(Self::tick_loop(Arc::clone(&session), tick_interval));

        Self {
            session,
            ticker: Some(ticker),
        }
    }

    async fn tick_loop(session: Arc<Mutex<AttemptSession>>, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let (due, repository, attempt_id) = {
                let mut guard = session.lock().await;
                if guard.state().is_terminal() {
                    break;
                }
                (
                    guard.take_due_autosave(),
                    guard.repository(),
                    guard.attempt_id().to_string(),
                )
            };

            if let Some(save) = due {
                let outcome = repository.save_progress(&attempt_id, &save.request).await;
                session.lock().await.finish_autosave(&save, outcome);
            }

            let mut guard = session.lock().await;
            if let Some(Err(e)) = guard.poll_timer().await {
                log::error!("Automatic submit of attempt {} failed: {}", attempt_id, e);
            }
            if guard.state().is_terminal() {
                break;
            }
        }
        log::debug!("Tick loop finished");
    }

    pub fn session(&self) -> Arc<Mutex<AttemptSession>> {
        Arc::clone(&self.session)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub async fn select_option(&self, question_id: &str, option_index: usize) -> AppResult<()> {
        self.session.lock().await.select_option(question_id, option_index)
    }

    pub async fn submit(&self, reason: SubmitReason) -> AppResult<SubmitOutcome> {
        self.session.lock().await.submit(reason).await
    }

    pub async fn view(&self) -> SessionView {
        self.session.lock().await.view()
    }

    /// Stops ticking and tears the session down.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.session.lock().await.teardown();
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}
