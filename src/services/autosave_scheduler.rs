use chrono::{DateTime, Duration, Utc};

use crate::models::{domain::AnswerMap, dto::request::SaveProgressRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Failed,
}

/// A frozen answer payload handed out for sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSave {
    pub generation: u64,
    pub request: SaveProgressRequest,
}

#[derive(Debug, Clone)]
struct PendingSave {
    answers: AnswerMap,
    due_at: DateTime<Utc>,
}

/// Trailing debounce over answer changes. Performs no I/O itself: callers take
/// due payloads, send them, and report back with `complete`.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    debounce: Duration,
    pending: Option<PendingSave>,
    generation: u64,
    status: SaveStatus,
}

impl AutosaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            generation: 0,
            status: SaveStatus::Idle,
        }
    }

    /// Replaces any pending payload and pushes the deadline to `now + debounce`.
    pub fn schedule(&mut self, answers: &AnswerMap, now: DateTime<Utc>) {
        self.generation += 1;
        self.pending = Some(PendingSave {
            answers: answers.clone(),
            due_at: now + self.debounce,
        });
        log::debug!(
            "Autosave #{} scheduled for {}",
            self.generation,
            now + self.debounce
        );
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("Pending autosave cancelled");
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|p| p.due_at)
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Hands out the pending payload once its quiet window has elapsed.
    /// An empty answer map is dropped without a request.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<ScheduledSave> {
        let pending = match self.pending.take() {
            Some(p) if p.due_at <= now => p,
            other => {
                self.pending = other;
                return None;
            }
        };

        if pending.answers.is_empty() {
            return None;
        }
        self.status = SaveStatus::Saving;
        Some(ScheduledSave {
            generation: self.generation,
            request: SaveProgressRequest::from(&pending.answers),
        })
    }

    /// Cancels the debounce and returns a payload for `answers` right away.
    pub fn flush_now(&mut self, answers: &AnswerMap) -> Option<ScheduledSave> {
        self.pending = None;
        if answers.is_empty() {
            return None;
        }
        self.generation += 1;
        self.status = SaveStatus::Saving;
        Some(ScheduledSave {
            generation: self.generation,
            request: SaveProgressRequest::from(answers),
        })
    }

    /// Records the outcome of a sent payload. Outcomes of payloads that have
    /// since been superseded leave the status alone.
    pub fn complete(&mut self, save: &ScheduledSave, succeeded: bool) {
        if save.generation != self.generation {
            log::debug!(
                "Ignoring outcome of stale autosave #{} (latest #{})",
                save.generation,
                self.generation
            );
            return;
        }
        self.status = if succeeded {
            SaveStatus::Saved
        } else {
            SaveStatus::Failed
        };
    }
}
