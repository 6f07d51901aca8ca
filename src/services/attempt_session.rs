use std::fmt;
use std::sync::Arc;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        question::option_label, AnswerMap, Attempt, AttemptResult, QuestionType,
    },
    repositories::AttemptRepository,
    services::{
        autosave_scheduler::{AutosaveScheduler, SaveStatus, ScheduledSave},
        clock::Clock,
        countdown_timer::{format_remaining, CountdownTimer, TimerEvent},
        result_renderer::{ResultRenderer, ResultView},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    InProgress,
    Submitted,
    /// Terminal; carries the text shown instead of the quiz.
    Unavailable(String),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Submitted | SessionState::Unavailable(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    UserRequested,
    TimeExpired,
}

impl fmt::Display for SubmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitReason::UserRequested => write!(f, "user_requested"),
            SubmitReason::TimeExpired => write!(f, "time_expired"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// The attempt was already submitted, locally or according to the server.
    AlreadySubmitted,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub autosave_debounce: chrono::Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            autosave_debounce: config.autosave_debounce(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            autosave_debounce: chrono::Duration::seconds(15),
        }
    }
}

/// Shown in the confirmation prompt before a user-requested submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub answered: usize,
    pub total: usize,
    pub unanswered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionChoice {
    pub label: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: String,
    pub number: usize,
    pub content: String,
    pub question_type: QuestionType,
    pub options: Vec<OptionChoice>,
    pub media_url: Option<String>,
}

/// Everything a renderer needs to draw the attempt screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub state: SessionState,
    pub quiz_title: Option<String>,
    pub current_index: usize,
    pub total_questions: usize,
    pub current: Option<QuestionView>,
    pub answered: Vec<bool>,
    pub remaining_seconds: Option<i64>,
    pub remaining_label: String,
    pub urgent: bool,
    pub save_status: SaveStatus,
    pub submitting: bool,
    pub last_error: Option<String>,
}

/// Drives one attempt from load to submission.
pub struct AttemptSession {
    attempt_id: String,
    repository: Arc<dyn AttemptRepository>,
    clock: Arc<dyn Clock>,
    state: SessionState,
    attempt: Option<Attempt>,
    answers: AnswerMap,
    current_index: usize,
    timer: Option<CountdownTimer>,
    autosave: AutosaveScheduler,
    result: Option<AttemptResult>,
    submitting: bool,
    last_error: Option<String>,
}

impl AttemptSession {
    pub fn new(
        attempt_id: impl Into<String>,
        repository: Arc<dyn AttemptRepository>,
        clock: Arc<dyn Clock>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            attempt_id: attempt_id.into(),
            repository,
            clock,
            state: SessionState::Loading,
            attempt: None,
            answers: AnswerMap::new(),
            current_index: 0,
            timer: None,
            autosave: AutosaveScheduler::new(settings.autosave_debounce),
            result: None,
            submitting: false,
            last_error: None,
        }
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn repository(&self) -> Arc<dyn AttemptRepository> {
        Arc::clone(&self.repository)
    }

    /// Fetches the attempt and seeds answers from what the server already has.
    /// Any failure leaves the session `Unavailable`; there is no automatic retry.
    pub async fn load(&mut self) -> AppResult<()> {
        if self.state != SessionState::Loading {
            return Err(AppError::InvalidState(format!(
                "attempt {} is already loaded",
                self.attempt_id
            )));
        }

        let attempt = match self.repository.find_by_id(&self.attempt_id).await {
            Ok(attempt) => attempt,
            Err(e) => {
                log::warn!("Failed to load attempt {}: {}", self.attempt_id, e);
                self.state = SessionState::Unavailable(e.user_message().to_string());
                return Err(e);
            }
        };

        if attempt.questions.is_empty() {
            log::warn!("Attempt {} has no questions", self.attempt_id);
            self.state = SessionState::Unavailable("Attempt has no questions".to_string());
            return Err(AppError::NotFound(format!(
                "attempt '{}' has no questions",
                self.attempt_id
            )));
        }

        self.answers = attempt.saved_answers();
        if attempt.is_submitted() {
            log::info!("Attempt {} was already submitted", self.attempt_id);
            self.state = SessionState::Submitted;
        } else {
            if let Some(duration) = attempt.duration_seconds {
                let mut timer = CountdownTimer::new(attempt.started_at, duration);
                timer.start();
                self.timer = Some(timer);
            }
            self.state = SessionState::InProgress;
            log::info!(
                "Attempt {} loaded: {} questions, {} already answered",
                self.attempt_id,
                attempt.questions.len(),
                self.answers.len()
            );
        }
        self.attempt = Some(attempt);
        Ok(())
    }

    /// Records the answer locally and restarts the autosave debounce.
    /// Option indices are trusted; the input layer bounds them.
    pub fn select_option(&mut self, question_id: &str, option_index: usize) -> AppResult<()> {
        self.ensure_in_progress("select an option")?;
        self.answers.select(question_id, option_index);
        self.autosave.schedule(&self.answers, self.clock.now());
        Ok(())
    }

    pub fn select_current(&mut self, option_index: usize) -> AppResult<()> {
        let question_id = self
            .attempt
            .as_ref()
            .and_then(|a| a.questions.get(self.current_index))
            .map(|q| q.question.id.clone())
            .ok_or_else(|| AppError::InvalidState("no question is displayed".to_string()))?;
        self.select_option(&question_id, option_index)
    }

    /// Moves the question pointer, clamped to the last question.
    pub fn navigate(&mut self, index: usize) -> usize {
        let count = self.attempt.as_ref().map_or(0, |a| a.questions.len());
        self.current_index = index.min(count.saturating_sub(1));
        self.current_index
    }

    pub fn next(&mut self) -> usize {
        self.navigate(self.current_index + 1)
    }

    pub fn previous(&mut self) -> usize {
        self.navigate(self.current_index.saturating_sub(1))
    }

    pub fn summary(&self) -> SubmissionSummary {
        let (answered, total) = match &self.attempt {
            Some(attempt) => (
                attempt
                    .questions
                    .iter()
                    .filter(|q| self.answers.is_answered(&q.question.id))
                    .count(),
                attempt.questions.len(),
            ),
            None => (0, 0),
        };
        SubmissionSummary {
            answered,
            total,
            unanswered: total - answered,
        }
    }

    pub fn remaining_seconds(&self) -> Option<i64> {
        let now = self.clock.now();
        self.timer.as_ref().map(|t| t.remaining_seconds(now))
    }

    /// Flushes the answers, then asks the server to close the attempt.
    ///
    /// A failed flush is logged and submission goes ahead. A failed submit
    /// leaves the session in progress so the user can retry.
    pub async fn submit(&mut self, reason: SubmitReason) -> AppResult<SubmitOutcome> {
        match self.state {
            SessionState::Submitted => {
                log::info!(
                    "Ignoring {} submit for attempt {}: already submitted",
                    reason,
                    self.attempt_id
                );
                return Ok(SubmitOutcome::AlreadySubmitted);
            }
            SessionState::InProgress => {}
            _ => {
                return Err(AppError::InvalidState(format!(
                    "attempt {} cannot be submitted while {:?}",
                    self.attempt_id, self.state
                )))
            }
        }

        log::info!("Submitting attempt {} ({})", self.attempt_id, reason);
        self.submitting = true;
        self.last_error = None;

        if let Some(save) = self.autosave.flush_now(&self.answers) {
            let flushed = self
                .repository
                .save_progress(&self.attempt_id, &save.request)
                .await;
            if let Err(e) = &flushed {
                log::warn!(
                    "Flush before submit failed for attempt {}, submitting anyway: {}",
                    self.attempt_id,
                    e
                );
            }
            self.autosave.complete(&save, flushed.is_ok());
        }

        let outcome = match self.repository.submit(&self.attempt_id).await {
            Ok(()) => SubmitOutcome::Submitted,
            Err(AppError::AlreadyExists(msg)) => {
                log::info!(
                    "Server reports attempt {} already submitted: {}",
                    self.attempt_id,
                    msg
                );
                SubmitOutcome::AlreadySubmitted
            }
            Err(e) => {
                log::error!("Submit failed for attempt {}: {}", self.attempt_id, e);
                self.submitting = false;
                self.last_error = Some(e.user_message().to_string());
                return Err(e);
            }
        };

        self.submitting = false;
        self.state = SessionState::Submitted;
        self.teardown();

        match self.repository.find_result(&self.attempt_id).await {
            Ok(result) => self.result = Some(result),
            Err(e) => log::warn!(
                "Attempt {} submitted but result is not available yet: {}",
                self.attempt_id,
                e
            ),
        }
        Ok(outcome)
    }

    /// Pending autosave whose debounce window has elapsed, if any.
    pub fn take_due_autosave(&mut self) -> Option<ScheduledSave> {
        if self.state != SessionState::InProgress {
            return None;
        }
        self.autosave.take_due(self.clock.now())
    }

    /// Autosave failures are logged and dropped; the next save or the
    /// pre-submit flush re-sends the whole answer map.
    pub fn finish_autosave(&mut self, save: &ScheduledSave, outcome: AppResult<()>) {
        match outcome {
            Ok(()) => {
                log::debug!("Autosave #{} stored for {}", save.generation, self.attempt_id);
                self.autosave.complete(save, true);
            }
            Err(e) => {
                log::warn!("Autosave failed for attempt {}: {}", self.attempt_id, e);
                self.autosave.complete(save, false);
            }
        }
    }

    /// Forces a `TimeExpired` submit the first time the countdown hits zero.
    pub async fn poll_timer(&mut self) -> Option<AppResult<SubmitOutcome>> {
        if self.state != SessionState::InProgress {
            return None;
        }
        let now = self.clock.now();
        let event = self.timer.as_mut()?.poll(now);

        match event {
            TimerEvent::Expired => {
                log::warn!("Time is up for attempt {}", self.attempt_id);
                Some(self.submit(SubmitReason::TimeExpired).await)
            }
            TimerEvent::Tick(_) | TimerEvent::Inactive => None,
        }
    }

    /// One pass of time-driven work: a due autosave, then the countdown.
    pub async fn tick(&mut self) -> Option<AppResult<SubmitOutcome>> {
        if let Some(save) = self.take_due_autosave() {
            let outcome = self
                .repository
                .save_progress(&self.attempt_id, &save.request)
                .await;
            self.finish_autosave(&save, outcome);
        }
        self.poll_timer().await
    }

    /// Stops the countdown and drops any pending autosave.
    pub fn teardown(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.dispose();
        }
        self.autosave.cancel();
    }

    pub async fn result_view(&mut self) -> AppResult<ResultView> {
        if self.state != SessionState::Submitted {
            return Err(AppError::InvalidState(format!(
                "attempt {} has not been submitted",
                self.attempt_id
            )));
        }
        let result = match self.result.take() {
            Some(result) => result,
            None => self.repository.find_result(&self.attempt_id).await?,
        };
        let view = ResultRenderer::render(&result);
        self.result = Some(result);
        Ok(view)
    }

    pub fn view(&self) -> SessionView {
        let now = self.clock.now();
        let remaining_seconds = self.timer.as_ref().map(|t| t.remaining_seconds(now));

        let (quiz_title, answered, current) = match &self.attempt {
            Some(attempt) => (
                attempt.quiz_title.clone(),
                attempt
                    .questions
                    .iter()
                    .map(|q| self.answers.is_answered(&q.question.id))
                    .collect(),
                attempt.questions.get(self.current_index).map(|item| {
                    let selected = self.answers.get(&item.question.id);
                    QuestionView {
                        id: item.question.id.clone(),
                        number: self.current_index + 1,
                        content: item.question.content.clone(),
                        question_type: item.question.question_type,
                        options: item
                            .question
                            .options
                            .iter()
                            .enumerate()
                            .map(|(i, opt)| OptionChoice {
                                label: option_label(i),
                                text: opt.text.clone(),
                                selected: selected == Some(i),
                            })
                            .collect(),
                        media_url: item.question.media_url.clone(),
                    }
                }),
            ),
            None => (None, Vec::new(), None),
        };

        SessionView {
            state: self.state.clone(),
            quiz_title,
            current_index: self.current_index,
            total_questions: answered.len(),
            current,
            answered,
            remaining_seconds,
            remaining_label: format_remaining(remaining_seconds),
            urgent: self.timer.as_ref().is_some_and(|t| t.is_urgent(now)),
            save_status: self.autosave.status(),
            submitting: self.submitting,
            last_error: self.last_error.clone(),
        }
    }

    fn ensure_in_progress(&self, action: &str) -> AppResult<()> {
        if self.state == SessionState::InProgress {
            Ok(())
        } else {
            Err(AppError::InvalidState(format!(
                "cannot {} while attempt is {:?}",
                action, self.state
            )))
        }
    }
}

impl Drop for AttemptSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
