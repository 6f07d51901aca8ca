#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use lms_quiz_client::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            Attempt, AttemptQuestion, AttemptResult, AttemptStatus, Question, QuestionOption,
            QuestionType,
        },
        dto::request::SaveProgressRequest,
    },
    repositories::AttemptRepository,
    services::{
        attempt_session::{AttemptSession, SessionSettings},
        clock::{Clock, ManualClock},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load,
    Save(Vec<(String, usize)>),
    Submit,
    Result,
}

/// Stands in for the attempts API: keeps attempts in memory, grades on
/// request and records every call in order.
pub struct InMemoryAttemptRepository {
    attempts: Arc<RwLock<HashMap<String, Attempt>>>,
    calls: Arc<RwLock<Vec<Call>>>,
    fail_saves: AtomicBool,
    failing_submits: AtomicUsize,
}

impl InMemoryAttemptRepository {
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            fail_saves: AtomicBool::new(false),
            failing_submits: AtomicUsize::new(0),
        }
    }

    pub async fn with_attempt(attempt: Attempt) -> Arc<Self> {
        let repo = Self::new();
        repo.insert(attempt).await;
        Arc::new(repo)
    }

    pub async fn insert(&self, attempt: Attempt) {
        self.attempts.write().await.insert(attempt.id.clone(), attempt);
    }

    pub async fn stored(&self, id: &str) -> Option<Attempt> {
        self.attempts.read().await.get(id).cloned()
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.read().await.clone()
    }

    pub async fn count(&self, call: fn(&Call) -> bool) -> usize {
        self.calls.read().await.iter().filter(|c| call(c)).count()
    }

    pub async fn submit_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Submit)).await
    }

    pub async fn save_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Save(_))).await
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_next_submits(&self, n: usize) {
        self.failing_submits.store(n, Ordering::SeqCst);
    }

    async fn record(&self, call: Call) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Attempt> {
        self.record(Call::Load).await;
        self.stored(id)
            .await
            .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))
    }

    async fn save_progress(&self, id: &str, request: &SaveProgressRequest) -> AppResult<()> {
        let entries = request
            .answers
            .iter()
            .map(|a| (a.question_id.clone(), a.selected_option))
            .collect();
        self.record(Call::Save(entries)).await;

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::TransportError("connection reset".to_string()));
        }

        let mut attempts = self.attempts.write().await;
        let Some(attempt) = attempts.get_mut(id) else {
            return Err(AppError::NotFound("Attempt not found".to_string()));
        };
        if attempt.is_submitted() {
            return Err(AppError::ValidationError(
                "Attempt already submitted".to_string(),
            ));
        }
        for entry in &request.answers {
            if let Some(item) = attempt
                .questions
                .iter_mut()
                .find(|q| q.question.id == entry.question_id)
            {
                item.selected_option = Some(entry.selected_option);
            }
        }
        Ok(())
    }

    async fn submit(&self, id: &str) -> AppResult<()> {
        self.record(Call::Submit).await;

        let remaining = self.failing_submits.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_submits.store(remaining - 1, Ordering::SeqCst);
            return Err(AppError::InternalError("Database unavailable".to_string()));
        }

        let mut attempts = self.attempts.write().await;
        let Some(attempt) = attempts.get_mut(id) else {
            return Err(AppError::NotFound("Attempt not found".to_string()));
        };
        if attempt.is_submitted() {
            return Err(AppError::AlreadyExists(
                "Attempt already submitted".to_string(),
            ));
        }
        attempt.status = AttemptStatus::Submitted;
        for item in attempt.questions.iter_mut() {
            item.is_correct = Some(
                item.selected_option
                    .and_then(|s| item.question.options.get(s))
                    .is_some_and(|o| o.is_correct),
            );
        }
        Ok(())
    }

    async fn find_result(&self, id: &str) -> AppResult<AttemptResult> {
        self.record(Call::Result).await;

        let attempt = self
            .stored(id)
            .await
            .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;
        if !attempt.is_submitted() {
            return Err(AppError::ValidationError(
                "Attempt not submitted yet".to_string(),
            ));
        }

        let total = attempt.questions.len() as u32;
        let score = attempt
            .questions
            .iter()
            .filter(|q| q.is_correct == Some(true))
            .count() as u32;
        let percentage = if total == 0 {
            0.0
        } else {
            (score as f64 / total as f64 * 10000.0).round() / 100.0
        };

        Ok(AttemptResult {
            attempt_id: attempt.id,
            quiz_title: attempt.quiz_title,
            score,
            total_questions: total,
            percentage,
            questions: attempt.questions,
        })
    }
}

pub fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Three options, the first one correct.
pub fn mcq(id: &str) -> Question {
    Question {
        id: id.to_string(),
        content: format!("Question {}", id),
        question_type: QuestionType::Mcq,
        options: ["Alpha", "Beta", "Gamma"]
            .iter()
            .enumerate()
            .map(|(i, text)| QuestionOption {
                text: text.to_string(),
                is_correct: i == 0,
            })
            .collect(),
        media_url: None,
        explanation: Some("Alpha is right".to_string()),
    }
}

/// `count` questions `q1..qN` started at `t0()`.
pub fn attempt(count: usize, duration_seconds: Option<i64>) -> Attempt {
    Attempt {
        id: "a-1".to_string(),
        quiz_id: Some("quiz-1".to_string()),
        quiz_title: Some("Algebra basics".to_string()),
        status: AttemptStatus::InProgress,
        started_at: t0(),
        duration_seconds,
        questions: (1..=count)
            .map(|i| AttemptQuestion {
                question: mcq(&format!("q{}", i)),
                selected_option: None,
                is_correct: None,
            })
            .collect(),
    }
}

pub fn seconds(n: i64) -> Duration {
    Duration::seconds(n)
}

pub fn new_session(
    repo: &Arc<InMemoryAttemptRepository>,
    clock: &Arc<ManualClock>,
) -> AttemptSession {
    AttemptSession::new(
        "a-1",
        Arc::clone(repo) as Arc<dyn AttemptRepository>,
        Arc::clone(clock) as Arc<dyn Clock>,
        SessionSettings::default(),
    )
}
