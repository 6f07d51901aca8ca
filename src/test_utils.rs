#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};

    use crate::models::{
        domain::{
            Attempt, AttemptQuestion, AttemptResult, AttemptStatus, Question, QuestionOption,
            QuestionType,
        },
        dto::attempt_dto::AttemptDto,
    };

    /// Fixed start time shared by the fixtures.
    pub fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    /// MCQ with three options, the first one correct.
    pub fn mcq(id: &str) -> Question {
        Question {
            id: id.to_string(),
            content: format!("Question {}: solve $x^2 = 4$", id),
            question_type: QuestionType::Mcq,
            options: vec![
                QuestionOption { text: "2".to_string(), is_correct: true },
                QuestionOption { text: "3".to_string(), is_correct: false },
                QuestionOption { text: "4".to_string(), is_correct: false },
            ],
            media_url: None,
            explanation: Some("Take the square root".to_string()),
        }
    }

    /// In-progress attempt with `count` questions `q1..qN` and a 10 minute limit;
    /// `saved` holds (question index, option) pairs already on the server.
    pub fn attempt_with_saved(count: usize, saved: &[(usize, usize)]) -> Attempt {
        Attempt {
            id: "a-1".to_string(),
            quiz_id: Some("quiz-1".to_string()),
            quiz_title: Some("Algebra".to_string()),
            status: AttemptStatus::InProgress,
            started_at: t0(),
            duration_seconds: Some(600),
            questions: (0..count)
                .map(|i| AttemptQuestion {
                    question: mcq(&format!("q{}", i + 1)),
                    selected_option: saved
                        .iter()
                        .find(|(idx, _)| *idx == i)
                        .map(|(_, opt)| *opt),
                    is_correct: None,
                })
                .collect(),
        }
    }

    fn question_json(id: &str) -> Value {
        json!({
            "_id": id,
            "content": format!("Question {}", id),
            "type": "mcq",
            "options": [
                { "text": "2", "isCorrect": true },
                { "text": "3", "isCorrect": false },
                { "text": "4", "isCorrect": false }
            ],
            "explanation": "Take the square root"
        })
    }

    /// Wire form of a three-question in-progress attempt.
    pub fn attempt_json(id: &str, duration_minutes: i64, saved: &[(usize, i64)]) -> Value {
        let questions: Vec<Value> = (0..3)
            .map(|i| {
                let selected = saved
                    .iter()
                    .find(|(idx, _)| *idx == i)
                    .map(|(_, opt)| *opt)
                    .unwrap_or(-1);
                json!({
                    "question": question_json(&format!("q{}", i + 1)),
                    "selectedOption": selected
                })
            })
            .collect();

        json!({
            "_id": id,
            "status": "in_progress",
            "startedAt": "2026-03-01T08:00:00Z",
            "quiz": { "_id": "quiz-1", "title": "Algebra", "duration": duration_minutes },
            "questions": questions
        })
    }

    /// Graded attempt: q1 right, q2 wrong, q3 unanswered.
    pub fn graded_json(id: &str) -> Value {
        json!({
            "_id": id,
            "status": "submitted",
            "startedAt": "2026-03-01T08:00:00Z",
            "quiz": { "_id": "quiz-1", "title": "Algebra", "duration": 10 },
            "score": 1,
            "totalQuestions": 3,
            "percentage": 33.33,
            "questions": [
                { "question": question_json("q1"), "selectedOption": 0, "isCorrect": true },
                { "question": question_json("q2"), "selectedOption": 1, "isCorrect": false },
                { "question": question_json("q3"), "selectedOption": -1, "isCorrect": false }
            ]
        })
    }

    pub fn graded_result() -> AttemptResult {
        let dto: AttemptDto =
            serde_json::from_value(graded_json("a-1")).expect("fixture should deserialize");
        AttemptResult::try_from(dto).expect("fixture should be a valid graded attempt")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_attempt_with_saved() {
        let attempt = attempt_with_saved(4, &[(1, 2)]);

        assert_eq!(attempt.questions.len(), 4);
        assert_eq!(attempt.questions[1].question.id, "q2");
        assert_eq!(attempt.questions[1].selected_option, Some(2));
        assert_eq!(attempt.questions[0].selected_option, None);
    }

    #[test]
    fn test_fixtures_graded_result() {
        let result = graded_result();

        assert_eq!(result.attempt_id, "a-1");
        assert_eq!(result.questions.len(), 3);
        assert_eq!(result.questions[2].selected_option, None);
    }
}
