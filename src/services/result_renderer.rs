use crate::models::domain::{question::option_label, AttemptQuestion, AttemptResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
    Unanswered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// The right answer, whether or not it was picked.
    Correct,
    /// Picked by the student but wrong.
    WrongChoice,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Excellent,
    VeryGood,
    Good,
    Average,
    NeedsImprovement,
}

impl GradeBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            GradeBand::Excellent
        } else if percentage >= 80.0 {
            GradeBand::VeryGood
        } else if percentage >= 65.0 {
            GradeBand::Good
        } else if percentage >= 50.0 {
            GradeBand::Average
        } else {
            GradeBand::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GradeBand::Excellent => "Excellent!",
            GradeBand::VeryGood => "Very good!",
            GradeBand::Good => "Good",
            GradeBand::Average => "Average",
            GradeBand::NeedsImprovement => "Needs improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionReview {
    pub label: String,
    pub text: String,
    pub selected: bool,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReview {
    pub number: usize,
    pub content: String,
    pub outcome: ReviewOutcome,
    pub selected: Option<usize>,
    pub correct_options: Vec<usize>,
    pub options: Vec<OptionReview>,
    pub media_url: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub attempt_id: String,
    pub quiz_title: Option<String>,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    pub grade: GradeBand,
    pub questions: Vec<QuestionReview>,
}

impl ResultView {
    pub fn count(&self, outcome: ReviewOutcome) -> usize {
        self.questions.iter().filter(|q| q.outcome == outcome).count()
    }
}

pub struct ResultRenderer;

impl ResultRenderer {
    /// Projects a graded attempt into a per-question review. Score and
    /// percentage are shown as the server computed them.
    pub fn render(result: &AttemptResult) -> ResultView {
        let questions: Vec<QuestionReview> = result
            .questions
            .iter()
            .enumerate()
            .map(|(i, item)| Self::review_question(i + 1, item))
            .collect();

        let view = ResultView {
            attempt_id: result.attempt_id.clone(),
            quiz_title: result.quiz_title.clone(),
            score: result.score,
            total_questions: result.total_questions,
            percentage: result.percentage,
            grade: GradeBand::from_percentage(result.percentage),
            questions,
        };

        let correct = view.count(ReviewOutcome::Correct);
        if correct != view.score as usize {
            log::warn!(
                "Attempt {} reports score {} but {} questions are marked correct",
                view.attempt_id,
                view.score,
                correct
            );
        }
        view
    }

    fn review_question(number: usize, item: &AttemptQuestion) -> QuestionReview {
        let question = &item.question;

        // an unanswered question is never "correct", whatever the flag says
        let outcome = match (item.selected_option, item.is_correct) {
            (None, _) => ReviewOutcome::Unanswered,
            (Some(_), Some(true)) => ReviewOutcome::Correct,
            (Some(_), _) => ReviewOutcome::Incorrect,
        };

        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(i, opt)| {
                let selected = item.selected_option == Some(i);
                let mark = if opt.is_correct {
                    OptionMark::Correct
                } else if selected {
                    OptionMark::WrongChoice
                } else {
                    OptionMark::Neutral
                };
                OptionReview {
                    label: option_label(i),
                    text: opt.text.clone(),
                    selected,
                    mark,
                }
            })
            .collect();

        QuestionReview {
            number,
            content: question.content.clone(),
            outcome,
            selected: item.selected_option,
            correct_options: question.correct_options(),
            options,
            media_url: question.media_url.clone(),
            explanation: question.explanation.clone(),
        }
    }
}
