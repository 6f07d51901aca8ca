use std::str::FromStr;

use crate::errors::AppError;

/// Frozen copy of a question bank entry, as embedded in an attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub content: String, // may carry inline/block math markup, rendered by the view
    pub question_type: QuestionType,
    pub options: Vec<QuestionOption>,
    pub media_url: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum QuestionType {
    Mcq,   // pick one of the options
    Essay, // free text, graded by hand
}

impl FromStr for QuestionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mcq" => Ok(QuestionType::Mcq),
            "essay" => Ok(QuestionType::Essay),
            other => Err(AppError::ValidationError(format!(
                "Unknown question type '{}'",
                other
            ))),
        }
    }
}

impl Question {
    /// Indices of the options flagged correct.
    pub fn correct_options(&self) -> Vec<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, opt)| opt.is_correct)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_mcq(&self) -> bool {
        self.question_type == QuestionType::Mcq
    }
}

/// `A`, `B`, `C`, ... for option index 0, 1, 2, ...
pub fn option_label(index: usize) -> String {
    let mut n = index;
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}
