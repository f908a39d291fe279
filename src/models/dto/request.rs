use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: i32,

    #[validate(range(min = 0))]
    pub passing_marks: i32,
}

/// Partial quiz update; only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<i32>,

    #[validate(range(min = 0))]
    pub passing_marks: Option<i32>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionInput {
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,

    #[validate(range(min = 1, max = 1000))]
    pub marks: i32,

    /// Defaults to one past the highest order in the quiz.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub order: Option<i32>,

    #[validate(custom(function = validate_options))]
    pub options: Vec<OptionInput>,
}

/// Partial question update; `options` replaces the whole list when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question_text: Option<String>,

    #[validate(range(min = 1, max = 1000))]
    pub marks: Option<i32>,

    #[validate(range(min = 1))]
    pub order: Option<i32>,

    #[validate(custom(function = validate_options))]
    pub options: Option<Vec<OptionInput>>,
}

/// Options must be 2..=10 entries with non-empty text, unique ids and exactly one correct flag.
fn validate_options(options: &[OptionInput]) -> Result<(), ValidationError> {
    if options.len() < 2 {
        return Err(ValidationError::new("options_too_few"));
    }
    if options.len() > 10 {
        return Err(ValidationError::new("options_too_many"));
    }

    let mut seen_ids = HashSet::new();
    for opt in options {
        let text = opt.text.trim();
        if text.is_empty() {
            return Err(ValidationError::new("option_text_empty"));
        }
        if text.len() > 500 {
            return Err(ValidationError::new("option_text_too_long"));
        }
        if let Some(id) = &opt.id {
            let id = id.trim();
            if id.is_empty() {
                return Err(ValidationError::new("option_id_empty"));
            }
            // ids are stored trimmed
            if !seen_ids.insert(id) {
                return Err(ValidationError::new("option_id_duplicate"));
            }
        }
    }

    let correct = options.iter().filter(|o| o.is_correct).count();
    if correct != 1 {
        return Err(ValidationError::new("exactly_one_correct_option_required"));
    }

    Ok(())
}

/// Ids are matched against the quiz by the grader, not validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerInput {
    pub question_id: String,
    pub selected_option_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(length(min = 1, max = 100))]
    pub student_id: String,

    pub started_at: DateTime<Utc>,

    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1))]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self, default_limit: i64, max_limit: i64) -> i64 {
        self.limit.unwrap_or(default_limit).clamp(1, max_limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttemptListQuery {
    pub quiz_id: Option<String>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1))]
    pub limit: Option<i64>,
}

impl AttemptListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            offset: self.offset,
            limit: self.limit,
        }
    }
}
