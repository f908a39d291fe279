use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Attempt, Question, QuestionOption};

/// Admin projection of a question; options keep their correctness flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDto {
    pub id: String,
    pub quiz_id: String,
    pub question_text: String,
    pub marks: i32,
    pub order: i32,
    pub options: Vec<QuestionOption>,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        QuestionDto {
            id: question.id,
            quiz_id: question.quiz_id,
            question_text: question.question_text,
            marks: question.marks,
            order: question.order,
            options: question.options,
        }
    }
}

/// Student projection of a question. There is no correctness field to leak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentQuestionDto {
    pub id: String,
    pub quiz_id: String,
    pub question_text: String,
    pub marks: i32,
    pub order: i32,
    pub options: Vec<StudentOptionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentOptionDto {
    pub id: String,
    pub text: String,
}

impl From<Question> for StudentQuestionDto {
    fn from(question: Question) -> Self {
        StudentQuestionDto {
            id: question.id,
            quiz_id: question.quiz_id,
            question_text: question.question_text,
            marks: question.marks,
            order: question.order,
            options: question
                .options
                .into_iter()
                .map(|o| StudentOptionDto {
                    id: o.id,
                    text: o.text,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
    pub has_more: bool,
}

impl PaginationMetadata {
    pub fn new(offset: i64, limit: i64, total: i64) -> Self {
        Self {
            offset,
            limit,
            total,
            has_more: offset + limit < total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, offset: i64, limit: i64, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMetadata::new(offset, limit, total),
        }
    }
}

/// Attempt listing row without the per-answer breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub score: i32,
    pub total_marks: i32,
    pub is_passed: bool,
    pub time_spent: i64,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
}

impl From<Attempt> for AttemptSummary {
    fn from(attempt: Attempt) -> Self {
        AttemptSummary {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            student_id: attempt.student_id,
            score: attempt.score,
            total_marks: attempt.total_marks,
            is_passed: attempt.is_passed,
            time_spent: attempt.time_spent,
            started_at: attempt.started_at,
            submitted_at: attempt.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewedAnswer {
    pub question_id: String,
    /// `None` when the question was deleted after grading.
    pub question_text: Option<String>,
    pub options: Vec<QuestionOption>,
    pub selected_option_id: String,
    pub correct_option_id: Option<String>,
    pub is_correct: bool,
    pub marks_awarded: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReview {
    pub attempt: AttemptSummary,
    pub quiz_title: Option<String>,
    pub passing_marks: Option<i32>,
    pub answers: Vec<ReviewedAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
