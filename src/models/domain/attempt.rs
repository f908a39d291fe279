use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A graded, immutable submission of one student for one quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
    pub time_spent: i64, // whole seconds
    pub score: i32,
    pub total_marks: i32,
    pub is_passed: bool,
    pub answers: Vec<GradedAnswer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GradedAnswer {
    pub question_id: String,
    pub selected_option_id: String,
    pub is_correct: bool,
    pub marks_awarded: i32,
}
