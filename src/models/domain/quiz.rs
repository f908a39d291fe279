use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub passing_marks: i32,
    pub total_questions: i32, // denormalized, re-synced on question create/delete
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(
        title: &str,
        description: &str,
        duration_minutes: i32,
        passing_marks: i32,
        is_active: bool,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            duration_minutes,
            passing_marks,
            total_questions: 0,
            is_active,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn is_passing_score(&self, score: i32) -> bool {
        score >= self.passing_marks
    }
}
