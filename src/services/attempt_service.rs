use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Attempt, Question},
        dto::{
            request::SubmitAttemptRequest,
            response::{AttemptReview, AttemptSummary, PaginatedResponse, ReviewedAnswer},
        },
    },
    repositories::{AttemptRepository, QuestionRepository, QuizRepository},
    services::grading,
};

pub struct AttemptService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl AttemptService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            quizzes,
            questions,
            attempts,
        }
    }

    /// Grades a submission and stores exactly one attempt for it.
    ///
    /// The quiz must exist and be active; every other precondition lives in
    /// [`grading::grade`]. Nothing is written unless grading succeeds.
    pub async fn submit_attempt(
        &self,
        quiz_id: &str,
        request: SubmitAttemptRequest,
    ) -> AppResult<Attempt> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .filter(|q| q.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        request.validate()?;

        let questions = self.questions.find_by_quiz(quiz_id).await?;

        let submitted_at = Utc::now();
        let outcome = grading::grade(
            &quiz,
            &questions,
            &request.answers,
            request.started_at,
            submitted_at,
        )?;

        let attempt = Attempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            student_id: request.student_id,
            started_at: request.started_at,
            submitted_at,
            time_spent: outcome.time_spent,
            score: outcome.score,
            total_marks: outcome.total_marks,
            is_passed: outcome.is_passed,
            answers: outcome.answers,
        };

        let attempt = self.attempts.create(attempt).await?;
        log::info!(
            "Student {} scored {}/{} on quiz {} (passed: {})",
            attempt.student_id,
            attempt.score,
            attempt.total_marks,
            attempt.quiz_id,
            attempt.is_passed
        );

        Ok(attempt)
    }

    pub async fn get_attempt(&self, id: &str) -> AppResult<Attempt> {
        self.attempts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attempt with id '{}' not found", id)))
    }

    pub async fn list_student_attempts(
        &self,
        student_id: &str,
        quiz_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<PaginatedResponse<AttemptSummary>> {
        let (attempts, total) = self
            .attempts
            .list_by_student(student_id, quiz_id, offset, limit)
            .await?;

        let data = attempts.into_iter().map(AttemptSummary::from).collect();
        Ok(PaginatedResponse::new(data, offset, limit, total))
    }

    /// Joins a graded attempt with the current question text and options.
    pub async fn review_attempt(&self, student_id: &str, attempt_id: &str) -> AppResult<AttemptReview> {
        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .filter(|a| a.student_id == student_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;

        let quiz = self.quizzes.find_by_id(&attempt.quiz_id).await?;
        let questions = self.questions.find_by_quiz(&attempt.quiz_id).await?;
        let by_id: HashMap<&str, &Question> =
            questions.iter().map(|q| (q.id.as_str(), q)).collect();

        let answers = attempt
            .answers
            .iter()
            .map(|graded| {
                let question = by_id.get(graded.question_id.as_str());
                ReviewedAnswer {
                    question_id: graded.question_id.clone(),
                    question_text: question.map(|q| q.question_text.clone()),
                    options: question.map(|q| q.options.clone()).unwrap_or_default(),
                    selected_option_id: graded.selected_option_id.clone(),
                    correct_option_id: question
                        .and_then(|q| q.correct_option())
                        .map(|o| o.id.clone()),
                    is_correct: graded.is_correct,
                    marks_awarded: graded.marks_awarded,
                }
            })
            .collect();

        Ok(AttemptReview {
            quiz_title: quiz.as_ref().map(|q| q.title.clone()),
            passing_marks: quiz.as_ref().map(|q| q.passing_marks),
            attempt: AttemptSummary::from(attempt),
            answers,
        })
    }
}
