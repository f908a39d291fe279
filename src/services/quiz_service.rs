use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, Quiz},
        dto::{
            request::{CreateQuizRequest, UpdateQuizRequest},
            response::PaginatedResponse,
        },
    },
    repositories::{QuestionRepository, QuizRepository},
    services::sanitize::{sanitize_optional, sanitize_text},
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { quizzes, questions }
    }

    /// New quizzes start inactive; they are activated once they have questions.
    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let title = sanitize_text(&request.title);
        if title.is_empty() {
            return Err(AppError::ValidationError(
                "title: must contain text".to_string(),
            ));
        }
        let description = sanitize_text(&request.description);

        let quiz = Quiz::new(
            &title,
            &description,
            request.duration_minutes,
            request.passing_marks,
            false,
        );

        let quiz = self.quizzes.create(quiz).await?;
        log::info!("Created quiz '{}' ({})", quiz.title, quiz.id);
        Ok(quiz)
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    /// Inactive quizzes are invisible to students.
    pub async fn get_active_quiz(&self, id: &str) -> AppResult<Quiz> {
        let quiz = self.get_quiz(id).await?;
        if !quiz.is_active {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }
        Ok(quiz)
    }

    pub async fn list_quizzes(
        &self,
        active_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<PaginatedResponse<Quiz>> {
        let (items, total) = self.quizzes.list_quizzes(active_only, offset, limit).await?;
        Ok(PaginatedResponse::new(items, offset, limit, total))
    }

    pub async fn update_quiz(&self, id: &str, request: UpdateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let mut quiz = self.get_quiz(id).await?;

        if let Some(title) = sanitize_optional(request.title) {
            if title.is_empty() {
                return Err(AppError::ValidationError(
                    "title: must contain text".to_string(),
                ));
            }
            quiz.title = title;
        }
        if let Some(description) = sanitize_optional(request.description) {
            quiz.description = description;
        }
        if let Some(duration_minutes) = request.duration_minutes {
            quiz.duration_minutes = duration_minutes;
        }
        if let Some(passing_marks) = request.passing_marks {
            quiz.passing_marks = passing_marks;
        }
        if let Some(is_active) = request.is_active {
            quiz.is_active = is_active;
        }

        if quiz.is_active {
            let questions = self.questions.find_by_quiz(&quiz.id).await?;
            check_active_quiz(&quiz, &questions)?;
        }

        quiz.modified_at = Some(Utc::now());
        let quiz = self.quizzes.update(quiz).await?;
        log::info!("Updated quiz {}", quiz.id);
        Ok(quiz)
    }

    /// Removes the quiz and its questions. Attempts are kept as history.
    ///
    /// Questions go first so a failed cascade leaves the quiz in place for a retry.
    pub async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        self.get_quiz(id).await?;

        let removed = self.questions.delete_by_quiz(id).await.map_err(|err| {
            log::error!("Failed to delete questions of quiz {}: {}", id, err);
            err
        })?;
        self.quizzes.delete(id).await?;
        log::info!("Deleted quiz {} and {} questions", id, removed);
        Ok(())
    }
}

/// An active quiz needs at least one question and a reachable passing threshold.
pub fn check_active_quiz(quiz: &Quiz, questions: &[Question]) -> AppResult<()> {
    if questions.is_empty() {
        return Err(AppError::InvalidRequest(format!(
            "Quiz '{}' cannot be active without questions",
            quiz.id
        )));
    }

    let total_marks: i32 = questions.iter().map(|q| q.marks).sum();
    if quiz.passing_marks > total_marks {
        return Err(AppError::InvalidRequest(format!(
            "Passing marks {} exceed the {} marks available in quiz '{}'",
            quiz.passing_marks, total_marks, quiz.id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::QuestionOption;
    use crate::repositories::{
        question_repository::MockQuestionRepository, quiz_repository::MockQuizRepository,
    };
    use mockall::{predicate::eq, Sequence};

    fn quiz(id: &str, passing_marks: i32, is_active: bool) -> Quiz {
        let mut quiz = Quiz::new("Ownership", "Moves and borrows", 15, passing_marks, is_active);
        quiz.id = id.to_string();
        quiz
    }

    fn question(quiz_id: &str, marks: i32, order: i32) -> Question {
        Question::new(
            quiz_id,
            "Who owns the value?",
            marks,
            order,
            vec![
                QuestionOption::new("The binding", true),
                QuestionOption::new("Nobody", false),
            ],
        )
    }

    fn service(quizzes: MockQuizRepository, questions: MockQuestionRepository) -> QuizService {
        QuizService::new(Arc::new(quizzes), Arc::new(questions))
    }

    #[tokio::test]
    async fn create_quiz_sanitizes_and_starts_inactive() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_create()
            .times(1)
            .returning(|quiz| Ok(quiz));

        let created = service(quizzes, MockQuestionRepository::new())
            .create_quiz(CreateQuizRequest {
                title: " <b>Lifetimes</b> ".to_string(),
                description: "Scopes<script>x()</script>".to_string(),
                duration_minutes: 20,
                passing_marks: 8,
            })
            .await
            .expect("quiz should be created");

        assert_eq!(created.title, "Lifetimes");
        assert_eq!(created.description, "Scopes");
        assert!(!created.is_active);
        assert_eq!(created.total_questions, 0);
    }

    #[tokio::test]
    async fn create_quiz_rejects_markup_only_title() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_create().never();

        let result = service(quizzes, MockQuestionRepository::new())
            .create_quiz(CreateQuizRequest {
                title: "<br/>".to_string(),
                description: String::new(),
                duration_minutes: 20,
                passing_marks: 8,
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn get_active_quiz_hides_inactive() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .with(eq("quiz-1"))
            .returning(|id| Ok(Some(quiz(id, 5, false))));

        let result = service(quizzes, MockQuestionRepository::new())
            .get_active_quiz("quiz-1")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn activation_requires_questions() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(|id| Ok(Some(quiz(id, 5, false))));
        quizzes.expect_update().never();

        let mut questions = MockQuestionRepository::new();
        questions.expect_find_by_quiz().returning(|_| Ok(vec![]));

        let result = service(quizzes, questions)
            .update_quiz(
                "quiz-1",
                UpdateQuizRequest {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn activation_rejects_unreachable_passing_marks() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(|id| Ok(Some(quiz(id, 5, false))));
        quizzes.expect_update().never();

        let mut questions = MockQuestionRepository::new();
        questions
            .expect_find_by_quiz()
            .returning(|quiz_id| Ok(vec![question(quiz_id, 3, 1)]));

        let result = service(quizzes, questions)
            .update_quiz(
                "quiz-1",
                UpdateQuizRequest {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidRequest(msg)) if msg.contains("exceed")));
    }

    #[tokio::test]
    async fn partial_update_only_touches_present_fields() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(|id| Ok(Some(quiz(id, 5, false))));
        quizzes.expect_update().times(1).returning(|quiz| Ok(quiz));

        let updated = service(quizzes, MockQuestionRepository::new())
            .update_quiz(
                "quiz-1",
                UpdateQuizRequest {
                    duration_minutes: Some(45),
                    ..Default::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.duration_minutes, 45);
        assert_eq!(updated.title, "Ownership");
        assert_eq!(updated.passing_marks, 5);
    }

    #[tokio::test]
    async fn delete_quiz_removes_questions_before_quiz() {
        let mut seq = Sequence::new();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(|id| Ok(Some(quiz(id, 5, false))));

        let mut questions = MockQuestionRepository::new();
        questions
            .expect_delete_by_quiz()
            .with(eq("quiz-1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));
        quizzes
            .expect_delete()
            .with(eq("quiz-1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        service(quizzes, questions)
            .delete_quiz("quiz-1")
            .await
            .expect("delete should succeed");
    }

    #[tokio::test]
    async fn failed_question_cascade_keeps_quiz() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(|id| Ok(Some(quiz(id, 5, false))));
        quizzes.expect_delete().never();

        let mut questions = MockQuestionRepository::new();
        questions
            .expect_delete_by_quiz()
            .returning(|_| Err(AppError::DatabaseError("connection reset".to_string())));

        let result = service(quizzes, questions).delete_quiz("quiz-1").await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn delete_missing_quiz_leaves_questions_alone() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));
        quizzes.expect_delete().never();

        let mut questions = MockQuestionRepository::new();
        questions.expect_delete_by_quiz().never();

        let result = service(quizzes, questions).delete_quiz("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
