use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, QuestionOption, Quiz},
        dto::{
            request::{CreateQuestionRequest, OptionInput, UpdateQuestionRequest},
            response::{PaginatedResponse, QuestionDto, StudentQuestionDto},
        },
    },
    repositories::{QuestionRepository, QuizRepository},
    services::{
        quiz_service::check_active_quiz,
        sanitize::{sanitize_optional, sanitize_text},
    },
};

pub struct QuestionService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { quizzes, questions }
    }

    async fn find_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    async fn find_question(&self, id: &str) -> AppResult<Question> {
        self.questions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    /// Re-syncs the denormalized question count on the quiz from the store.
    async fn sync_question_count(&self, mut quiz: Quiz) -> AppResult<()> {
        let count = self.questions.count_by_quiz(&quiz.id).await? as i32;
        if quiz.total_questions != count {
            quiz.total_questions = count;
            quiz.modified_at = Some(Utc::now());
            self.quizzes.update(quiz).await?;
        }
        Ok(())
    }

    pub async fn create_question(
        &self,
        quiz_id: &str,
        request: CreateQuestionRequest,
    ) -> AppResult<QuestionDto> {
        request.validate()?;

        let quiz = self.find_quiz(quiz_id).await?;
        let existing = self.questions.find_by_quiz(quiz_id).await?;

        let order = match request.order {
            Some(order) => {
                ensure_order_free(&existing, order, None)?;
                order
            }
            None => existing.iter().map(|q| q.order).max().unwrap_or(0) + 1,
        };

        let question_text = sanitize_text(&request.question_text);
        if question_text.is_empty() {
            return Err(AppError::ValidationError(
                "question_text: must contain text".to_string(),
            ));
        }

        let question = Question::new(
            quiz_id,
            &question_text,
            request.marks,
            order,
            build_options(request.options)?,
        );

        let question = self.questions.create(question).await?;
        log::info!(
            "Added question {} to quiz {} at order {}",
            question.id,
            quiz_id,
            question.order
        );

        self.sync_question_count(quiz).await?;

        Ok(question.into())
    }

    pub async fn get_question(&self, id: &str) -> AppResult<QuestionDto> {
        Ok(self.find_question(id).await?.into())
    }

    pub async fn update_question(
        &self,
        id: &str,
        request: UpdateQuestionRequest,
    ) -> AppResult<QuestionDto> {
        request.validate()?;

        let mut question = self.find_question(id).await?;
        let quiz = self.find_quiz(&question.quiz_id).await?;
        let siblings = self.questions.find_by_quiz(&question.quiz_id).await?;

        if let Some(question_text) = sanitize_optional(request.question_text) {
            if question_text.is_empty() {
                return Err(AppError::ValidationError(
                    "question_text: must contain text".to_string(),
                ));
            }
            question.question_text = question_text;
        }
        if let Some(marks) = request.marks {
            question.marks = marks;
        }
        if let Some(order) = request.order {
            ensure_order_free(&siblings, order, Some(question.id.as_str()))?;
            question.order = order;
        }
        if let Some(options) = request.options {
            question.options = build_options(options)?;
        }

        if quiz.is_active {
            let after: Vec<Question> = siblings
                .into_iter()
                .map(|q| if q.id == question.id { question.clone() } else { q })
                .collect();
            check_active_quiz(&quiz, &after)?;
        }

        question.modified_at = Some(Utc::now());
        let question = self.questions.update(question).await?;
        log::info!("Updated question {}", question.id);
        Ok(question.into())
    }

    pub async fn delete_question(&self, id: &str) -> AppResult<()> {
        let question = self.find_question(id).await?;
        let quiz = self.find_quiz(&question.quiz_id).await?;

        let remaining: Vec<Question> = self
            .questions
            .find_by_quiz(&question.quiz_id)
            .await?
            .into_iter()
            .filter(|q| q.id != question.id)
            .collect();

        if quiz.is_active {
            check_active_quiz(&quiz, &remaining)?;
        }

        self.questions.delete(id).await?;
        log::info!("Deleted question {} from quiz {}", id, quiz.id);

        self.sync_question_count(quiz).await
    }

    /// Full questions including correctness flags.
    pub async fn list_questions_admin(&self, quiz_id: &str) -> AppResult<Vec<QuestionDto>> {
        self.find_quiz(quiz_id).await?;
        let questions = self.questions.find_by_quiz(quiz_id).await?;
        Ok(questions.into_iter().map(QuestionDto::from).collect())
    }

    /// Paginated questions of an active quiz with correctness flags stripped.
    pub async fn list_questions_for_student(
        &self,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<PaginatedResponse<StudentQuestionDto>> {
        let quiz = self.find_quiz(quiz_id).await?;
        if !quiz.is_active {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)));
        }

        let (questions, total) = self
            .questions
            .find_page_by_quiz(quiz_id, offset, limit)
            .await?;

        let data = questions.into_iter().map(StudentQuestionDto::from).collect();
        Ok(PaginatedResponse::new(data, offset, limit, total))
    }
}

fn ensure_order_free(existing: &[Question], order: i32, except_id: Option<&str>) -> AppResult<()> {
    let taken = existing
        .iter()
        .any(|q| q.order == order && Some(q.id.as_str()) != except_id);

    if taken {
        return Err(AppError::AlreadyExists(format!(
            "A question with order {} already exists in this quiz",
            order
        )));
    }
    Ok(())
}

fn build_options(inputs: Vec<OptionInput>) -> AppResult<Vec<QuestionOption>> {
    inputs
        .into_iter()
        .map(|input| {
            let text = sanitize_text(&input.text);
            if text.is_empty() {
                return Err(AppError::ValidationError(
                    "options: option text must contain text".to_string(),
                ));
            }
            let mut option = QuestionOption::new(&text, input.is_correct);
            if let Some(id) = input.id {
                option.id = id.trim().to_string();
            }
            Ok(option)
        })
        .collect()
}
