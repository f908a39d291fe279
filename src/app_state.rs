use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AttemptRepository, MongoAttemptRepository, MongoQuestionRepository, MongoQuizRepository,
        QuestionRepository, QuizRepository,
    },
    services::{AttemptService, QuestionService, QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub question_service: Arc<QuestionService>,
    pub attempt_service: Arc<AttemptService>,
    /// Absent when the state is built over non-Mongo repositories.
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let mut state = Self::from_repositories(
            config,
            quiz_repository,
            question_repository,
            attempt_repository,
        );
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_repositories(
        config: Config,
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        let quiz_service = Arc::new(QuizService::new(quizzes.clone(), questions.clone()));
        let question_service = Arc::new(QuestionService::new(quizzes.clone(), questions.clone()));
        let attempt_service = Arc::new(AttemptService::new(quizzes, questions, attempts));

        Self {
            quiz_service,
            question_service,
            attempt_service,
            db: None,
            config: Arc::new(config),
        }
    }

    pub fn page_limit(&self, requested: &crate::models::dto::request::PaginationParams) -> i64 {
        requested.limit(self.config.default_page_size, self.config.max_page_size)
    }
}
