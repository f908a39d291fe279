pub mod attempt_handler;
pub mod health_handler;
pub mod question_handler;
pub mod quiz_handler;

use actix_web::web;

use crate::errors::AppError;

/// Registers every route of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(256 * 1024)
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    );

    cfg.service(health_handler::health_check)
        .service(health_handler::health_check_live)
        .service(health_handler::health_check_ready)
        // admin
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::list_all_quizzes)
        .service(quiz_handler::get_quiz_admin)
        .service(quiz_handler::update_quiz)
        .service(quiz_handler::delete_quiz)
        .service(question_handler::create_question)
        .service(question_handler::list_questions_admin)
        .service(question_handler::get_question)
        .service(question_handler::update_question)
        .service(question_handler::delete_question)
        .service(attempt_handler::get_attempt_admin)
        // student
        .service(quiz_handler::list_active_quizzes)
        .service(quiz_handler::get_active_quiz)
        .service(question_handler::list_questions_for_student)
        .service(attempt_handler::submit_attempt)
        .service(attempt_handler::list_student_attempts)
        .service(attempt_handler::review_attempt);
}
