use actix_web::{delete, get, patch, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{CreateQuestionRequest, PaginationParams, UpdateQuestionRequest},
        response::MessageResponse,
    },
};

#[post("/api/admin/quizzes/{quiz_id}/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<CreateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .create_question(&quiz_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}

#[get("/api/admin/quizzes/{quiz_id}/questions")]
pub async fn list_questions_admin(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let questions = state.question_service.list_questions_admin(&quiz_id).await?;
    Ok(HttpResponse::Ok().json(questions))
}

#[get("/api/admin/questions/{id}")]
pub async fn get_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let question = state.question_service.get_question(&id).await?;
    Ok(HttpResponse::Ok().json(question))
}

#[patch("/api/admin/questions/{id}")]
pub async fn update_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .update_question(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[delete("/api/admin/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.question_service.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Question '{}' deleted", id),
    }))
}

/// Student view: paginated, correctness flags stripped.
#[get("/api/quizzes/{quiz_id}/questions")]
pub async fn list_questions_for_student(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let response = state
        .question_service
        .list_questions_for_student(&quiz_id, pagination.offset(), state.page_limit(&pagination))
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
