use actix_web::{delete, get, patch, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{CreateQuizRequest, PaginationParams, UpdateQuizRequest},
        response::MessageResponse,
    },
};

#[post("/api/admin/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.create_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[get("/api/admin/quizzes")]
pub async fn list_all_quizzes(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let response = state
        .quiz_service
        .list_quizzes(false, pagination.offset(), state.page_limit(&pagination))
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/admin/quizzes/{id}")]
pub async fn get_quiz_admin(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[patch("/api/admin/quizzes/{id}")]
pub async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .update_quiz(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/api/admin/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Quiz '{}' deleted", id),
    }))
}

#[get("/api/quizzes")]
pub async fn list_active_quizzes(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let response = state
        .quiz_service
        .list_quizzes(true, pagination.offset(), state.page_limit(&pagination))
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/quizzes/{id}")]
pub async fn get_active_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_active_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}
