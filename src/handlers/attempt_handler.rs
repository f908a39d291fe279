use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{AttemptListQuery, SubmitAttemptRequest},
};

#[post("/api/quizzes/{quiz_id}/attempts")]
pub async fn submit_attempt(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .attempt_service
        .submit_attempt(&quiz_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}

#[get("/api/students/{student_id}/attempts")]
pub async fn list_student_attempts(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
    query: web::Query<AttemptListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;
    let pagination = query.pagination();

    let response = state
        .attempt_service
        .list_student_attempts(
            &student_id,
            query.quiz_id,
            pagination.offset(),
            state.page_limit(&pagination),
        )
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/students/{student_id}/attempts/{attempt_id}")]
pub async fn review_attempt(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (student_id, attempt_id) = path.into_inner();
    let review = state
        .attempt_service
        .review_attempt(&student_id, &attempt_id)
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

#[get("/api/admin/attempts/{id}")]
pub async fn get_attempt_admin(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let attempt = state.attempt_service.get_attempt(&id).await?;
    Ok(HttpResponse::Ok().json(attempt))
}
