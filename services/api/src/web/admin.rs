//! services/api/src/web/admin.rs
//!
//! Admin back-office endpoints for quiz content. Every route here sits behind
//! `require_auth`, which puts the admin id into the request extensions.

use crate::web::dto::{
    AdminQuestionView, AdminRecommendationView, QuestionPayload, RecommendationPayload,
    SubmissionView, SubmissionsQuery,
};
use crate::web::rest::port_error_response;
use crate::web::state::AppState;
use crate::web::validation::{question_draft, recommendation_draft};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const DEFAULT_SUBMISSION_LIMIT: i64 = 50;
const MAX_SUBMISSION_LIMIT: i64 = 500;

//=========================================================================================
// Questions
//=========================================================================================

/// List all questions, inactive included.
#[utoipa::path(
    get,
    path = "/admin/quiz/questions",
    responses(
        (status = 200, description = "All questions", body = [AdminQuestionView]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_all_questions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let questions = state
        .db
        .list_questions(false)
        .await
        .map_err(|e| port_error_response(e, "Failed to load questions"))?;

    let views: Vec<AdminQuestionView> =
        questions.into_iter().map(AdminQuestionView::from).collect();
    Ok(Json(views))
}

/// Create a question with its answers.
#[utoipa::path(
    post,
    path = "/admin/quiz/questions",
    request_body = QuestionPayload,
    responses(
        (status = 201, description = "Question created", body = AdminQuestionView),
        (status = 400, description = "Invalid question"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn create_question_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<Uuid>,
    Json(payload): Json<QuestionPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let draft = question_draft(payload).map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    let question = state
        .db
        .create_question(draft)
        .await
        .map_err(|e| port_error_response(e, "Failed to create question"))?;

    info!(%admin_id, question_id = question.id, "Quiz question created");
    Ok((StatusCode::CREATED, Json(AdminQuestionView::from(question))))
}

/// Replace a question and its whole answer set.
#[utoipa::path(
    put,
    path = "/admin/quiz/questions/{id}",
    request_body = QuestionPayload,
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question updated", body = AdminQuestionView),
        (status = 400, description = "Invalid question"),
        (status = 404, description = "No such question")
    )
)]
pub async fn update_question_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<Uuid>,
    Path(id): Path<i32>,
    Json(payload): Json<QuestionPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let draft = question_draft(payload).map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    let question = state
        .db
        .update_question(id, draft)
        .await
        .map_err(|e| port_error_response(e, "Failed to update question"))?;

    info!(%admin_id, question_id = id, "Quiz question updated");
    Ok(Json(AdminQuestionView::from(question)))
}

/// Delete a question together with its answers.
#[utoipa::path(
    delete,
    path = "/admin/quiz/questions/{id}",
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 404, description = "No such question")
    )
)]
pub async fn delete_question_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<Uuid>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .db
        .delete_question(id)
        .await
        .map_err(|e| port_error_response(e, "Failed to delete question"))?;

    info!(%admin_id, question_id = id, "Quiz question deleted");
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Recommendations
//=========================================================================================

/// List all recommendations with their conditions, inactive included.
#[utoipa::path(
    get,
    path = "/admin/quiz/recommendations",
    responses(
        (status = 200, description = "All recommendations", body = [AdminRecommendationView]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_recommendations_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let recommendations = state
        .db
        .list_recommendations(false)
        .await
        .map_err(|e| port_error_response(e, "Failed to load recommendations"))?;

    let views: Vec<AdminRecommendationView> = recommendations
        .into_iter()
        .map(AdminRecommendationView::from)
        .collect();
    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/admin/quiz/recommendations/{id}",
    params(("id" = i32, Path, description = "Recommendation id")),
    responses(
        (status = 200, description = "The recommendation", body = AdminRecommendationView),
        (status = 404, description = "No such recommendation")
    )
)]
pub async fn get_recommendation_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let recommendation = state
        .db
        .get_recommendation(id)
        .await
        .map_err(|e| port_error_response(e, "Failed to load recommendation"))?;

    Ok(Json(AdminRecommendationView::from(recommendation)))
}

#[utoipa::path(
    post,
    path = "/admin/quiz/recommendations",
    request_body = RecommendationPayload,
    responses(
        (status = 201, description = "Recommendation created", body = AdminRecommendationView),
        (status = 400, description = "Invalid recommendation"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn create_recommendation_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<Uuid>,
    Json(payload): Json<RecommendationPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let draft = recommendation_draft(payload).map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    let recommendation = state
        .db
        .create_recommendation(draft)
        .await
        .map_err(|e| port_error_response(e, "Failed to create recommendation"))?;

    info!(%admin_id, recommendation_id = recommendation.id, "Recommendation created");
    Ok((
        StatusCode::CREATED,
        Json(AdminRecommendationView::from(recommendation)),
    ))
}

/// Replace a recommendation and its whole condition set.
#[utoipa::path(
    put,
    path = "/admin/quiz/recommendations/{id}",
    request_body = RecommendationPayload,
    params(("id" = i32, Path, description = "Recommendation id")),
    responses(
        (status = 200, description = "Recommendation updated", body = AdminRecommendationView),
        (status = 400, description = "Invalid recommendation"),
        (status = 404, description = "No such recommendation")
    )
)]
pub async fn update_recommendation_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<Uuid>,
    Path(id): Path<i32>,
    Json(payload): Json<RecommendationPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let draft = recommendation_draft(payload).map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    let recommendation = state
        .db
        .update_recommendation(id, draft)
        .await
        .map_err(|e| port_error_response(e, "Failed to update recommendation"))?;

    info!(%admin_id, recommendation_id = id, "Recommendation updated");
    Ok(Json(AdminRecommendationView::from(recommendation)))
}

#[utoipa::path(
    delete,
    path = "/admin/quiz/recommendations/{id}",
    params(("id" = i32, Path, description = "Recommendation id")),
    responses(
        (status = 204, description = "Recommendation deleted"),
        (status = 404, description = "No such recommendation")
    )
)]
pub async fn delete_recommendation_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<Uuid>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .db
        .delete_recommendation(id)
        .await
        .map_err(|e| port_error_response(e, "Failed to delete recommendation"))?;

    info!(%admin_id, recommendation_id = id, "Recommendation deleted");
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Submission Log
//=========================================================================================

/// Inspect recent quiz submissions, newest first.
#[utoipa::path(
    get,
    path = "/admin/quiz/submissions",
    params(SubmissionsQuery),
    responses(
        (status = 200, description = "Recent submissions", body = [SubmissionView]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_submissions_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubmissionsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SUBMISSION_LIMIT)
        .clamp(1, MAX_SUBMISSION_LIMIT);

    let submissions = state
        .db
        .list_submissions(limit)
        .await
        .map_err(|e| port_error_response(e, "Failed to load submissions"))?;

    let views: Vec<SubmissionView> = submissions.into_iter().map(SubmissionView::from).collect();
    Ok(Json(views))
}
