//! services/api/src/web/quiz.rs
//!
//! Public quiz endpoints: the question list and answer submission.

use crate::web::dto::{QuestionView, RecommendationView, SubmitQuizRequest, SubmitQuizResponse};
use crate::web::rest::port_error_response;
use crate::web::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::warn;

/// List the active quiz questions with their answers.
///
/// An unconfigured quiz returns an empty list.
#[utoipa::path(
    get,
    path = "/quiz/questions",
    responses(
        (status = 200, description = "Active questions in display order", body = [QuestionView]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_questions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let questions = state
        .db
        .list_questions(true)
        .await
        .map_err(|e| port_error_response(e, "Failed to load quiz questions"))?;

    if questions.is_empty() {
        warn!("Quiz requested but no active questions are configured");
    }

    let views: Vec<QuestionView> = questions.into_iter().map(QuestionView::from).collect();
    Ok(Json(views))
}

/// Submit quiz answers and receive ranked recommendations.
#[utoipa::path(
    post,
    path = "/quiz/submit",
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Ranked recommendations (possibly empty)", body = SubmitQuizResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_quiz_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let outcome = state
        .quiz
        .submit(&req.session_id, req.answers)
        .await
        .map_err(|e| port_error_response(e, "Failed to evaluate quiz, please try again"))?;

    let response = SubmitQuizResponse {
        success: true,
        recommendations: outcome
            .recommendations
            .iter()
            .map(RecommendationView::from)
            .collect(),
    };
    Ok(Json(response))
}
