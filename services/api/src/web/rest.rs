//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification and the shared
//! mapping from port errors to HTTP responses.

use crate::web::{admin, auth, dto, quiz};
use axum::http::StatusCode;
use fitclub_core::ports::PortError;
use tracing::error;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        quiz::list_questions_handler,
        quiz::submit_quiz_handler,
        auth::login_handler,
        auth::logout_handler,
        admin::list_all_questions_handler,
        admin::create_question_handler,
        admin::update_question_handler,
        admin::delete_question_handler,
        admin::list_recommendations_handler,
        admin::get_recommendation_handler,
        admin::create_recommendation_handler,
        admin::update_recommendation_handler,
        admin::delete_recommendation_handler,
        admin::list_submissions_handler,
    ),
    components(
        schemas(
            dto::QuestionView,
            dto::AnswerView,
            dto::SubmitQuizRequest,
            dto::SubmitQuizResponse,
            dto::RecommendationView,
            dto::AdminQuestionView,
            dto::QuestionPayload,
            dto::AnswerPayload,
            dto::RecommendationPayload,
            dto::ConditionPayload,
            dto::QuestionRef,
            dto::ConditionView,
            dto::AdminRecommendationView,
            dto::SubmissionView,
            auth::LoginRequest,
            auth::AuthResponse,
        )
    ),
    tags(
        (name = "Fitness Club Quiz API", description = "Quiz recommendations and their admin back-office.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Maps a port error to a status code. Unexpected errors are logged and
/// answered with `context` only.
pub(crate) fn port_error_response(e: PortError, context: &str) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(detail) => {
            error!("{}: {}", context, detail);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_statuses() {
        let (status, msg) = port_error_response(PortError::NotFound("Question 9 not found".into()), "ctx");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(msg, "Question 9 not found");

        let (status, msg) = port_error_response(PortError::Unexpected("pool timed out".into()), "Failed");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Failed");
    }

    #[test]
    fn openapi_document_lists_quiz_paths() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/quiz/submit"));
        assert!(doc.paths.paths.contains_key("/admin/quiz/recommendations/{id}"));
    }
}
