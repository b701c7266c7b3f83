//! crates/fitclub_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete database.

use crate::domain::{
    AdminCredentials, AdminUser, Question, QuestionDraft, QuizSubmission, Recommendation,
    RecommendationDraft,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Admin Accounts ---
    /// Creates the admin or replaces the password hash of an existing one.
    async fn upsert_admin(&self, email: &str, hashed_password: &str) -> PortResult<AdminUser>;

    async fn get_admin_by_email(&self, email: &str) -> PortResult<AdminCredentials>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        admin_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the admin id owning an unexpired session.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Questions & Answers ---
    /// Questions ordered by `order_index`, then id, each with ordered answers.
    async fn list_questions(&self, active_only: bool) -> PortResult<Vec<Question>>;

    async fn get_question(&self, question_id: i32) -> PortResult<Question>;

    async fn create_question(&self, draft: QuestionDraft) -> PortResult<Question>;

    /// Replaces the question and its whole answer set.
    async fn update_question(&self, question_id: i32, draft: QuestionDraft)
        -> PortResult<Question>;

    async fn delete_question(&self, question_id: i32) -> PortResult<()>;

    // --- Recommendations & Conditions ---
    /// Recommendations ordered by id, each with ordered conditions.
    async fn list_recommendations(&self, active_only: bool) -> PortResult<Vec<Recommendation>>;

    async fn get_recommendation(&self, recommendation_id: i32) -> PortResult<Recommendation>;

    async fn create_recommendation(
        &self,
        draft: RecommendationDraft,
    ) -> PortResult<Recommendation>;

    /// Replaces the recommendation and its whole condition set.
    async fn update_recommendation(
        &self,
        recommendation_id: i32,
        draft: RecommendationDraft,
    ) -> PortResult<Recommendation>;

    async fn delete_recommendation(&self, recommendation_id: i32) -> PortResult<()>;

    // --- Submission Log ---
    async fn save_submission(&self, submission: QuizSubmission) -> PortResult<()>;

    /// Newest first.
    async fn list_submissions(&self, limit: i64) -> PortResult<Vec<QuizSubmission>>;
}
