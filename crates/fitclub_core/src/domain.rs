//! crates/fitclub_core/src/domain.rs
//!
//! Defines the pure, core data structures for the quiz and its admin back-office.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// A visitor's chosen answers, keyed by question id (textual form).
pub type AnswerMap = BTreeMap<String, String>;

//=========================================================================================
// Questions & Answers
//=========================================================================================

/// How many answer values a question expects. Evaluation always receives one
/// chosen value per question, `Multiple` is kept for the admin UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Single,
    Multiple,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "single" => Some(QuestionType::Single),
            "multiple" => Some(QuestionType::Multiple),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single quiz prompt with its ordered answers.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub question_type: QuestionType,
    pub order_index: i32,
    pub is_active: bool,
    pub answers: Vec<Answer>,
}

/// One selectable option of a question.
#[derive(Debug, Clone)]
pub struct Answer {
    pub id: i32,
    pub question_id: i32,
    pub answer_text: String,
    /// Machine token compared by recommendation conditions.
    pub answer_value: String,
    pub order_index: i32,
}

/// Input for creating or replacing a question together with its answers.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub question: String,
    pub question_type: QuestionType,
    pub order_index: i32,
    pub is_active: bool,
    pub answers: Vec<AnswerDraft>,
}

#[derive(Debug, Clone)]
pub struct AnswerDraft {
    pub answer_text: String,
    pub answer_value: String,
    pub order_index: i32,
}

//=========================================================================================
// Recommendations & Conditions
//=========================================================================================

/// The comparison a condition applies to the visitor's chosen value.
///
/// Rule data is admin-authored, so an operator string the engine does not know
/// is kept as `Unknown` and never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionOperator {
    In,
    NotIn,
    Equals,
    Unknown(String),
}

impl ConditionOperator {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "in" => ConditionOperator::In,
            "not_in" => ConditionOperator::NotIn,
            "equals" => ConditionOperator::Equals,
            other => ConditionOperator::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::In => "in",
            ConditionOperator::NotIn => "not_in",
            ConditionOperator::Equals => "equals",
            ConditionOperator::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ConditionOperator::Unknown(_))
    }
}

/// A predicate over one question's chosen value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Textual id of the inspected question. Admins may author it as a number
    /// or a string, so it is compared on its trimmed text.
    pub question_id: String,
    pub operator: ConditionOperator,
    pub answer_values: Vec<String>,
}

/// An admin-authored outcome returned when all of its conditions hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Higher priority is shown first.
    pub priority: i32,
    pub conditions: Vec<Condition>,
    pub trainer_ids: Vec<i32>,
    pub direction_ids: Vec<i32>,
    pub club_ids: Vec<i32>,
    pub is_active: bool,
}

/// Input for creating or replacing a recommendation together with its conditions.
#[derive(Debug, Clone)]
pub struct RecommendationDraft {
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub conditions: Vec<Condition>,
    pub trainer_ids: Vec<i32>,
    pub direction_ids: Vec<i32>,
    pub club_ids: Vec<i32>,
    pub is_active: bool,
}

//=========================================================================================
// Submission Log
//=========================================================================================

/// Audit record of one completed quiz. Written once, never read by evaluation.
#[derive(Debug, Clone)]
pub struct QuizSubmission {
    pub id: Uuid,
    pub session_id: String,
    pub answers: AnswerMap,
    /// Ranked ids of the matched recommendations.
    pub recommendation_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Admin accounts
//=========================================================================================

// Represents an admin - used throughout app
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a back-office login session (cookie or bearer token)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub admin_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
