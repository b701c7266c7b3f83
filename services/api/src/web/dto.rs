//! services/api/src/web/dto.rs
//!
//! JSON payloads exchanged with the quiz front-end and the admin back-office,
//! plus their conversions from core domain types.

use chrono::{DateTime, Utc};
use fitclub_core::domain::{Answer, Condition, Question, QuizSubmission, Recommendation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Public Quiz Payloads
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AnswerView {
    pub id: i32,
    pub answer_text: String,
    pub answer_value: String,
    pub order_index: i32,
}

impl From<Answer> for AnswerView {
    fn from(answer: Answer) -> Self {
        Self {
            id: answer.id,
            answer_text: answer.answer_text,
            answer_value: answer.answer_value,
            order_index: answer.order_index,
        }
    }
}

/// A quiz question as rendered by the front-end.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct QuestionView {
    pub id: i32,
    pub question: String,
    pub question_type: String,
    pub order_index: i32,
    pub answers: Vec<AnswerView>,
}

impl From<Question> for QuestionView {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question: question.question,
            question_type: question.question_type.to_string(),
            order_index: question.order_index,
            answers: question.answers.into_iter().map(AnswerView::from).collect(),
        }
    }
}

/// The body of `POST /quiz/submit`.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct SubmitQuizRequest {
    /// Client-generated session identifier. A blank value gets a server-side one.
    #[serde(default)]
    pub session_id: String,
    /// Chosen answer value per question id.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

/// A matched recommendation. Reference ids are returned unresolved.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct RecommendationView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub trainer_ids: Vec<i32>,
    pub direction_ids: Vec<i32>,
    pub club_ids: Vec<i32>,
    pub priority: i32,
}

impl From<&Recommendation> for RecommendationView {
    fn from(rec: &Recommendation) -> Self {
        Self {
            id: rec.id,
            name: rec.name.clone(),
            description: rec.description.clone(),
            trainer_ids: rec.trainer_ids.clone(),
            direction_ids: rec.direction_ids.clone(),
            club_ids: rec.club_ids.clone(),
            priority: rec.priority,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SubmitQuizResponse {
    pub success: bool,
    /// Ranked by descending priority. May be empty.
    pub recommendations: Vec<RecommendationView>,
}

//=========================================================================================
// Admin Payloads
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AdminQuestionView {
    #[serde(flatten)]
    pub question: QuestionView,
    pub is_active: bool,
}

impl From<Question> for AdminQuestionView {
    fn from(question: Question) -> Self {
        let is_active = question.is_active;
        Self {
            question: QuestionView::from(question),
            is_active,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct AnswerPayload {
    pub answer_text: String,
    pub answer_value: String,
    /// Defaults to the answer's position in the list.
    #[serde(default)]
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct QuestionPayload {
    pub question: String,
    #[serde(default = "default_question_type")]
    pub question_type: String,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub answers: Vec<AnswerPayload>,
}

/// Admins author question ids either as numbers or as strings. Numeric
/// strings are canonicalised, so `"01"` refers to question `1`.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
#[serde(untagged)]
pub enum QuestionRef {
    Number(i64),
    Text(String),
}

impl QuestionRef {
    pub fn to_text(&self) -> String {
        match self {
            QuestionRef::Number(n) => n.to_string(),
            QuestionRef::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => n.to_string(),
                Err(_) => s.trim().to_string(),
            },
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct ConditionPayload {
    pub question_id: QuestionRef,
    pub operator: String,
    #[serde(default)]
    pub answer_values: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct RecommendationPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub conditions: Vec<ConditionPayload>,
    #[serde(default)]
    pub trainer_ids: Vec<i32>,
    #[serde(default)]
    pub direction_ids: Vec<i32>,
    #[serde(default)]
    pub club_ids: Vec<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ConditionView {
    pub question_id: String,
    pub operator: String,
    pub answer_values: Vec<String>,
}

impl From<Condition> for ConditionView {
    fn from(condition: Condition) -> Self {
        Self {
            question_id: condition.question_id,
            operator: condition.operator.as_str().to_string(),
            answer_values: condition.answer_values,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AdminRecommendationView {
    #[serde(flatten)]
    pub recommendation: RecommendationView,
    pub conditions: Vec<ConditionView>,
    pub is_active: bool,
}

impl From<Recommendation> for AdminRecommendationView {
    fn from(rec: Recommendation) -> Self {
        let recommendation = RecommendationView::from(&rec);
        Self {
            recommendation,
            conditions: rec.conditions.into_iter().map(ConditionView::from).collect(),
            is_active: rec.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SubmissionView {
    pub id: Uuid,
    pub session_id: String,
    pub answers: BTreeMap<String, String>,
    pub recommendation_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<QuizSubmission> for SubmissionView {
    fn from(submission: QuizSubmission) -> Self {
        Self {
            id: submission.id,
            session_id: submission.session_id,
            answers: submission.answers,
            recommendation_ids: submission.recommendation_ids,
            created_at: submission.created_at,
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubmissionsQuery {
    /// Maximum number of records, newest first (1..=500, default 50).
    pub limit: Option<i64>,
}

fn default_question_type() -> String {
    "single".to_string()
}

fn default_true() -> bool {
    true
}
