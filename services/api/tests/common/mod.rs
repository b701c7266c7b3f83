#![allow(dead_code)]

use api_lib::config::Config;
use api_lib::web::{auth::hash_password, build_router, state::AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use fitclub_core::domain::{
    AdminCredentials, AdminUser, Answer, Question, QuestionDraft, QuizSubmission, Recommendation,
    RecommendationDraft,
};
use fitclub_core::ports::{DatabaseService, PortError, PortResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@club.test";
pub const ADMIN_PASSWORD: &str = "s3cret-pass";

#[derive(Default)]
struct Tables {
    admins: Vec<AdminCredentials>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    questions: Vec<Question>,
    recommendations: Vec<Recommendation>,
    submissions: Vec<QuizSubmission>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn build_question(&mut self, id: i32, draft: QuestionDraft) -> Question {
        let answers = draft
            .answers
            .into_iter()
            .map(|a| Answer {
                id: self.next_id(),
                question_id: id,
                answer_text: a.answer_text,
                answer_value: a.answer_value,
                order_index: a.order_index,
            })
            .collect();
        Question {
            id,
            question: draft.question,
            question_type: draft.question_type,
            order_index: draft.order_index,
            is_active: draft.is_active,
            answers,
        }
    }
}

fn build_recommendation(id: i32, draft: RecommendationDraft) -> Recommendation {
    Recommendation {
        id,
        name: draft.name,
        description: draft.description,
        priority: draft.priority,
        conditions: draft.conditions,
        trainer_ids: draft.trainer_ids,
        direction_ids: draft.direction_ids,
        club_ids: draft.club_ids,
        is_active: draft.is_active,
    }
}

/// A `DatabaseService` kept entirely in memory.
#[derive(Default)]
pub struct InMemoryDb {
    tables: Mutex<Tables>,
    fail_submissions: bool,
}

impl InMemoryDb {
    /// A store whose submission log always fails to write.
    pub fn with_failing_audit_log() -> Self {
        Self {
            fail_submissions: true,
            ..Self::default()
        }
    }

    pub fn submissions(&self) -> Vec<QuizSubmission> {
        self.tables.lock().unwrap().submissions.clone()
    }
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn upsert_admin(&self, email: &str, hashed_password: &str) -> PortResult<AdminUser> {
        let mut t = self.tables.lock().unwrap();
        if let Some(existing) = t.admins.iter_mut().find(|a| a.email == email) {
            existing.hashed_password = hashed_password.to_string();
            return Ok(AdminUser {
                id: existing.id,
                email: existing.email.clone(),
            });
        }
        let creds = AdminCredentials {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        let user = AdminUser {
            id: creds.id,
            email: creds.email.clone(),
        };
        t.admins.push(creds);
        Ok(user)
    }

    async fn get_admin_by_email(&self, email: &str) -> PortResult<AdminCredentials> {
        let t = self.tables.lock().unwrap();
        t.admins
            .iter()
            .find(|a| a.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Admin {} not found", email)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        admin_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut t = self.tables.lock().unwrap();
        t.sessions
            .insert(session_id.to_string(), (admin_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let t = self.tables.lock().unwrap();
        match t.sessions.get(session_id) {
            Some((admin_id, expires_at)) if *expires_at > Utc::now() => Ok(*admin_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.tables.lock().unwrap().sessions.remove(session_id);
        Ok(())
    }

    async fn list_questions(&self, active_only: bool) -> PortResult<Vec<Question>> {
        let t = self.tables.lock().unwrap();
        let mut questions: Vec<Question> = t
            .questions
            .iter()
            .filter(|q| q.is_active || !active_only)
            .cloned()
            .collect();
        questions.sort_by_key(|q| (q.order_index, q.id));
        Ok(questions)
    }

    async fn get_question(&self, question_id: i32) -> PortResult<Question> {
        let t = self.tables.lock().unwrap();
        t.questions
            .iter()
            .find(|q| q.id == question_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Question {} not found", question_id)))
    }

    async fn create_question(&self, draft: QuestionDraft) -> PortResult<Question> {
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        let question = t.build_question(id, draft);
        t.questions.push(question.clone());
        Ok(question)
    }

    async fn update_question(
        &self,
        question_id: i32,
        draft: QuestionDraft,
    ) -> PortResult<Question> {
        let mut t = self.tables.lock().unwrap();
        let position = t
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or_else(|| PortError::NotFound(format!("Question {} not found", question_id)))?;
        let question = t.build_question(question_id, draft);
        t.questions[position] = question.clone();
        Ok(question)
    }

    async fn delete_question(&self, question_id: i32) -> PortResult<()> {
        let mut t = self.tables.lock().unwrap();
        let before = t.questions.len();
        t.questions.retain(|q| q.id != question_id);
        if t.questions.len() == before {
            return Err(PortError::NotFound(format!("Question {} not found", question_id)));
        }
        Ok(())
    }

    async fn list_recommendations(&self, active_only: bool) -> PortResult<Vec<Recommendation>> {
        let t = self.tables.lock().unwrap();
        Ok(t.recommendations
            .iter()
            .filter(|r| r.is_active || !active_only)
            .cloned()
            .collect())
    }

    async fn get_recommendation(&self, recommendation_id: i32) -> PortResult<Recommendation> {
        let t = self.tables.lock().unwrap();
        t.recommendations
            .iter()
            .find(|r| r.id == recommendation_id)
            .cloned()
            .ok_or_else(|| {
                PortError::NotFound(format!("Recommendation {} not found", recommendation_id))
            })
    }

    async fn create_recommendation(
        &self,
        draft: RecommendationDraft,
    ) -> PortResult<Recommendation> {
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        let recommendation = build_recommendation(id, draft);
        t.recommendations.push(recommendation.clone());
        Ok(recommendation)
    }

    async fn update_recommendation(
        &self,
        recommendation_id: i32,
        draft: RecommendationDraft,
    ) -> PortResult<Recommendation> {
        let mut t = self.tables.lock().unwrap();
        let slot = t
            .recommendations
            .iter_mut()
            .find(|r| r.id == recommendation_id)
            .ok_or_else(|| {
                PortError::NotFound(format!("Recommendation {} not found", recommendation_id))
            })?;
        *slot = build_recommendation(recommendation_id, draft);
        Ok(slot.clone())
    }

    async fn delete_recommendation(&self, recommendation_id: i32) -> PortResult<()> {
        let mut t = self.tables.lock().unwrap();
        let before = t.recommendations.len();
        t.recommendations.retain(|r| r.id != recommendation_id);
        if t.recommendations.len() == before {
            return Err(PortError::NotFound(format!(
                "Recommendation {} not found",
                recommendation_id
            )));
        }
        Ok(())
    }

    async fn save_submission(&self, submission: QuizSubmission) -> PortResult<()> {
        if self.fail_submissions {
            return Err(PortError::Unexpected("submission table unavailable".to_string()));
        }
        self.tables.lock().unwrap().submissions.push(submission);
        Ok(())
    }

    async fn list_submissions(&self, limit: i64) -> PortResult<Vec<QuizSubmission>> {
        let t = self.tables.lock().unwrap();
        Ok(t.submissions
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused/fitclub".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Builds the full router over `db` and registers the test admin.
pub async fn app_with(db: Arc<InMemoryDb>) -> Router {
    let hashed = hash_password(ADMIN_PASSWORD).unwrap();
    db.upsert_admin(ADMIN_EMAIL, &hashed).await.unwrap();

    let state = Arc::new(AppState::new(db, Arc::new(test_config())));
    build_router(state).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn authed_json(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    let mut request = json_request(method, uri, body);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

pub fn authed_empty(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Logs the test admin in and returns the bearer token.
pub async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            &serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}
