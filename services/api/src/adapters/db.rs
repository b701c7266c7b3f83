//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitclub_core::domain::{
    AdminCredentials, AdminUser, Answer, AnswerMap, Condition, ConditionOperator, Question,
    QuestionDraft, QuestionType, QuizSubmission, Recommendation, RecommendationDraft,
};
use fitclub_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found_or_unexpected(e: sqlx::Error, what: String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct AdminRecord {
    id: Uuid,
    email: String,
}
impl AdminRecord {
    fn to_domain(self) -> AdminUser {
        AdminUser {
            id: self.id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct AdminCredentialsRecord {
    id: Uuid,
    email: String,
    hashed_password: String,
}
impl AdminCredentialsRecord {
    fn to_domain(self) -> AdminCredentials {
        AdminCredentials {
            id: self.id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct QuestionRecord {
    id: i32,
    question: String,
    question_type: String,
    order_index: i32,
    is_active: bool,
}
impl QuestionRecord {
    fn to_domain(self, answers: Vec<Answer>) -> PortResult<Question> {
        let question_type = QuestionType::parse(&self.question_type).ok_or_else(|| {
            PortError::Unexpected(format!(
                "Question {} has unknown type '{}'",
                self.id, self.question_type
            ))
        })?;
        Ok(Question {
            id: self.id,
            question: self.question,
            question_type,
            order_index: self.order_index,
            is_active: self.is_active,
            answers,
        })
    }
}

#[derive(FromRow)]
struct AnswerRecord {
    id: i32,
    question_id: i32,
    answer_text: String,
    answer_value: String,
    order_index: i32,
}
impl AnswerRecord {
    fn to_domain(self) -> Answer {
        Answer {
            id: self.id,
            question_id: self.question_id,
            answer_text: self.answer_text,
            answer_value: self.answer_value,
            order_index: self.order_index,
        }
    }
}

#[derive(FromRow)]
struct RecommendationRecord {
    id: i32,
    name: String,
    description: String,
    priority: i32,
    trainer_ids: Vec<i32>,
    direction_ids: Vec<i32>,
    club_ids: Vec<i32>,
    is_active: bool,
}
impl RecommendationRecord {
    fn to_domain(self, conditions: Vec<Condition>) -> Recommendation {
        Recommendation {
            id: self.id,
            name: self.name,
            description: self.description,
            priority: self.priority,
            conditions,
            trainer_ids: self.trainer_ids,
            direction_ids: self.direction_ids,
            club_ids: self.club_ids,
            is_active: self.is_active,
        }
    }
}

#[derive(FromRow)]
struct ConditionRecord {
    recommendation_id: i32,
    question_id: String,
    operator: String,
    answer_values: Vec<String>,
}
impl ConditionRecord {
    fn to_domain(self) -> Condition {
        Condition {
            question_id: self.question_id,
            operator: ConditionOperator::parse(&self.operator),
            answer_values: self.answer_values,
        }
    }
}

#[derive(FromRow)]
struct SubmissionRecord {
    id: Uuid,
    session_id: String,
    answers: Json<AnswerMap>,
    recommendation_ids: Vec<i32>,
    created_at: DateTime<Utc>,
}
impl SubmissionRecord {
    fn to_domain(self) -> QuizSubmission {
        QuizSubmission {
            id: self.id,
            session_id: self.session_id,
            answers: self.answers.0,
            recommendation_ids: self.recommendation_ids,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// Row Loading & Child Writes
//=========================================================================================

impl DbAdapter {
    async fn attach_answers(&self, records: Vec<QuestionRecord>) -> PortResult<Vec<Question>> {
        let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let answers = sqlx::query_as::<_, AnswerRecord>(
            "SELECT id, question_id, answer_text, answer_value, order_index FROM quiz_answers \
             WHERE question_id = ANY($1) ORDER BY order_index ASC, id ASC",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut by_question: HashMap<i32, Vec<Answer>> = HashMap::new();
        for answer in answers {
            by_question
                .entry(answer.question_id)
                .or_default()
                .push(answer.to_domain());
        }

        records
            .into_iter()
            .map(|r| {
                let answers = by_question.remove(&r.id).unwrap_or_default();
                r.to_domain(answers)
            })
            .collect()
    }

    async fn attach_conditions(
        &self,
        records: Vec<RecommendationRecord>,
    ) -> PortResult<Vec<Recommendation>> {
        let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let conditions = sqlx::query_as::<_, ConditionRecord>(
            "SELECT recommendation_id, question_id, operator, answer_values \
             FROM quiz_recommendation_conditions \
             WHERE recommendation_id = ANY($1) ORDER BY order_index ASC, id ASC",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut by_rec: HashMap<i32, Vec<Condition>> = HashMap::new();
        for condition in conditions {
            by_rec
                .entry(condition.recommendation_id)
                .or_default()
                .push(condition.to_domain());
        }

        Ok(records
            .into_iter()
            .map(|r| {
                let conditions = by_rec.remove(&r.id).unwrap_or_default();
                r.to_domain(conditions)
            })
            .collect())
    }
}

async fn insert_answers(
    conn: &mut PgConnection,
    question_id: i32,
    draft: &QuestionDraft,
) -> Result<(), sqlx::Error> {
    for answer in &draft.answers {
        sqlx::query(
            "INSERT INTO quiz_answers (question_id, answer_text, answer_value, order_index) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(question_id)
        .bind(&answer.answer_text)
        .bind(&answer.answer_value)
        .bind(answer.order_index)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_conditions(
    conn: &mut PgConnection,
    recommendation_id: i32,
    draft: &RecommendationDraft,
) -> Result<(), sqlx::Error> {
    for (index, condition) in draft.conditions.iter().enumerate() {
        sqlx::query(
            "INSERT INTO quiz_recommendation_conditions \
             (recommendation_id, question_id, operator, answer_values, order_index) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(recommendation_id)
        .bind(condition.question_id.trim())
        .bind(condition.operator.as_str())
        .bind(&condition.answer_values)
        .bind(index as i32)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn upsert_admin(&self, email: &str, hashed_password: &str) -> PortResult<AdminUser> {
        let record = sqlx::query_as::<_, AdminRecord>(
            "INSERT INTO admin_users (id, email, hashed_password) VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO UPDATE SET hashed_password = EXCLUDED.hashed_password \
             RETURNING id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_admin_by_email(&self, email: &str) -> PortResult<AdminCredentials> {
        let record = sqlx::query_as::<_, AdminCredentialsRecord>(
            "SELECT id, email, hashed_password FROM admin_users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("Admin {} not found", email)))?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        admin_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO admin_sessions (id, admin_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(admin_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let admin_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT admin_id FROM admin_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(admin_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn list_questions(&self, active_only: bool) -> PortResult<Vec<Question>> {
        let records = sqlx::query_as::<_, QuestionRecord>(
            "SELECT id, question, question_type, order_index, is_active FROM quiz_questions \
             WHERE is_active OR NOT $1 ORDER BY order_index ASC, id ASC",
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        self.attach_answers(records).await
    }

    async fn get_question(&self, question_id: i32) -> PortResult<Question> {
        let record = sqlx::query_as::<_, QuestionRecord>(
            "SELECT id, question, question_type, order_index, is_active FROM quiz_questions \
             WHERE id = $1",
        )
        .bind(question_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("Question {} not found", question_id)))?;

        self.attach_answers(vec![record])
            .await?
            .pop()
            .ok_or_else(|| PortError::NotFound(format!("Question {} not found", question_id)))
    }

    async fn create_question(&self, draft: QuestionDraft) -> PortResult<Question> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let question_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO quiz_questions (question, question_type, order_index, is_active) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&draft.question)
        .bind(draft.question_type.as_str())
        .bind(draft.order_index)
        .bind(draft.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        insert_answers(&mut tx, question_id, &draft)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        self.get_question(question_id).await
    }

    async fn update_question(
        &self,
        question_id: i32,
        draft: QuestionDraft,
    ) -> PortResult<Question> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let updated = sqlx::query(
            "UPDATE quiz_questions SET question = $1, question_type = $2, order_index = $3, \
             is_active = $4 WHERE id = $5",
        )
        .bind(&draft.question)
        .bind(draft.question_type.as_str())
        .bind(draft.order_index)
        .bind(draft.is_active)
        .bind(question_id)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;
        if updated.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Question {} not found", question_id)));
        }

        sqlx::query("DELETE FROM quiz_answers WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        insert_answers(&mut tx, question_id, &draft)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        self.get_question(question_id).await
    }

    async fn delete_question(&self, question_id: i32) -> PortResult<()> {
        let deleted = sqlx::query("DELETE FROM quiz_questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if deleted.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Question {} not found", question_id)));
        }
        Ok(())
    }

    async fn list_recommendations(&self, active_only: bool) -> PortResult<Vec<Recommendation>> {
        let records = sqlx::query_as::<_, RecommendationRecord>(
            "SELECT id, name, description, priority, trainer_ids, direction_ids, club_ids, \
             is_active FROM quiz_recommendations WHERE is_active OR NOT $1 ORDER BY id ASC",
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        self.attach_conditions(records).await
    }

    async fn get_recommendation(&self, recommendation_id: i32) -> PortResult<Recommendation> {
        let record = sqlx::query_as::<_, RecommendationRecord>(
            "SELECT id, name, description, priority, trainer_ids, direction_ids, club_ids, \
             is_active FROM quiz_recommendations WHERE id = $1",
        )
        .bind(recommendation_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            not_found_or_unexpected(e, format!("Recommendation {} not found", recommendation_id))
        })?;

        self.attach_conditions(vec![record])
            .await?
            .pop()
            .ok_or_else(|| {
                PortError::NotFound(format!("Recommendation {} not found", recommendation_id))
            })
    }

    async fn create_recommendation(
        &self,
        draft: RecommendationDraft,
    ) -> PortResult<Recommendation> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let recommendation_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO quiz_recommendations \
             (name, description, priority, trainer_ids, direction_ids, club_ids, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.priority)
        .bind(&draft.trainer_ids)
        .bind(&draft.direction_ids)
        .bind(&draft.club_ids)
        .bind(draft.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        insert_conditions(&mut tx, recommendation_id, &draft)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        self.get_recommendation(recommendation_id).await
    }

    async fn update_recommendation(
        &self,
        recommendation_id: i32,
        draft: RecommendationDraft,
    ) -> PortResult<Recommendation> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let updated = sqlx::query(
            "UPDATE quiz_recommendations SET name = $1, description = $2, priority = $3, \
             trainer_ids = $4, direction_ids = $5, club_ids = $6, is_active = $7, \
             updated_at = NOW() WHERE id = $8",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.priority)
        .bind(&draft.trainer_ids)
        .bind(&draft.direction_ids)
        .bind(&draft.club_ids)
        .bind(draft.is_active)
        .bind(recommendation_id)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;
        if updated.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Recommendation {} not found",
                recommendation_id
            )));
        }

        sqlx::query("DELETE FROM quiz_recommendation_conditions WHERE recommendation_id = $1")
            .bind(recommendation_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        insert_conditions(&mut tx, recommendation_id, &draft)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        self.get_recommendation(recommendation_id).await
    }

    async fn delete_recommendation(&self, recommendation_id: i32) -> PortResult<()> {
        let deleted = sqlx::query("DELETE FROM quiz_recommendations WHERE id = $1")
            .bind(recommendation_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if deleted.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Recommendation {} not found",
                recommendation_id
            )));
        }
        Ok(())
    }

    async fn save_submission(&self, submission: QuizSubmission) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO quiz_submissions (id, session_id, answers, recommendation_ids, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(submission.id)
        .bind(&submission.session_id)
        .bind(Json(&submission.answers))
        .bind(&submission.recommendation_ids)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn list_submissions(&self, limit: i64) -> PortResult<Vec<QuizSubmission>> {
        let records = sqlx::query_as::<_, SubmissionRecord>(
            "SELECT id, session_id, answers, recommendation_ids, created_at FROM quiz_submissions \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
