//! crates/fitclub_core/src/service.rs
//!
//! The quiz submission flow: load the active rules, evaluate, rank and log.

use crate::domain::{AnswerMap, QuizSubmission, Recommendation};
use crate::engine::{evaluate, normalise_answers, rank};
use crate::ports::{DatabaseService, PortResult};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Ranked result of one quiz submission.
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub session_id: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Clone)]
pub struct QuizService {
    db: Arc<dyn DatabaseService>,
}

impl QuizService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    /// Evaluates `answers` against every active recommendation.
    ///
    /// A failure to write the audit record is logged and does not fail the call.
    pub async fn submit(&self, session_id: &str, answers: AnswerMap) -> PortResult<QuizOutcome> {
        let session_id = match session_id.trim() {
            "" => Uuid::new_v4().to_string(),
            given => given.to_string(),
        };
        let answers = normalise_answers(answers);

        let questions = self.db.list_questions(true).await?;
        let recommendations = self.db.list_recommendations(true).await?;

        if questions.is_empty() {
            error!("Quiz has no active questions; only unconditional recommendations can match");
        }
        let known_ids: HashSet<String> = questions.iter().map(|q| q.id.to_string()).collect();
        for rec in &recommendations {
            for condition in &rec.conditions {
                if !known_ids.contains(condition.question_id.trim()) {
                    warn!(
                        recommendation_id = rec.id,
                        question_id = %condition.question_id,
                        "recommendation condition references no active question"
                    );
                }
            }
        }

        let ranked = rank(evaluate(&answers, &recommendations));
        info!(
            session_id = %session_id,
            answered = answers.len(),
            matched = ranked.len(),
            "Quiz submission evaluated"
        );

        let submission = QuizSubmission {
            id: Uuid::new_v4(),
            session_id: session_id.clone(),
            answers,
            recommendation_ids: ranked.iter().map(|r| r.id).collect(),
            created_at: Utc::now(),
        };
        if let Err(e) = self.db.save_submission(submission).await {
            error!("Failed to record quiz submission for {}: {:?}", session_id, e);
        }

        Ok(QuizOutcome {
            session_id,
            recommendations: ranked,
        })
    }
}
