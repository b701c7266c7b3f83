//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use fitclub_core::ports::DatabaseService;
use fitclub_core::service::QuizService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub quiz: QuizService,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseService>, config: Arc<Config>) -> Self {
        let quiz = QuizService::new(db.clone());
        Self { db, config, quiz }
    }
}
