pub mod domain;
pub mod engine;
pub mod ports;
pub mod service;

pub use domain::{
    AdminCredentials, AdminUser, Answer, AnswerDraft, AnswerMap, AuthSession, Condition,
    ConditionOperator, Question, QuestionDraft, QuestionType, QuizSubmission, Recommendation,
    RecommendationDraft,
};
pub use engine::{evaluate, normalise_answers, rank};
pub use ports::{DatabaseService, PortError, PortResult};
pub use service::{QuizOutcome, QuizService};
