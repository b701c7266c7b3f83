//! crates/fitclub_core/src/engine.rs
//!
//! The quiz recommendation engine: condition evaluation and ranking.
//! Both functions are pure over their inputs.

use crate::domain::{AnswerMap, Condition, ConditionOperator, Recommendation};
use tracing::warn;

/// Returns the recommendations whose conditions all hold for `answers`.
///
/// A recommendation without conditions always matches. Output keeps input order.
pub fn evaluate(answers: &AnswerMap, recommendations: &[Recommendation]) -> Vec<Recommendation> {
    recommendations
        .iter()
        .filter(|rec| matches(answers, rec))
        .cloned()
        .collect()
}

/// AND across every condition of `recommendation`.
pub fn matches(answers: &AnswerMap, recommendation: &Recommendation) -> bool {
    recommendation.conditions.iter().all(|condition| {
        let holds = condition_holds(answers, condition);
        if !holds && !condition.operator.is_known() {
            warn!(
                recommendation_id = recommendation.id,
                operator = condition.operator.as_str(),
                "recommendation condition uses an unknown operator"
            );
        }
        holds
    })
}

/// Rebuilds `answers` with trimmed question ids. A later padded duplicate
/// overwrites an earlier one.
pub fn normalise_answers(answers: AnswerMap) -> AnswerMap {
    answers
        .into_iter()
        .map(|(question_id, value)| (question_id.trim().to_string(), value))
        .collect()
}

fn answer_for<'a>(answers: &'a AnswerMap, question_id: &str) -> Option<&'a String> {
    answers.get(question_id).or_else(|| {
        answers
            .iter()
            .find(|(key, _)| key.trim() == question_id)
            .map(|(_, value)| value)
    })
}

/// Evaluates a single condition. An unanswered question fails closed.
pub fn condition_holds(answers: &AnswerMap, condition: &Condition) -> bool {
    let Some(chosen) = answer_for(answers, condition.question_id.trim()) else {
        return false;
    };
    let chosen = chosen.trim();
    let listed = condition
        .answer_values
        .iter()
        .any(|value| value.trim() == chosen);

    match &condition.operator {
        ConditionOperator::In | ConditionOperator::Equals => listed,
        ConditionOperator::NotIn => !listed,
        ConditionOperator::Unknown(_) => false,
    }
}

/// Orders matches by descending priority. Equal priorities keep their input order.
pub fn rank(mut matches: Vec<Recommendation>) -> Vec<Recommendation> {
    // `sort_by` is stable.
    matches.sort_by(|a, b| b.priority.cmp(&a.priority));
    matches
}
