//! services/api/src/web/validation.rs
//!
//! Turns admin payloads into core drafts, rejecting rule data the engine
//! could not match against.

use crate::web::dto::{QuestionPayload, RecommendationPayload};
use fitclub_core::domain::{
    AnswerDraft, Condition, ConditionOperator, QuestionDraft, QuestionType, RecommendationDraft,
};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Answer value tokens: letters, digits, `_` and `-`.
static VALUE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_-]+$").expect("valid token pattern"));

pub fn question_draft(payload: QuestionPayload) -> Result<QuestionDraft, String> {
    let question = payload.question.trim().to_string();
    if question.is_empty() {
        return Err("Question text must not be empty".to_string());
    }
    let question_type = QuestionType::parse(&payload.question_type).ok_or_else(|| {
        format!(
            "Unknown question type '{}' (expected 'single' or 'multiple')",
            payload.question_type
        )
    })?;

    let mut seen = HashSet::new();
    let mut answers = Vec::with_capacity(payload.answers.len());
    for (position, answer) in payload.answers.into_iter().enumerate() {
        let answer_text = answer.answer_text.trim().to_string();
        let answer_value = answer.answer_value.trim().to_string();
        if answer_text.is_empty() {
            return Err(format!("Answer {} has no text", position + 1));
        }
        if !VALUE_TOKEN.is_match(&answer_value) {
            return Err(format!(
                "Answer value '{}' must consist of letters, digits, '_' or '-'",
                answer_value
            ));
        }
        if !seen.insert(answer_value.clone()) {
            return Err(format!(
                "Answer value '{}' is used more than once in this question",
                answer_value
            ));
        }
        answers.push(AnswerDraft {
            answer_text,
            answer_value,
            order_index: answer.order_index.unwrap_or(position as i32),
        });
    }

    Ok(QuestionDraft {
        question,
        question_type,
        order_index: payload.order_index,
        is_active: payload.is_active,
        answers,
    })
}

pub fn recommendation_draft(payload: RecommendationPayload) -> Result<RecommendationDraft, String> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err("Recommendation name must not be empty".to_string());
    }

    let mut conditions = Vec::with_capacity(payload.conditions.len());
    for condition in payload.conditions {
        let question_id = condition.question_id.to_text();
        if question_id.is_empty() {
            return Err("Condition question_id must not be empty".to_string());
        }
        let operator = ConditionOperator::parse(&condition.operator);
        if !operator.is_known() {
            return Err(format!(
                "Unknown condition operator '{}' (expected 'in', 'not_in' or 'equals')",
                condition.operator
            ));
        }
        let answer_values: Vec<String> = condition
            .answer_values
            .iter()
            .map(|v| v.trim().to_string())
            .collect();
        if answer_values.is_empty() || answer_values.iter().any(|v| v.is_empty()) {
            return Err(format!(
                "Condition on question {} needs at least one non-empty answer value",
                question_id
            ));
        }
        conditions.push(Condition {
            question_id,
            operator,
            answer_values,
        });
    }

    Ok(RecommendationDraft {
        name,
        description: payload.description.trim().to_string(),
        priority: payload.priority,
        conditions,
        trainer_ids: payload.trainer_ids,
        direction_ids: payload.direction_ids,
        club_ids: payload.club_ids,
        is_active: payload.is_active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::dto::{AnswerPayload, ConditionPayload, QuestionRef};

    fn answer(text: &str, value: &str) -> AnswerPayload {
        AnswerPayload {
            answer_text: text.to_string(),
            answer_value: value.to_string(),
            order_index: None,
        }
    }

    fn question(answers: Vec<AnswerPayload>) -> QuestionPayload {
        QuestionPayload {
            question: "What is your goal?".to_string(),
            question_type: "single".to_string(),
            order_index: 1,
            is_active: true,
            answers,
        }
    }

    fn recommendation(conditions: Vec<ConditionPayload>) -> RecommendationPayload {
        RecommendationPayload {
            name: "Cardio start".to_string(),
            description: " Two sessions a week ".to_string(),
            priority: 2,
            conditions,
            trainer_ids: vec![4],
            direction_ids: vec![],
            club_ids: vec![1],
            is_active: true,
        }
    }

    #[test]
    fn answers_get_positional_order_by_default() {
        let draft = question_draft(question(vec![
            answer("Lose weight", "weight_loss"),
            answer("Похудеть", "похудение"),
        ]))
        .unwrap();

        assert_eq!(draft.question_type, QuestionType::Single);
        assert_eq!(draft.answers[0].order_index, 0);
        assert_eq!(draft.answers[1].order_index, 1);
    }

    #[test]
    fn duplicate_answer_values_are_rejected() {
        let err = question_draft(question(vec![
            answer("Lose weight", "weight_loss"),
            answer("Get lean", " weight_loss "),
        ]))
        .unwrap_err();

        assert!(err.contains("more than once"));
    }

    #[test]
    fn answer_values_must_be_tokens() {
        let err = question_draft(question(vec![answer("Lose weight", "weight loss")])).unwrap_err();

        assert!(err.contains("letters, digits"));
    }

    #[test]
    fn unknown_question_type_is_rejected() {
        let mut payload = question(vec![]);
        payload.question_type = "essay".to_string();

        assert!(question_draft(payload).is_err());
    }

    #[test]
    fn numeric_and_text_question_ids_normalise_to_text() {
        let draft = recommendation_draft(recommendation(vec![
            ConditionPayload {
                question_id: QuestionRef::Number(1),
                operator: "in".to_string(),
                answer_values: vec!["weight_loss".to_string()],
            },
            ConditionPayload {
                question_id: QuestionRef::Text(" 2 ".to_string()),
                operator: "not_in".to_string(),
                answer_values: vec!["advanced".to_string()],
            },
        ]))
        .unwrap();

        assert_eq!(draft.conditions[0].question_id, "1");
        assert_eq!(draft.conditions[1].question_id, "2");
        assert_eq!(draft.conditions[1].operator, ConditionOperator::NotIn);
        assert_eq!(draft.description, "Two sessions a week");
    }

    #[test]
    fn zero_padded_question_ids_are_canonicalised() {
        let draft = recommendation_draft(recommendation(vec![ConditionPayload {
            question_id: QuestionRef::Text("01".to_string()),
            operator: "in".to_string(),
            answer_values: vec!["weight_loss".to_string()],
        }]))
        .unwrap();

        assert_eq!(draft.conditions[0].question_id, "1");
    }

    #[test]
    fn unknown_operator_is_rejected_on_write() {
        let err = recommendation_draft(recommendation(vec![ConditionPayload {
            question_id: QuestionRef::Number(1),
            operator: "contains".to_string(),
            answer_values: vec!["weight_loss".to_string()],
        }]))
        .unwrap_err();

        assert!(err.contains("contains"));
    }

    #[test]
    fn condition_without_values_is_rejected() {
        let err = recommendation_draft(recommendation(vec![ConditionPayload {
            question_id: QuestionRef::Number(1),
            operator: "in".to_string(),
            answer_values: vec![],
        }]))
        .unwrap_err();

        assert!(err.contains("at least one"));
    }

    #[test]
    fn recommendation_without_conditions_is_allowed() {
        let draft = recommendation_draft(recommendation(vec![])).unwrap();

        assert!(draft.conditions.is_empty());
    }
}
