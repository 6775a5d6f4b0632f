//! Condition evaluation. A rule's condition list folds left to right:
//! each condition's outcome combines with the running result under the
//! connective carried by the PREVIOUS condition, so `a or b and c`
//! evaluates as `(a or b) and c`, not with `and` binding tighter.

use regex::Regex;

use crate::pricing::domain::EstimateInput;
use crate::pricing::fields::{coerce_text, FieldPath, FieldValue};
use crate::pricing::rules::{ConditionOperator, LogicalOperator, RuleCondition};

/// Evaluates a condition list against the input. Empty lists pass.
pub fn conditions_pass(conditions: &[RuleCondition], input: &EstimateInput) -> bool {
    let mut result = true;
    let mut connective = LogicalOperator::And;

    for condition in conditions {
        let outcome = evaluate(condition, input);
        result = match connective {
            LogicalOperator::And => result && outcome,
            LogicalOperator::Or => result || outcome,
        };
        connective = condition.logical_operator.unwrap_or(LogicalOperator::And);
    }

    result
}

/// Evaluates a single condition. Unknown field paths resolve as missing
/// values, which fail every operator except `ne` and `nin`.
pub fn evaluate(condition: &RuleCondition, input: &EstimateInput) -> bool {
    let field = match FieldPath::parse(&condition.field) {
        Some(path) => path.resolve(input),
        None => FieldValue::Missing,
    };

    match condition.operator {
        ConditionOperator::Eq => strict_eq(&field, &condition.value),
        ConditionOperator::Ne => !strict_eq(&field, &condition.value),
        ConditionOperator::Gt => field.as_number() > value_as_number(&condition.value),
        ConditionOperator::Gte => field.as_number() >= value_as_number(&condition.value),
        ConditionOperator::Lt => field.as_number() < value_as_number(&condition.value),
        ConditionOperator::Lte => field.as_number() <= value_as_number(&condition.value),
        ConditionOperator::In => match condition.value.as_array() {
            Some(choices) => choices.iter().any(|choice| strict_eq(&field, choice)),
            None => false,
        },
        ConditionOperator::Nin => match condition.value.as_array() {
            Some(choices) => !choices.iter().any(|choice| strict_eq(&field, choice)),
            None => false,
        },
        ConditionOperator::Between => match condition.value.as_array() {
            Some(bounds) if bounds.len() == 2 => {
                let number = field.as_number();
                number >= value_as_number(&bounds[0]) && number <= value_as_number(&bounds[1])
            }
            _ => false,
        },
        ConditionOperator::Exists => !matches!(field, FieldValue::Missing),
        ConditionOperator::Regex => regex_matches(&field, &condition.value),
    }
}

/// Type-strict equality. No cross-type coercion: `1` never equals `"1"`
/// or `true`, and a missing field equals nothing.
fn strict_eq(field: &FieldValue, value: &serde_json::Value) -> bool {
    match (field, value) {
        (FieldValue::Bool(b), serde_json::Value::Bool(v)) => b == v,
        (FieldValue::Number(n), serde_json::Value::Number(v)) => {
            v.as_f64().is_some_and(|v| *n == v)
        }
        (FieldValue::Text(s), serde_json::Value::String(v)) => s == v,
        _ => false,
    }
}

/// Numeric view of a configured condition value, mirroring the rules in
/// [`FieldValue::as_number`].
fn value_as_number(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Null => 0.0,
        serde_json::Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => coerce_text(s),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => f64::NAN,
    }
}

fn regex_matches(field: &FieldValue, value: &serde_json::Value) -> bool {
    let Some(pattern) = value.as_str() else {
        return false;
    };
    let Ok(regex) = Regex::new(pattern) else {
        return false;
    };
    field.as_text().is_some_and(|text| regex.is_match(&text))
}
