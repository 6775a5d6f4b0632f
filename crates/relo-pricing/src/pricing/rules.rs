//! Configuration-side model: pricing rules and location handicaps as an
//! operator would author them in JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::domain::ServiceType;

/// Reporting category for a rule. Does not affect evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Surcharge,
    Discount,
    Adjustment,
    Seasonal,
}

/// Comparison applied between a resolved input field and a configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Between,
    Exists,
    Regex,
}

/// Connective used to fold this condition's outcome into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    And,
    Or,
}

/// One predicate over the estimate input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub logical_operator: Option<LogicalOperator>,
}

/// How an action moves the running price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddFixed,
    AddPercentage,
    Multiply,
    SetMinimum,
    SetMaximum,
    Replace,
}

/// One price mutation a rule performs when it applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_field: Option<String>,
}

/// A configurable pricing rule. Lower `priority` runs earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: RuleCategory,
    pub priority: i32,
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub effective_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub applicable_services: Vec<ServiceType>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A site-condition charge tied to one or both ends of the move.
///
/// Carries either a `fixed_amount`, a `multiplier`, or both. These legacy
/// fields only take effect when no tariff row covers the handicap's
/// inferred category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationHandicap {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub fixed_amount: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_version() -> u32 {
    1
}
