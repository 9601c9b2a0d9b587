//! Per-player analysis result and coaching suggestions.

use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::build_order::BuildOrderItem;
use super::economy::{InjectAnalysis, SpendingAnalysis, SupplyAnalysis};
use super::mechanics::{ApmAnalysis, ArmyAnalysis};
use crate::SCHEMA_VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, most urgent first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Macro,
    Micro,
    Strategy,
}

/// One piece of coaching advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    pub priority: Priority,
    pub category: Category,
    pub title: String,
    pub description: String,
    /// Match time the advice refers to, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    /// Expected value to aim for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Suggestion {
    pub fn new(
        priority: Priority,
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            category,
            title: title.into(),
            description: description.into(),
            timestamp: None,
            target: None,
        }
    }

    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Everything computed for one player of one match.
///
/// A sub-result is `None` when its analyzer found nothing to work with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub supply_analysis: Option<SupplyAnalysis>,
    pub spending_analysis: Option<SpendingAnalysis>,
    pub apm_analysis: Option<ApmAnalysis>,
    pub build_order: Option<Vec<BuildOrderItem>>,
    pub inject_analysis: Option<InjectAnalysis>,
    pub army_analysis: Option<ArmyAnalysis>,
    /// Ordered by priority, high first
    pub suggestions: Vec<Suggestion>,
}

/// Extension key carrying [`SCHEMA_VERSION`] in the exported schema
pub const SCHEMA_VERSION_KEY: &str = "x-schema-version";

/// JSON Schema of the serialized [`AnalysisResult`], stamped with
/// [`SCHEMA_VERSION`].
pub fn analysis_result_schema() -> RootSchema {
    let mut schema = schema_for!(AnalysisResult);
    schema
        .schema
        .extensions
        .insert(SCHEMA_VERSION_KEY.to_string(), serde_json::Value::from(SCHEMA_VERSION));
    schema
}
