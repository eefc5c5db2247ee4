use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw response handed over by the transport, before any classification.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// Nothing has been received yet.
    #[default]
    Absent,
    /// A plain narrative reply or a collapsed transport error.
    Text(String),
    /// A decoded JSON body of unknown shape.
    Json(Value),
}

impl Payload {
    /// Decode a response body: JSON when it parses, otherwise the text itself.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Payload::Absent;
        }
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body.to_string()),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecommendation {
    pub plan_id: String,
    pub rank: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_best_plan: bool,
    #[serde(default)]
    pub justification: String,
}

/// Normalized, immutable result of classifying one payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecommendationSet {
    #[default]
    Empty,
    LegacyText(String),
    StructuredPlans(Vec<PlanRecommendation>),
}

impl RecommendationSet {
    pub fn plans(&self) -> &[PlanRecommendation] {
        match self {
            RecommendationSet::StructuredPlans(plans) => plans,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RecommendationSet::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DentalPreference {
    Yes,
    #[default]
    No,
}

impl DentalPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            DentalPreference::Yes => "yes",
            DentalPreference::No => "no",
        }
    }
}

/// Values posted to the recommendation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcareFormValues {
    pub name: String,
    pub age: u32,
    pub income: f64,
    pub dependents: u32,
    pub state: String,
    pub dental_plan_required: DentalPreference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub form: HealthcareFormValues,
}

impl Submission {
    pub fn new(form: HealthcareFormValues) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            form,
        }
    }
}
