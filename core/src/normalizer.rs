//! Classifies a raw recommendation payload into a [`RecommendationSet`].
//!
//! The backend has answered in several shapes over time. Plan lists are
//! located through [`EXTRACTION_RULES`], tried strictly in order; the first
//! rule that finds an array wins. Everything here is total: an unknown shape
//! degrades to an empty structured set and a malformed entry is skipped.

use plans4you_protocol::{Payload, PlanRecommendation, RecommendationSet};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// One way of locating the plan list inside a JSON document.
pub struct ExtractionRule {
    pub name: &'static str,
    locate: fn(&Map<String, Value>) -> Option<&Vec<Value>>,
}

impl ExtractionRule {
    pub fn apply<'a>(&self, doc: &'a Map<String, Value>) -> Option<&'a [Value]> {
        (self.locate)(doc).map(Vec::as_slice)
    }
}

/// Lookup order for plan lists. Older backends only sent the later shapes.
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "plans",
        locate: direct_plans,
    },
    ExtractionRule {
        name: "analysis.ranked_plans",
        locate: analysis_ranked_plans,
    },
    ExtractionRule {
        name: "ranked_plans",
        locate: top_level_ranked_plans,
    },
];

fn direct_plans(doc: &Map<String, Value>) -> Option<&Vec<Value>> {
    doc.get("plans")?.as_array()
}

fn analysis_ranked_plans(doc: &Map<String, Value>) -> Option<&Vec<Value>> {
    doc.get("analysis")?.as_object()?.get("ranked_plans")?.as_array()
}

fn top_level_ranked_plans(doc: &Map<String, Value>) -> Option<&Vec<Value>> {
    doc.get("ranked_plans")?.as_array()
}

/// Why a single plan entry was skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DropReason {
    #[error("entry is not an object")]
    NotAnObject,
    #[error("missing or empty planId")]
    MissingPlanId,
    #[error("missing or non-integer rank")]
    InvalidRank,
}

pub fn normalize(raw: &Payload) -> RecommendationSet {
    match raw {
        Payload::Absent => RecommendationSet::Empty,
        Payload::Text(text) => classify_text(text),
        Payload::Json(value) => normalize_value(value),
    }
}

/// Same classification for an already decoded JSON value.
pub fn normalize_value(value: &Value) -> RecommendationSet {
    match value {
        Value::Null | Value::Bool(false) => RecommendationSet::Empty,
        Value::Number(n) if is_zero(n) => RecommendationSet::Empty,
        Value::String(text) => classify_text(text),
        Value::Object(doc) => RecommendationSet::StructuredPlans(decode_plans(locate_plans(doc))),
        // Truthy but without fields: nothing can match.
        Value::Bool(true) | Value::Number(_) | Value::Array(_) => {
            RecommendationSet::StructuredPlans(Vec::new())
        }
    }
}

fn classify_text(text: &str) -> RecommendationSet {
    if text.is_empty() {
        RecommendationSet::Empty
    } else {
        RecommendationSet::LegacyText(text.to_string())
    }
}

fn is_zero(n: &Number) -> bool {
    n.as_f64() == Some(0.0)
}

fn locate_plans(doc: &Map<String, Value>) -> &[Value] {
    let found = EXTRACTION_RULES
        .iter()
        .find_map(|rule| rule.apply(doc).map(|plans| (rule.name, plans)));

    match found {
        Some((rule, plans)) => {
            tracing::debug!(rule, count = plans.len(), "located plan list");
            plans
        }
        None => {
            if let Some(error) = doc.get("error").and_then(Value::as_str) {
                tracing::warn!("recommendation backend reported an error: {error}");
            } else {
                tracing::debug!("payload matched no known plan shape");
            }
            &[]
        }
    }
}

fn decode_plans(entries: &[Value]) -> Vec<PlanRecommendation> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match decode_plan(entry) {
            Ok(plan) => Some(plan),
            Err(reason) => {
                tracing::debug!(index, %reason, "dropping plan entry");
                None
            }
        })
        .collect()
}

pub fn decode_plan(entry: &Value) -> Result<PlanRecommendation, DropReason> {
    let fields = entry.as_object().ok_or(DropReason::NotAnObject)?;
    let plan_id = fields
        .get("planId")
        .and_then(plan_id_of)
        .ok_or(DropReason::MissingPlanId)?;
    let rank = fields
        .get("rank")
        .and_then(rank_of)
        .ok_or(DropReason::InvalidRank)?;

    Ok(PlanRecommendation {
        plan_id,
        rank,
        is_best_plan: matches!(fields.get("isBestPlan"), Some(Value::Bool(true))),
        justification: fields
            .get("justification")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Surrounding whitespace only decides emptiness; the id is kept as sent.
fn plan_id_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// A rank is an integral JSON number. Strings are read as JSON numbers
/// under the same rule, so `"-1"` and `"2.0"` decode like `-1` and `2.0`.
fn rank_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => integral(n),
        Value::String(s) => serde_json::from_str::<Number>(s.trim())
            .ok()
            .as_ref()
            .and_then(integral),
        _ => None,
    }
}

fn integral(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        let f = n.as_f64()?;
        (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn plan(id: &str, rank: i64, justification: &str) -> PlanRecommendation {
        PlanRecommendation {
            plan_id: id.into(),
            rank,
            is_best_plan: false,
            justification: justification.into(),
        }
    }

    fn ids(set: &RecommendationSet) -> Vec<&str> {
        set.plans().iter().map(|p| p.plan_id.as_str()).collect()
    }

    #[test]
    fn falsy_payloads_are_empty() {
        assert_eq!(normalize(&Payload::Absent), RecommendationSet::Empty);
        assert_eq!(normalize(&Payload::Json(Value::Null)), RecommendationSet::Empty);
        assert_eq!(normalize(&Payload::from("")), RecommendationSet::Empty);
        assert_eq!(normalize(&Payload::Json(json!(""))), RecommendationSet::Empty);
        assert_eq!(normalize(&Payload::Json(json!(false))), RecommendationSet::Empty);
        assert_eq!(normalize(&Payload::Json(json!(0))), RecommendationSet::Empty);
    }

    #[test]
    fn strings_are_legacy_text() {
        assert_eq!(
            normalize(&Payload::from("any non-empty string")),
            RecommendationSet::LegacyText("any non-empty string".into())
        );
        assert_eq!(
            normalize(&Payload::Json(json!("encoded reply"))),
            RecommendationSet::LegacyText("encoded reply".into())
        );
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<&str> = EXTRACTION_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["plans", "analysis.ranked_plans", "ranked_plans"]);
    }

    #[test]
    fn direct_plans_win_over_other_shapes() {
        let raw = json!({
            "plans": [{"planId": "A", "rank": 1, "justification": ""}],
            "analysis": {"ranked_plans": [{"planId": "C", "rank": 1, "justification": ""}]},
            "ranked_plans": [{"planId": "B", "rank": 1, "justification": ""}]
        });
        assert_eq!(
            normalize(&Payload::Json(raw)),
            RecommendationSet::StructuredPlans(vec![plan("A", 1, "")])
        );
    }

    #[test]
    fn analysis_wins_over_top_level_ranked_plans() {
        let raw = json!({
            "analysis": {"ranked_plans": [{"planId": "X", "rank": 2, "justification": "fits budget"}]},
            "ranked_plans": [{"planId": "B", "rank": 1}]
        });
        assert_eq!(
            normalize(&Payload::Json(raw)),
            RecommendationSet::StructuredPlans(vec![plan("X", 2, "fits budget")])
        );
    }

    #[test]
    fn top_level_ranked_plans_are_used() {
        let raw = json!({
            "best_plan_id": "R1",
            "ranked_plans": [
                {"planId": "R1", "rank": 1, "isBestPlan": true, "justification": "cheapest"},
                {"planId": "R2", "rank": 2, "isBestPlan": false, "justification": "broader network"}
            ]
        });
        let set = normalize(&Payload::Json(raw));
        assert_eq!(ids(&set), ["R1", "R2"]);
        assert!(set.plans()[0].is_best_plan);
        assert!(!set.plans()[1].is_best_plan);
    }

    #[test]
    fn non_array_candidates_fall_through() {
        let raw = json!({
            "plans": "not a list",
            "analysis": "not an object",
            "ranked_plans": [{"planId": "Z", "rank": 1}]
        });
        assert_eq!(ids(&normalize(&Payload::Json(raw))), ["Z"]);

        let nested_non_object = json!({"analysis": [{"ranked_plans": []}]});
        assert_eq!(
            normalize(&Payload::Json(nested_non_object)),
            RecommendationSet::StructuredPlans(vec![])
        );
    }

    #[test]
    fn empty_plans_array_still_wins() {
        let raw = json!({
            "plans": [],
            "ranked_plans": [{"planId": "B", "rank": 1}]
        });
        assert_eq!(
            normalize(&Payload::Json(raw)),
            RecommendationSet::StructuredPlans(vec![])
        );
    }

    #[test]
    fn empty_analysis_list_still_wins() {
        let raw = json!({
            "analysis": {"ranked_plans": []},
            "ranked_plans": [{"planId": "B", "rank": 1}]
        });
        assert_eq!(
            normalize(&Payload::Json(raw)),
            RecommendationSet::StructuredPlans(vec![])
        );
    }

    #[test]
    fn unknown_shapes_yield_empty_structured_set() {
        for raw in [
            json!({"status": "ok"}),
            json!({"error": "AI response was not valid JSON.", "raw_output": "..."}),
            json!([{"planId": "A", "rank": 1}]),
            json!(true),
            json!(7),
        ] {
            assert_eq!(
                normalize(&Payload::Json(raw)),
                RecommendationSet::StructuredPlans(vec![])
            );
        }
    }

    #[test]
    fn source_order_is_preserved() {
        let raw = json!({"plans": [
            {"planId": "B", "rank": 2, "justification": "b"},
            {"planId": "A", "rank": 1, "justification": "a"}
        ]});
        assert_eq!(ids(&normalize(&Payload::Json(raw))), ["B", "A"]);
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let raw = json!({"plans": [
            {"rank": 1, "justification": "x"},
            {"planId": "Y", "rank": 2, "justification": "y"},
            "stray string",
            {"planId": "   ", "rank": 3},
            {"planId": "NoRank"},
            {"planId": "W", "rank": "4"}
        ]});
        let set = normalize(&Payload::Json(raw));
        assert_eq!(ids(&set), ["Y", "W"]);
        assert_eq!(set.plans()[1].rank, 4);
    }

    #[test]
    fn missing_fields_are_coerced() {
        let raw = json!({"plans": [
            {"planId": 1234, "rank": 1.0, "isBestPlan": "yes"}
        ]});
        assert_eq!(
            normalize(&Payload::Json(raw)),
            RecommendationSet::StructuredPlans(vec![plan("1234", 1, "")])
        );
    }

    #[test]
    fn duplicate_best_flags_are_kept() {
        let raw = json!({"plans": [
            {"planId": "A", "rank": 1, "isBestPlan": true, "justification": ""},
            {"planId": "B", "rank": 1, "isBestPlan": true, "justification": ""}
        ]});
        let set = normalize(&Payload::Json(raw));
        assert_eq!(set.plans().iter().filter(|p| p.is_best_plan).count(), 2);
    }

    #[test]
    fn drop_reasons() {
        assert_eq!(decode_plan(&json!(3)), Err(DropReason::NotAnObject));
        assert_eq!(decode_plan(&json!({"rank": 1})), Err(DropReason::MissingPlanId));
        assert_eq!(
            decode_plan(&json!({"planId": "A", "rank": 1.5})),
            Err(DropReason::InvalidRank)
        );
        assert_eq!(
            decode_plan(&json!({"planId": "A", "rank": "1.5"})),
            Err(DropReason::InvalidRank)
        );
        assert_eq!(
            decode_plan(&json!({"planId": "A", "rank": "+1"})),
            Err(DropReason::InvalidRank)
        );
        assert_eq!(
            decode_plan(&json!({"planId": "A", "rank": "first"})),
            Err(DropReason::InvalidRank)
        );
    }

    #[test]
    fn plan_ids_are_kept_as_sent() {
        let raw = json!({"plans": [{"planId": " A ", "rank": 1, "justification": ""}]});
        assert_eq!(
            normalize(&Payload::Json(raw)),
            RecommendationSet::StructuredPlans(vec![plan(" A ", 1, "")])
        );
    }

    #[test]
    fn string_ranks_follow_numeric_rule() {
        for (text, number) in [
            (json!("-1"), json!(-1)),
            (json!("2.0"), json!(2.0)),
            (json!(" 3 "), json!(3)),
            (json!("1e1"), json!(10.0)),
        ] {
            let from_text = decode_plan(&json!({"planId": "A", "rank": text})).map(|p| p.rank);
            let from_number = decode_plan(&json!({"planId": "A", "rank": number})).map(|p| p.rank);
            assert!(from_text.is_ok());
            assert_eq!(from_text, from_number);
        }
    }
}
