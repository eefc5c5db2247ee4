use plans4you_protocol::{PlanRecommendation, RecommendationSet};
use std::collections::HashSet;

pub const LEGACY_HEADING: &str = "AI Recommendations";
pub const PLANS_HEADING: &str = "Insurance Plan Recommendations";
pub const PLANS_SUBHEADING: &str = "Recommended Plans";
pub const NO_RECOMMENDATIONS: &str = "No plan recommendations available.";
pub const BEST_MATCH_BADGE: &str = "BEST MATCH";

/// What a front end draws. Carries no logic of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedView {
    Nothing,
    Notice {
        heading: &'static str,
        message: String,
    },
    NoRecommendations {
        message: &'static str,
    },
    Cards {
        heading: &'static str,
        subheading: &'static str,
        cards: Vec<PlanCard>,
        /// Plan ids that appear more than once, in first-collision order.
        key_collisions: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCard {
    /// Stable identity for diffing, always the plan id.
    pub key: String,
    pub badge: Option<&'static str>,
    pub title: String,
    pub rank_label: String,
    pub justification: String,
}

impl From<&PlanRecommendation> for PlanCard {
    fn from(plan: &PlanRecommendation) -> Self {
        Self {
            key: plan.plan_id.clone(),
            badge: plan.is_best_plan.then_some(BEST_MATCH_BADGE),
            title: format!("Plan ID: {}", plan.plan_id),
            rank_label: format!("Rank: {}", plan.rank),
            justification: plan.justification.clone(),
        }
    }
}

pub fn render(set: &RecommendationSet) -> RenderedView {
    match set {
        RecommendationSet::Empty => RenderedView::Nothing,
        RecommendationSet::LegacyText(message) => RenderedView::Notice {
            heading: LEGACY_HEADING,
            message: message.clone(),
        },
        RecommendationSet::StructuredPlans(plans) if plans.is_empty() => {
            RenderedView::NoRecommendations {
                message: NO_RECOMMENDATIONS,
            }
        }
        RecommendationSet::StructuredPlans(plans) => {
            let key_collisions = colliding_keys(plans);
            if !key_collisions.is_empty() {
                tracing::warn!("duplicate plan ids in recommendation set: {key_collisions:?}");
            }
            RenderedView::Cards {
                heading: PLANS_HEADING,
                subheading: PLANS_SUBHEADING,
                cards: plans.iter().map(PlanCard::from).collect(),
                key_collisions,
            }
        }
    }
}

/// Like [`render`], but shows nothing while a request is outstanding.
pub fn render_with_status(set: &RecommendationSet, busy: bool) -> RenderedView {
    if busy {
        RenderedView::Nothing
    } else {
        render(set)
    }
}

fn colliding_keys(plans: &[PlanRecommendation]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut collisions: Vec<String> = Vec::new();
    for plan in plans {
        if !seen.insert(plan.plan_id.as_str()) && !collisions.contains(&plan.plan_id) {
            collisions.push(plan.plan_id.clone());
        }
    }
    collisions
}

impl RenderedView {
    pub fn is_nothing(&self) -> bool {
        matches!(self, RenderedView::Nothing)
    }

    pub fn cards(&self) -> &[PlanCard] {
        match self {
            RenderedView::Cards { cards, .. } => cards,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use plans4you_protocol::Payload;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn view_of(raw: serde_json::Value) -> RenderedView {
        render(&normalize(&Payload::Json(raw)))
    }

    #[test]
    fn empty_renders_nothing() {
        assert!(render(&RecommendationSet::Empty).is_nothing());
    }

    #[test]
    fn legacy_text_is_a_single_notice() {
        let view = render(&RecommendationSet::LegacyText(
            "Sorry, we encountered an error processing your request.".into(),
        ));
        assert_eq!(
            view,
            RenderedView::Notice {
                heading: "AI Recommendations",
                message: "Sorry, we encountered an error processing your request.".into(),
            }
        );
    }

    #[test]
    fn unknown_shape_renders_no_recommendations_line() {
        assert_eq!(
            view_of(json!({"status": "ok"})),
            RenderedView::NoRecommendations {
                message: "No plan recommendations available."
            }
        );
    }

    #[test]
    fn cards_follow_input_order() {
        let view = view_of(json!({"plans": [
            {"planId": "B", "rank": 2, "justification": "second"},
            {"planId": "A", "rank": 1, "isBestPlan": true, "justification": "first"}
        ]}));
        assert_eq!(
            view.cards(),
            &[
                PlanCard {
                    key: "B".into(),
                    badge: None,
                    title: "Plan ID: B".into(),
                    rank_label: "Rank: 2".into(),
                    justification: "second".into(),
                },
                PlanCard {
                    key: "A".into(),
                    badge: Some("BEST MATCH"),
                    title: "Plan ID: A".into(),
                    rank_label: "Rank: 1".into(),
                    justification: "first".into(),
                },
            ]
        );
    }

    #[test]
    fn badges_are_not_deduplicated() {
        let one = view_of(json!({"plans": [
            {"planId": "A", "rank": 1, "isBestPlan": true},
            {"planId": "B", "rank": 2, "isBestPlan": false}
        ]}));
        let two = view_of(json!({"plans": [
            {"planId": "A", "rank": 1, "isBestPlan": true},
            {"planId": "B", "rank": 2, "isBestPlan": true}
        ]}));
        let badges = |v: &RenderedView| v.cards().iter().filter(|c| c.badge.is_some()).count();
        assert_eq!(badges(&one), 1);
        assert_eq!(badges(&two), 2);
    }

    #[test]
    fn key_collisions_are_reported_not_removed() {
        let view = view_of(json!({"plans": [
            {"planId": "A", "rank": 1},
            {"planId": "A", "rank": 2},
            {"planId": "B", "rank": 3},
            {"planId": "A", "rank": 4}
        ]}));
        let RenderedView::Cards {
            cards,
            key_collisions,
            ..
        } = view
        else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 4);
        assert_eq!(key_collisions, vec!["A".to_string()]);
    }

    #[test]
    fn busy_suppresses_previous_set() {
        let set = RecommendationSet::LegacyText("old answer".into());
        assert!(render_with_status(&set, true).is_nothing());
        assert!(!render_with_status(&set, false).is_nothing());
    }
}
