//! Recommendation normalization and presentation.
//!
//! Raw payloads go through [`normalizer::normalize`] into a
//! [`RecommendationSet`], which [`presenter::render`] turns into a
//! [`presenter::RenderedView`] for the front ends.

pub mod error;
pub mod form;
pub mod household;
pub mod normalizer;
pub mod presenter;
pub mod submission;

pub use error::{Plans4YouError, Result};
pub use normalizer::normalize;
pub use plans4you_protocol::{Payload, PlanRecommendation, RecommendationSet};
pub use presenter::{render, render_with_status, PlanCard, RenderedView};
pub use submission::SubmissionTracker;
