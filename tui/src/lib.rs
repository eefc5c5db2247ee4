pub mod app;
pub mod interactive;
pub mod recommendations;

use anyhow::Result;
use plans4you_client::RecommendationSource;
use std::sync::Arc;

pub use recommendations::{plain_text, recommendation_lines};

pub async fn run_interactive(source: Arc<dyn RecommendationSource>) -> Result<()> {
    interactive::InteractiveApp::new(source).run().await
}
