use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    plans4you_cli::run_cli().await
}
