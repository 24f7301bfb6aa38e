use anyhow::Result;
use nietu::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
