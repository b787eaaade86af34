use anyhow::Result;
use shell_worker::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
