//! tamperguard - binary integrity checks from the command line.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tamperguard_cli::run().await
}
