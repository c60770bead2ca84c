use anyhow::Result;
use minishop::cli::{self, ux};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = cli::run().await {
        ux::present_error(e);
        std::process::exit(1);
    }
    Ok(())
}
