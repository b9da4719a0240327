use anyhow::Result;
use clap::Parser;

use sleuth_server::cli::ServerCli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ServerCli::parse();
    sleuth_server::server::run(cli).await
}
