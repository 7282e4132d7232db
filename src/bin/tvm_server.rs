//! HTTP server for the browser calculator
//!
//! Configured through the environment:
//!   TVM_ADDR or PORT, TVM_ALLOWED_ORIGINS, RUST_LOG

use anyhow::Result;
use log::info;

use tvm_calculator::server::{self, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    info!("Starting TVM calculator server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env()?;
    server::serve(config).await
}
