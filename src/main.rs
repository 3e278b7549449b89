//! Main entry point for the EHR resource dashboard.
//!
//! Starts the REST server with the demo resource collection and the
//! completion backend resolved from the environment.
//!
//! # Environment Variables
//! - `EHRDASH_ADDR`: REST server address (default: "0.0.0.0:3000")
//! - `OPENAI_API_KEY`: credential for the outbound completion API; when it is
//!   absent the server still starts and analysis requests fail with a
//!   configuration error
//! - `OPENAI_BASE_URL`: completion API base URL override

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use ehrdash_analysis::{AnalysisConfig, CompletionClient};
use ehrdash_core::sample_resources;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ehrdash=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("EHRDASH_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = AnalysisConfig::from_env();
    if config.api_key().is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; analysis requests will return a configuration error");
    }

    let state = AppState {
        resources: Arc::new(sample_resources()),
        backend: Arc::new(CompletionClient::new(config)),
    };

    tracing::info!("++ Starting EHR dashboard REST on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
