use anyhow::Context;
use std::sync::Arc;

use pricing_api::model::PricePipeline;
use pricing_api::server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricing_api=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::default();

    // Load the pipeline artifact; failure here is fatal, no degraded mode.
    let pipeline = PricePipeline::load(&config.model_path)
        .with_context(|| format!("could not load model from {}", config.model_path.display()))?;
    tracing::info!(
        "loaded pricing pipeline from {} ({} features)",
        config.model_path.display(),
        pipeline.feature_count()
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    let app = create_router(state, config.max_upload_size);

    let addr: std::net::SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
