use std::sync::Arc;

use tableside_api::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tableside_observability::init();

    let services = Arc::new(app::services::build_services().await?);
    app::seed::run(&services).await?;

    let router = app::build_app(services);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}
