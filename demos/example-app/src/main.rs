use example_app::routes::build_app;
use example_app::services::UserService;
use example_app::AppConfig;
use spectree::spectree_axum::AxumAdapter;
use spectree::SpecTree;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    spectree::init_tracing();

    let config = AppConfig::load("application.yaml")?;
    let docs = config.spectree.ui_url();
    let spec_url = config.spectree.spec_url();

    let tree = Arc::new(SpecTree::new(AxumAdapter::new(), config.spectree));
    let app = build_app(&tree, UserService::new())?;

    // Generate once up front so a broken declaration fails at startup.
    let spec = tree.spec()?;
    tracing::info!(
        paths = spec["paths"].as_object().map_or(0, |paths| paths.len()),
        "OpenAPI document ready"
    );

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(addr = %config.addr, spec = %spec_url, docs = ?docs, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
