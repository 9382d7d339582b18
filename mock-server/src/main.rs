use mock_server::AppConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "4444".to_string());
    let config = AppConfig {
        token: std::env::var("FORGE_TOKEN").ok().filter(|t| !t.is_empty()),
        ..AppConfig::default()
    };
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, auth = config.token.is_some(), "forge mock listening");
    mock_server::run_with(listener, config).await
}
