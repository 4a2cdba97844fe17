use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use accounts_api::config::AppConfig;
use accounts_api::routes;
use accounts_api::services::mailer::SmtpNotifier;
use accounts_api::services::token::TokenService;
use accounts_api::state::AppState;
use accounts_api::store::postgres::PgAccountStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();

    let store = PgAccountStore::connect(&config.database_url).await?;
    let notifier = SmtpNotifier::new(&config)?;
    let tokens = TokenService::new(&config.jwt_secret);
    let state = AppState::new(Arc::new(store), Arc::new(notifier), tokens);

    let app = routes::app(state);

    let host: IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((host, config.port));
    tracing::info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
