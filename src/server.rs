use tokio::net::TcpListener;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::Database;
use crate::routes;
use crate::services::mailer;
use crate::state::AppState;

/// Open the pool, bind, and serve until Ctrl-C / SIGTERM
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting staffdesk-api in {:?} mode", config.environment);

    let tokens = TokenService::new(&config.security)?;
    let mailer = mailer::from_config(&config)?;
    let db = Database::connect(&config.database).await?;

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    let app = routes::app(AppState::new(db.clone(), tokens, mailer, config));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db.close().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = wait_for_sigterm(tokio::signal::unix::signal(
        tokio::signal::unix::SignalKind::terminate(),
    ));

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

/// Resolves on SIGTERM. A failed registration never resolves, so the server
/// keeps running on Ctrl-C alone.
#[cfg(unix)]
async fn wait_for_sigterm(registration: std::io::Result<tokio::signal::unix::Signal>) {
    match registration {
        Ok(mut signal) => {
            signal.recv().await;
        }
        Err(e) => {
            tracing::error!("Failed to listen for SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
