use edge_metrics::{api, config::AppConfig, logging};
use tracing::error;

#[tokio::main]
async fn main() {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();

    logging::init_logger();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    if let Err(err) = api::serve(config).await {
        error!(error = %err, "Server stopped");
        std::process::exit(1);
    }
}
