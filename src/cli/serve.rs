use crate::{config::Config, error, server};

/// Runs the backend until it is shut down.
pub async fn serve() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    if let Err(e) = server::start_api_server(config).await {
        error!("Server failed. Err: {}", e);
    }
}
