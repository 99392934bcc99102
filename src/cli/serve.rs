use std::net::SocketAddr;

use crate::{config::Settings, error, info, server};

pub async fn serve(addr: Option<SocketAddr>) {
    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    if let Some(addr) = addr {
        settings.server_addr = addr;
    }

    info!(
        "Sessions expire after {}s of inactivity, caching up to {} lyrics",
        settings.session_ttl.as_secs(),
        settings.cache_capacity
    );

    if let Err(e) = server::start_api_server(settings).await {
        error!("Server failed. Err: {}", e);
    }
}
