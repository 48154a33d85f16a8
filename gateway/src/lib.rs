pub mod config;
pub mod encoding;
pub mod errors;
pub mod handler;
pub mod metrics_defs;
pub mod sampler;
pub mod service;

#[cfg(test)]
mod testutils;

use errors::GatewayError;
use handler::SubscriptionHandler;
use service::GatewayService;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::sync::Arc;

pub async fn run(config: config::Config) -> Result<(), GatewayError> {
    config.validate()?;
    shared::metrics_defs::describe_all(metrics_defs::ALL_METRICS);

    let handler = Arc::new(SubscriptionHandler::from_config(&config));
    if !handler.is_ready() {
        tracing::warn!("Stores are not ready, /ready will report unavailable until they are");
    }

    let readiness = handler.clone();
    let gateway_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        GatewayService::new(handler),
    );
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        AdminService::<_, GatewayError>::new(move || readiness.is_ready()),
    );

    tokio::try_join!(gateway_task, admin_task)?;
    Ok(())
}
