use std::net::IpAddr;

use axum::Router;
use gcode_core_contact_contracts::ContactFeatureService;
use gcode_core_health_contracts::HealthFeatureService;
use gcode_shared_contracts::time::TimeService;
use tokio::net::TcpListener;
use url::Url;

mod middlewares;
mod models;
mod notice;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact, Health, Time> {
    contact: Contact,
    health: Health,
    time: Time,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    /// Canonical origin of the public site, used by the seo routes.
    pub base_url: std::sync::Arc<Url>,
}

impl<Contact, Health, Time> RestServer<Contact, Health, Time>
where
    Contact: ContactFeatureService,
    Health: HealthFeatureService,
    Time: TimeService,
{
    pub fn new(contact: Contact, health: Health, time: Time, config: RestServerConfig) -> Self {
        Self {
            contact,
            health,
            time,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()))
            .merge(routes::notice::router())
            .merge(routes::seo::router(self.config.base_url, self.time.into()));

        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);
        middlewares::panic_handler::add(router)
    }
}
