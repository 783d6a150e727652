use std::sync::Arc;

use gcode_api_rest::RestServerConfig;
use gcode_config::Config;
use gcode_core_contact_impl::ContactFeatureConfig;
use gcode_core_health_impl::HealthFeatureConfig;

use types::{Contact, Email, Health, Rest, Template, Time};

pub mod types;

/// Builds the service graph from the configuration and the connected smtp
/// client. Every dependency is wired here once, at startup.
pub fn build_rest_server(config: &Config, email: Email) -> Rest {
    let time = Time::default();
    let template = Template::new();

    let contact = Contact::new(
        email.clone(),
        template,
        ContactFeatureConfig {
            email: Arc::new(config.contact.email.clone()),
            report_delivery_failures: config.contact.report_delivery_failures,
        },
    );

    let health = Health::new(
        time,
        email,
        HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );

    Rest::new(
        contact,
        health,
        time,
        RestServerConfig {
            base_url: Arc::new(config.site.base_url.clone()),
        },
    )
}
