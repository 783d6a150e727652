use gcode_config::Config;
use gcode_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to smtp server");
    let email = email::connect(&config.email)?;
    if let Err(err) = email.ping().await {
        // The site must come up even when the mail relay is down; the
        // failure shows up again in /health and at send time.
        warn!("Failed to ping smtp server: {err:#}");
    }

    let server = environment::build_rest_server(&config, email);

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
