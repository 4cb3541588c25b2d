//! Waveline route inspector.
//!
//! Prints the route intent and navigation token each argument would produce.
//! Touches neither the catalog nor the engine.

use anyhow::Context;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waveline_player::application::services::{DeepLinkRouter, IncomingReference};
use waveline_player::PlayerConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waveline_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PlayerConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(config = ?config, "Configuration loaded");

    let references: Vec<String> = std::env::args().skip(1).collect();
    if references.is_empty() {
        anyhow::bail!("usage: waveline-routes <url>...");
    }

    let router = DeepLinkRouter::new(config.album_playlist_prefix.clone());
    for raw in references {
        let mut reference = IncomingReference::from_data(raw.clone());
        let intent = router.route(&mut reference);
        let token = intent
            .as_ref()
            .and_then(|intent| intent.destination())
            .map(|destination| destination.token());
        let needs_catalog = intent.as_ref().is_some_and(|intent| intent.needs_catalog());

        let line = json!({
            "reference": raw,
            "intent": intent,
            "token": token,
            "needs_catalog": needs_catalog,
        });
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(())
}
