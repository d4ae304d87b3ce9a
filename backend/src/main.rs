//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use routeslip::config::{AppSettings, Secrets, secrets_from_process_env};
use routeslip::domain::AccessGate;
use routeslip::domain::ports::{KeyValueStore, ReceiptExtractor};
use routeslip::inbound::http::health::HealthState;
use routeslip::outbound::gemini::GeminiReceiptExtractor;
use routeslip::outbound::kv::{InMemoryKeyValueStore, RedisKeyValueStore};
use server::{ServerConfig, create_server};

fn other(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

async fn build_store(settings: &AppSettings) -> std::io::Result<Arc<dyn KeyValueStore>> {
    match settings.redis_url() {
        Some(url) => {
            let store = RedisKeyValueStore::connect(url).await.map_err(other)?;
            info!("using Redis key-value store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("no redis_url configured; routes will be lost on restart");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
    }
}

fn build_extractor(
    settings: &AppSettings,
    secrets: &mut Secrets,
) -> std::io::Result<Arc<dyn ReceiptExtractor>> {
    let api_key = secrets.gemini_api_key.take();
    if api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; receipt analysis will fail");
    }
    let extractor = GeminiReceiptExtractor::new(
        &settings.gemini_endpoint().map_err(other)?,
        settings.gemini_model(),
        api_key,
        settings.gemini_timeout().map_err(other)?,
    )
    .map_err(other)?;
    Ok(Arc::new(extractor))
}

fn build_access_gate(secrets: &mut Secrets) -> AccessGate {
    let gate = AccessGate::new(
        secrets
            .history_password
            .take()
            .map(|secret| secret.as_str().to_owned()),
    );
    match gate.fingerprint() {
        Some(fingerprint) => info!(fingerprint = %fingerprint, "history password loaded"),
        None => warn!("HISTORY_PASSWORD is not set; history endpoints will fail"),
    }
    gate
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(other)?;
    let mut secrets = secrets_from_process_env();

    let store = build_store(&settings).await?;
    let extractor = build_extractor(&settings, &mut secrets)?;
    let access = build_access_gate(&mut secrets);

    let config = ServerConfig::new(settings.bind_addr().map_err(other)?, store, extractor, access)
        .with_draft_ttl(settings.draft_ttl().map_err(other)?)
        .with_upload_limit(settings.upload_limit().map_err(other)?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
