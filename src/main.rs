use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eventquote_web::cache::{self, AppCache};
use eventquote_web::cms::SanityClient;
use eventquote_web::config::Config;
use eventquote_web::geo::NominatimGeocoder;
use eventquote_web::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("eventquote_web=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let cms = Arc::new(SanityClient::new(&config.cms).context("building CMS client")?);
    let geocoder =
        Arc::new(NominatimGeocoder::new(&config.geocoder).context("building geocoder")?);
    let cache = AppCache::new();

    if config.cms.token.is_none() {
        tracing::warn!("SANITY_API_TOKEN not set; quotes will not be saved");
    }

    tokio::spawn(cache::start_settings_refresher(
        cache.clone(),
        cms.clone(),
        config.transport_fallback.clone(),
    ));

    let state = AppState::new(cms, geocoder, cache, config.transport_fallback.clone());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;
    info!("Listening on {}", config.bind_address());

    axum::serve(listener, app).await?;
    Ok(())
}
