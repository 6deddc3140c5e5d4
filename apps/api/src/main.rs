mod assets;
mod config;
mod documents;
mod errors;
mod layout;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assets::HttpPhotoSource;
use crate::config::Config;
use crate::layout::{PageGeometry, Theme};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFit API v{}", env!("CARGO_PKG_VERSION"));

    let photos = Arc::new(HttpPhotoSource::new(config.photo_fetch_timeout)?);
    info!(
        "Photo fetcher initialized (timeout: {}s)",
        config.photo_fetch_timeout.as_secs()
    );

    let cv_geometry = PageGeometry::a4(config.cv_margin_mm)?;
    let report_geometry = PageGeometry::a4(config.report_margin_mm)?;
    info!(
        "Page geometry: CV margin {}mm, report margin {}mm",
        cv_geometry.margin(),
        report_geometry.margin()
    );

    let state = AppState {
        photos,
        theme: Theme::default().with_footer(config.report_footer.clone()),
        cv_geometry,
        report_geometry,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
