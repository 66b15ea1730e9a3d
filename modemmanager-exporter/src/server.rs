use crate::{
    metrics::Emitters,
    scrape::{ScrapeError, Scraper},
};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use color_eyre::eyre::{Result, WrapErr as _};
use prometheus::{Encoder as _, Registry, TEXT_FORMAT, TextEncoder};
use tracing::error;

pub const METRICS_PATH: &str = "/metrics";

pub fn router(scraper: Scraper) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics))
        .route("/", get(redirect))
        .with_state(scraper)
}

async fn redirect() -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, METRICS_PATH)],
    )
}

async fn metrics(State(scraper): State<Scraper>) -> Response {
    match render(&scraper).await {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),

        Err(e) => {
            error!("failed to scrape ModemManager: {e}");

            let status = match e.downcast_ref::<ScrapeError>() {
                Some(ScrapeError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };

            (status, format!("failed to scrape ModemManager: {e}\n")).into_response()
        }
    }
}

/// Scrapes into a registry that lives only for this request, so a failed
/// scrape never exposes samples from an earlier one.
async fn render(scraper: &Scraper) -> Result<String> {
    let registry = Registry::new();

    #[cfg(target_os = "linux")]
    registry
        .register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))
        .wrap_err("failed to register process collector")?;

    let mut emitters = Emitters::prometheus(&registry)?;
    scraper.scrape(&mut emitters).await?;

    let mut buf = vec![];
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;

    Ok(String::from_utf8(buf)?)
}
