use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use runtime::{live::parse_feed_payload, SubmitError};

use crate::{
    state::{AppState, ErrorResponse, FeedAcceptedResponse},
    ws,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/assets/:symbol", get(get_asset))
        .route("/signals", get(list_signals))
        .route("/feed", post(post_feed))
        .route("/feed/health", get(feed_health))
        .route("/ws/market", get(ws::market_socket))
        .with_state(state)
}

async fn list_assets(State(state): State<AppState>) -> Response {
    let snapshot = state.snapshot();
    Json(snapshot.assets()).into_response()
}

async fn get_asset(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    let snapshot = state.snapshot();
    match snapshot.get(&symbol) {
        Some(asset) => Json(asset).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("unknown symbol: {symbol}"))),
        )
            .into_response(),
    }
}

async fn list_signals(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.signals())
}

async fn feed_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.feed_health())
}

async fn post_feed(State(state): State<AppState>, body: String) -> Response {
    let market = state.market();
    if !market.mode().accepts_feed() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(format!(
                "feed updates are disabled in {} mode",
                market.mode().as_str()
            ))),
        )
            .into_response();
    }

    let batch = match parse_feed_payload(&body) {
        Ok(batch) => batch,
        Err(error) => {
            tracing::warn!(%error, "rejecting feed payload");
            market.record_dropped(1);
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error.to_string())))
                .into_response();
        }
    };

    let dropped = batch.rejected.len();
    if dropped > 0 {
        market.record_dropped(dropped as u64);
    }

    let mut accepted = 0;
    for update in batch.updates {
        match market.submit(update).await {
            Ok(()) => accepted += 1,
            Err(SubmitError::FeedDisabled) => {
                return StatusCode::CONFLICT.into_response();
            }
            Err(error @ SubmitError::RuntimeStopped) => {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::new(error.to_string())),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::ACCEPTED,
        Json(FeedAcceptedResponse { accepted, dropped }),
    )
        .into_response()
}
