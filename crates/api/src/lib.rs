pub mod routes;
pub mod state;
mod ws;

use axum::Router;
use runtime::MarketHandle;

pub fn app(market: MarketHandle) -> Router {
    routes::router(state::AppState::new(market))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use core_sim::{default_catalog, MarketEngine, SimConfig};
    use rand::{rngs::StdRng, SeedableRng};
    use runtime::{FeedMode, MarketHandle, MarketRuntime, RuntimeOptions};
    use serde_json::Value;
    use tokio::sync::watch;
    use tower::ServiceExt;

    use crate::app;

    fn market(mode: FeedMode) -> (MarketRuntime<StdRng>, MarketHandle) {
        let engine = MarketEngine::initialize(
            default_catalog(),
            SimConfig::default(),
            StdRng::seed_from_u64(21),
        )
        .unwrap();
        MarketRuntime::new(
            engine,
            RuntimeOptions {
                mode,
                ..RuntimeOptions::default()
            },
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_feed(body: &str) -> Request<Body> {
        Request::post("/feed")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn lists_assets_in_catalog_order() {
        let (_runtime, handle) = market(FeedMode::Sim);

        let (status, body) = send(app(handle), Request::get("/assets").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        let assets = body.as_array().unwrap();
        assert_eq!(assets.len(), 6);
        assert_eq!(assets[0]["symbol"], "AAPL");
        assert_eq!(assets[0]["stopLoss"], 183.4);
    }

    #[tokio::test]
    async fn get_asset_returns_snapshot_or_not_found() {
        let (_runtime, handle) = market(FeedMode::Sim);

        let (found_status, found) = send(
            app(handle.clone()),
            Request::get("/assets/BTC-USD").body(Body::empty()).unwrap(),
        )
        .await;
        let (missing_status, missing) = send(
            app(handle),
            Request::get("/assets/XXXX").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(found_status, StatusCode::OK);
        assert_eq!(found["symbol"], "BTC-USD");
        assert_eq!(found["history"].as_array().map(Vec::len), Some(30));
        assert_eq!(missing_status, StatusCode::NOT_FOUND);
        assert_eq!(missing["error"], "unknown symbol: XXXX");
    }

    #[tokio::test]
    async fn signals_report_cached_signal_per_symbol() {
        let (_runtime, handle) = market(FeedMode::Sim);

        let (status, body) = send(app(handle), Request::get("/signals").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["symbol"], "AAPL");
        assert_eq!(body[0]["signal"], "SELL");
        assert_eq!(body[0]["risk"], "low");
    }

    #[tokio::test]
    async fn feed_post_is_rejected_in_sim_mode() {
        let (_runtime, handle) = market(FeedMode::Sim);

        let (status, _) = send(app(handle), post_feed(r#"{"symbol":"AAPL","current_price":195.0}"#)).await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn feed_post_rejects_invalid_json() {
        let (_runtime, handle) = market(FeedMode::Live);

        let (status, body) = send(app(handle.clone()), post_feed("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "payload is not valid JSON");
        assert_eq!(handle.feed_counts().dropped, 1);
    }

    #[tokio::test]
    async fn feed_post_merges_updates_into_published_snapshot() {
        let (runtime, handle) = market(FeedMode::Live);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut snapshots = handle.subscribe();
        tokio::spawn(runtime.run(shutdown_rx));

        let (status, body) = send(
            app(handle.clone()),
            post_feed(
                r#"[{"symbol":"AAPL","current_price":195.00,"trend":"Bullish"},{"current_price":1.0}]"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["accepted"], 1);
        assert_eq!(body["dropped"], 1);

        snapshots.changed().await.unwrap();
        let aapl = snapshots.borrow().get("AAPL").cloned().unwrap();
        assert_eq!(aapl.price, 195.0);
        assert_eq!(aapl.stop_loss, 183.4);

        let (_, health) = send(
            app(handle),
            Request::get("/feed/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(health["mode"], "live");
        assert_eq!(health["merged"], 1);
        assert_eq!(health["dropped"], 1);
    }
}
