use axum::{routing::get, Router};
use core_sim::{default_catalog, MarketEngine, SimConfig, SimError};
use rand::{rngs::StdRng, SeedableRng};
use runtime::MarketHandle;

use crate::config::Config;

pub fn build_engine(config: &Config) -> Result<MarketEngine<StdRng>, SimError> {
    let rng = match config.seed {
        Some(seed) => {
            tracing::info!(seed, "seeding market engine");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let sim_config = SimConfig {
        tick_interval_ms: config.tick_interval_ms,
        ..SimConfig::default()
    };

    MarketEngine::initialize(default_catalog(), sim_config, rng)
}

pub fn build_app(market: MarketHandle) -> Router {
    api::app(market).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use runtime::{FeedMode, MarketRuntime};
    use tower::ServiceExt;

    use crate::config::Config;

    fn config(seed: Option<u64>) -> Config {
        Config {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            mode: FeedMode::Sim,
            tick_interval_ms: 2_000,
            seed,
            log_level: "info".to_owned(),
        }
    }

    #[test]
    fn seeded_engines_start_from_identical_histories() {
        let first = super::build_engine(&config(Some(11))).unwrap();
        let second = super::build_engine(&config(Some(11))).unwrap();

        let first_btc = first.get_asset("BTC-USD").unwrap();
        let second_btc = second.get_asset("BTC-USD").unwrap();

        assert_eq!(
            first_btc.history.to_vec(),
            second_btc.history.to_vec()
        );
        assert_eq!(first.list_assets().len(), 6);
    }

    #[test]
    fn engine_carries_configured_tick_period() {
        let engine = super::build_engine(&Config {
            tick_interval_ms: 750,
            ..config(Some(5))
        })
        .unwrap();

        assert_eq!(engine.config().tick_interval_ms, 750);
    }

    #[tokio::test]
    async fn server_healthcheck_responds_ok() {
        let engine = super::build_engine(&config(Some(3))).unwrap();
        let (_runtime, handle) = MarketRuntime::new(engine, config(Some(3)).runtime_options());
        let app = super::build_app(handle);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn server_exposes_market_routes() {
        let engine = super::build_engine(&config(Some(3))).unwrap();
        let (_runtime, handle) = MarketRuntime::new(engine, config(Some(3)).runtime_options());
        let app = super::build_app(handle);

        let response = app
            .oneshot(Request::get("/assets/ETH-USD").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let asset: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(asset["symbol"], "ETH-USD");
    }
}
