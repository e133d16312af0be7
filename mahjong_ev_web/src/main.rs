use anyhow::Context;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mahjong_ev_core::{
    analyze as run_analysis, score as run_score, AnalysisRequest, AnalysisResponse, ScoreRequest,
    ScoreResponse,
};
use std::{net::SocketAddr, time::Duration};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 環境変数から読む設定
#[derive(Debug, Clone)]
struct Config {
    addr: SocketAddr,
    timeout: Duration,
}

impl Config {
    fn from_env() -> anyhow::Result<Config> {
        let addr = std::env::var("MAHJONG_EV_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("MAHJONG_EV_ADDR is not a socket address: {}", addr))?;

        let timeout = match std::env::var("MAHJONG_EV_TIMEOUT_SECS") {
            Ok(s) => s
                .parse::<u64>()
                .with_context(|| format!("MAHJONG_EV_TIMEOUT_SECS is not a number: {}", s))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            addr,
            timeout: Duration::from_secs(timeout),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(addr = %config.addr, timeout_secs = config.timeout.as_secs(), "listening");

    axum::serve(listener, app).await.context("server stopped")?;
    Ok(())
}

fn router(config: &Config) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/score", post(score))
        .layer(TimeoutLayer::new(config.timeout))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn analyze(
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(req) = payload?;
    // 探索は CPU を使うのでブロッキング用のスレッドで行う
    let res = tokio::task::spawn_blocking(move || run_analysis(&req)).await?;
    Ok(Json(res))
}

async fn score(
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let Json(req) = payload?;
    let res = tokio::task::spawn_blocking(move || run_score(&req)).await?;
    Ok(Json(res))
}

#[derive(Debug)]
struct ApiError(StatusCode, String);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "worker task failed");
        ApiError(StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn analyze_handler_returns_discard_candidates() {
        // 222m 567m 34p 33s 678s 北
        let req: AnalysisRequest = serde_json::from_value(json!({
            "round_wind": "E",
            "seat_wind": "S",
            "turn": 5,
            "hand": [1, 1, 1, 4, 5, 6, 11, 12, 20, 20, 23, 24, 25, 30],
        }))
        .unwrap();
        let Json(res) = analyze(Ok(Json(req))).await.unwrap();
        assert!(res.success, "{:?}", res.message);

        let value = serde_json::to_value(&res).unwrap();
        assert_eq!(value["result"]["kind"], json!("discard"));
        assert_eq!(value["result"]["candidates"][0]["tile"], json!(30));
        assert_eq!(value["result"]["shanten"]["overall"], json!(0));
    }

    #[tokio::test]
    async fn score_handler_envelopes_errors() {
        // 和了牌が手牌にない
        let req: ScoreRequest = serde_json::from_value(json!({
            "round_wind": "E",
            "seat_wind": "S",
            "win_type": "TSUMO",
            "hand_tiles": [1, 2, 3, 4, 5, 6, 11, 12, 13, 20, 21, 22, 24, 24],
            "win_tile": 30,
        }))
        .unwrap();
        let Json(res) = score(Ok(Json(req))).await.unwrap();
        assert!(!res.success);
        assert!(res.result.is_none());
        assert!(res.message.is_some());
    }

    #[tokio::test]
    async fn api_error_keeps_status() {
        let res = ApiError(StatusCode::BAD_REQUEST, "bad json".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn config_defaults() {
        std::env::remove_var("MAHJONG_EV_ADDR");
        std::env::remove_var("MAHJONG_EV_TIMEOUT_SECS");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
