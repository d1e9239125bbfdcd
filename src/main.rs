//! # BabyBaton API 서버 진입점
//!
//! 보호자들이 아기 돌봄을 "바통"처럼 넘겨받으며 수유, 기저귀, 수면 기록을
//! 공유하는 서버입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성과 마이그레이션
//! 4. 음성 인식/문장 해석 클라이언트 생성
//! 5. API 라우터 설정 (`/api/v1`)
//! 6. HTTP 서버 시작

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use anyhow::{Context, Result};
use axum::{http::HeaderValue, Router};
use config::Config;
use routes::{api_router, AppState};
use services::{claude::ClaudeClient, whisper::WhisperClient};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 시스템 환경변수만으로 동작합니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 babybaton, tower_http, axum을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "babybaton=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env().context("DATABASE_URL must be set")?;
    tracing::info!("Starting BabyBaton server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 + 마이그레이션 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 5단계: 외부 서비스 클라이언트 ──
    // 키가 없어도 서버는 뜨고, 음성 해석 요청만 502로 실패합니다.
    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set, audio transcription is disabled");
    }
    if config.anthropic_api_key.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY is not set, activity extraction is disabled");
    }

    let state = AppState {
        pool,
        whisper: WhisperClient::from_config(&config)?,
        claude: ClaudeClient::from_config(&config)?,
    };

    // ── 6단계: CORS ──
    // CORS_ORIGIN이 있으면 그 출처만, 없으면 모두 허용합니다.
    let allow_origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS_ORIGIN: {}", origin))?,
        ),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 7단계: 라우터 ──
    let app = Router::new()
        .nest("/api/v1", api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 8단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
