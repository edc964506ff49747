//! # 노을빛하루 서버 진입점
//!
//! 이 파일은 시니어 건강 자가진단 백엔드의 **시작점(entry point)**입니다.
//! Rust 프로그램은 항상 `main()` 함수에서 실행이 시작됩니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩
//! 4. 진단표(analysis/affiliate/survey JSON) 로드 — 실패 시 즉시 종료
//! 5. 진단표 변경 감지(핫리로드) 태스크 시작
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod` 키워드는 다른 파일을 모듈로 가져옵니다.
// 예: `mod config;`는 같은 디렉토리의 `config.rs` 또는 `config/mod.rs`를 가져옵니다.
// Rust에서는 파일 시스템 구조가 곧 모듈 구조입니다.
mod config;
mod error;
mod models;
mod routes;
mod services;
mod store;

// ── 외부 크레이트 및 모듈에서 필요한 항목 가져오기 ──
// `use` 키워드는 다른 모듈의 항목을 현재 스코프로 가져옵니다.
use anyhow::Context; // 에러에 "무엇을 하다 실패했는지" 문맥을 붙이는 확장 트레이트
use axum::{
    routing::{get, post}, // HTTP 메서드별 라우팅 함수들
    Router,               // 라우터: URL 경로와 핸들러를 연결하는 구조체
};
use config::Config;
use routes::analyze::AppState;
use services::ScoringOptions;
use std::{path::Path, sync::Arc};
use store::TableStore;
use tower_http::{
    cors::{Any, CorsLayer},   // CORS(Cross-Origin Resource Sharing) 설정
    services::ServeDir,       // 정적 파일 서빙 서비스 (안내 페이지용)
    trace::TraceLayer,        // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: 비동기 런타임을 시작하는 **어트리뷰트 매크로**
// async/await 코드를 실행하려면 비동기 런타임(Tokio)이 필요합니다.
// 이 매크로가 내부적으로 tokio 런타임을 생성하고 main을 그 안에서 실행합니다.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일에서 환경변수를 읽어옵니다. (예: PORT, DATA_PATH 등)
    // .ok()는 Result를 Option으로 변환하여, .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // registry(): 로그 수집기를 만들고
    // .with(): 필터와 포맷터를 레이어처럼 쌓아올립니다
    tracing_subscriber::registry()
        .with(
            // EnvFilter: RUST_LOG 환경변수로 로그 레벨을 제어합니다.
            // 환경변수가 없으면 기본값으로 이 크레이트와 HTTP 계층을 debug 레벨로 설정
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noeulbit_haru=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // 모든 항목에 기본값이 있으므로 이 단계는 실패하지 않습니다.
    let config = Config::from_env();
    tracing::info!(
        "Starting noeulbit-haru server on {}:{}",
        config.host,
        config.port
    );

    // ── 4단계: 진단표 로드 ──
    // 세 JSON 파일을 모두 읽어 메모리 스냅샷을 만듭니다.
    // 하나라도 깨져 있으면 빈 진단표로 서빙하는 대신 시작 자체를 실패시킵니다.
    // `?` 연산자: Result가 Err이면 즉시 main에서 반환 → 비정상 종료 코드로 끝납니다.
    let store = Arc::new(
        TableStore::load(&config.data_path)
            .with_context(|| format!("failed to load tables from '{}'", config.data_path))?,
    );
    tracing::info!(
        "Loaded tables from '{}' ({} analysis topics)",
        config.data_path,
        store.snapshot().analysis.len()
    );

    // ── 5단계: 진단표 변경 감지 태스크 시작 ──
    // 파일이 바뀌면 전체를 다시 파싱한 뒤 스냅샷을 원자적으로 교체합니다.
    store::spawn_watcher(Arc::clone(&store), config.reload_interval_secs);

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    // AppState: 모든 라우트 핸들러가 공유하는 데이터를 담는 구조체.
    // Axum에서는 State를 통해 핸들러에 의존성을 주입합니다.
    let state = AppState {
        store,
        scoring: ScoringOptions {
            score_per_hit: config.score_per_hit,
            topic_fallback: config.topic_fallback,
        },
    };

    // ── 7단계: API 라우터 설정 ──
    // Router::new(): 빈 라우터를 생성합니다.
    // .route(): URL 패턴과 핸들러 함수를 연결합니다.
    let api_routes = Router::new()
        // 자가진단 분석 API (핵심 엔드포인트)
        .route("/analyze", post(routes::analyze))
        // {topic}은 URL 경로 파라미터 (Path<String>으로 핸들러에서 추출)
        .route("/survey/{topic}", get(routes::get_survey))
        // 헬스체크 API (서버 상태 확인용)
        .route("/health", get(routes::health_check))
        // .with_state(): 이 라우터의 모든 핸들러에서 AppState를 사용할 수 있게 합니다.
        .with_state(state);

    // ── 8단계: CORS 미들웨어 설정 ──
    // CORS: 브라우저의 보안 정책. 다른 도메인에서의 API 호출을 허용/차단합니다.
    // 개발 환경에서는 Any(모두 허용)로 설정합니다.
    // 프로덕션에서는 특정 도메인만 허용해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 9단계: 정적 안내 페이지 서빙 설정 ──
    // index.html / question.html / result.html 같은 안내 페이지가 있으면
    // 같은 서버에서 서빙합니다. API 경로에 매칭되지 않는 요청이 대상입니다.
    // if-else가 표현식(expression)으로 사용됩니다.
    let app = if Path::new(&config.public_path).exists() {
        tracing::info!("Serving static pages from '{}'", config.public_path);
        api_routes
            // .fallback_service(): 라우트에 매칭되지 않는 모든 요청을 정적 파일로 전달
            .fallback_service(ServeDir::new(&config.public_path))
            .layer(cors)
            .layer(TraceLayer::new_for_http()) // HTTP 요청/응답 자동 로깅
    } else {
        tracing::warn!(
            "Static page directory '{}' not found, serving API only",
            config.public_path
        );
        api_routes.layer(cors).layer(TraceLayer::new_for_http())
    };

    // ── 10단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    // TcpListener: TCP 연결을 수신 대기하는 소켓
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    // axum::serve(): Axum 서버를 시작하고 요청을 처리합니다.
    // 이 줄에서 서버가 영원히 실행됩니다 (Ctrl+C로 종료할 때까지).
    axum::serve(listener, app).await?;

    Ok(())
}
