//! # 분석 API 라우트 핸들러
//!
//! 자가진단 응답을 받아 위험도 진단 결과를 돌려주는 핵심 엔드포인트입니다.
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | POST | /analyze | `{ topic, answers[] }` → 진단 결과 묶음 |
//!
//! ## Axum 핸들러 패턴
//! Axum 핸들러는 **Extractor(추출기)**를 매개변수로 받습니다.
//! Extractor는 HTTP 요청에서 데이터를 자동으로 추출합니다:
//! - `State(state)`: 앱 전역 상태 (진단표 스냅샷 보관소, 분석 옵션)
//! - `Json(body)`: 요청 본문을 JSON으로 파싱
//!
//! 반환 타입이 `Result<T, AppError>`이면, Axum이 자동으로:
//! - `Ok(T)` → T를 HTTP 응답으로 변환 (IntoResponse 트레이트 사용)
//! - `Err(AppError)` → AppError를 에러 JSON 응답으로 변환

use crate::{
    error::AppError,
    models::AnalyzeRequest,
    services::{self, ScoringOptions},
    store::TableStore,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// Axum의 의존성 주입(Dependency Injection) 메커니즘입니다.
///
/// #[derive(Clone)]: Axum의 State Extractor는 내부적으로 AppState를
/// clone하므로 필수입니다. `Arc<TableStore>`는 clone해도 보관소가
/// 복제되지 않고 같은 스냅샷 보관소를 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// 진단표 스냅샷 보관소 (요청마다 snapshot()으로 읽기 전용 참조를 얻음)
    pub store: Arc<TableStore>,
    /// 배포 단위 분석 옵션 (K 계수, 미등록 주제 정책)
    pub scoring: ScoringOptions,
}

/// `POST /analyze` — 응답 목록을 분석하여 진단 결과를 반환합니다.
///
/// 요청: `{ "topic": "혈압 관리", "answers": ["가슴이 답답해요", ...] }`
/// 응답: `{ "ok": true, "result": { riskScore, level, detail, ... } }`
///
/// ## Extractor 설명
/// `Result<Json<Value>, JsonRejection>`: 본문이 JSON이 아니면 Json 추출이
/// 거부되는데, 그 거부를 Err로 직접 받아 Axum 기본 거부 응답(텍스트) 대신
/// 우리의 안정적인 `invalid_input` JSON 봉투로 변환합니다.
/// 프런트엔드는 어떤 실패에서도 같은 모양의 에러 봉투를 받습니다.
///
/// ## 에러 처리
/// - 본문이 JSON이 아니거나 스키마 위반: 400 invalid_input
/// - 미등록 주제 (fallback 정책이 꺼진 배포에서만): 404 unknown_topic
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body.map_err(|rejection| {
        AppError::InvalidInput(format!("request body must be JSON: {}", rejection))
    })?;

    // 경계 검증: 이후 로직은 타입이 보장된 값만 다룹니다.
    let request = AnalyzeRequest::from_value(&body)?;

    // 스냅샷을 요청당 한 번만 가져옵니다. 분석 도중 핫리로드가 일어나도
    // 이 요청은 처음 본 테이블만 일관되게 바라봅니다.
    let tables = state.store.snapshot();
    let result = services::analyze(&tables, state.scoring, &request.topic, &request.answers)?;

    Ok(Json(json!({ "ok": true, "result": result })))
}
