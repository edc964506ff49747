//! # 설문 조회 API 라우트 핸들러
//!
//! 주제별 설문 문항을 프런트엔드에 내려주는 엔드포인트입니다.
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /survey/{topic} | 주제의 설문지(문항/보기 목록) 조회 |
//!
//! 분석 API와 달리 설문에는 fallback이 없습니다.
//! 범용 설문지라는 것이 존재하지 않으므로, 미등록 주제는 언제나 404입니다.

use crate::{error::AppError, routes::analyze::AppState};
use axum::{
    extract::{Path, State}, // Path: URL 경로 파라미터를 추출하는 추출자
    Json,
};
use serde_json::{json, Value};

/// `GET /survey/{topic}` — 주제의 설문지를 조회합니다.
///
/// ## Extractor 설명
/// `Path(topic): Path<String>`: URL의 `{topic}` 부분을 String으로 추출합니다.
/// 한글 주제명은 URL 인코딩되어 오더라도 Axum이 디코딩해 줍니다.
///
/// ## 에러 처리
/// - 미등록 주제: 404 unknown_topic
pub async fn get_survey(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Json<Value>, AppError> {
    let tables = state.store.snapshot();
    let survey = tables
        .survey
        .get(&topic)
        .cloned()
        .ok_or_else(|| AppError::UnknownTopic(topic))?;
    Ok(Json(json!({ "ok": true, "survey": survey })))
}
