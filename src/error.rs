//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 요청 처리 중 발생하는 에러를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 시작 시점의 치명적 에러(진단표 로드 실패 등)는 이 타입이 아니라
//! `anyhow::Error`로 전파되어 프로세스를 종료시킵니다. 요청 단위 에러는
//! 어떤 경우에도 프로세스를 죽이지 않고 JSON 에러 응답으로 변환됩니다.

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

// #[derive(Debug, Error)]: 두 가지 derive 매크로를 적용합니다.
// - Debug: 디버깅용 출력 ({:?})
// - Error (thiserror): std::error::Error 트레이트를 자동 구현.
//   #[error("...")] 어트리뷰트로 Display 트레이트(사람이 읽을 에러 메시지)도 자동 생성합니다.

/// 요청 처리 중 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 안정적인 에러 코드 문자열로
/// 변환됩니다. 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청 본문이 스키마(topic: string, answers: string[])에 맞지 않음 (HTTP 400)
    /// String을 포함하여 어떤 필드가 왜 거부되었는지 전달합니다.
    /// {0}은 첫 번째 필드(String)를 참조하는 포맷 문법입니다.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 진단표/설문표에 없는 주제를 요청함 (HTTP 404)
    /// 분석 API에서는 fallback 정책이 꺼져 있을 때만 발생합니다.
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

// impl IntoResponse for AppError:
// 핸들러가 Err(AppError)를 반환하면 Axum이 이 메서드를 호출하여
// 적절한 HTTP 응답을 생성합니다.
impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 응답 본문은 원본 프런트엔드가 기대하는 `ok` 봉투 형식입니다:
    /// `{ "ok": false, "error": "<안정적 코드>", "message": "<설명>" }`
    ///
    /// 내부 에러(Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다 (보안을 위해).
    fn into_response(self) -> Response {
        // match: 패턴 매칭. enum의 각 variant에 대해 다른 처리를 합니다.
        // (status, code, message) 튜플을 반환합니다.
        let (status, code, message) = match self {
            // ref: 패턴 매칭에서 값을 이동(move)하지 않고 참조만 빌려옵니다.
            AppError::InvalidInput(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_input", msg.clone())
            }
            AppError::UnknownTopic(ref topic) => (
                StatusCode::NOT_FOUND,
                "unknown_topic",
                format!("Topic '{}' is not supported", topic),
            ),
            AppError::Internal(ref msg) => {
                // 내부 에러는 로그에 기록 (서버 관리자용)
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    // 클라이언트에는 일반적인 메시지만 반환 (보안: 내부 구현 노출 방지)
                    "An internal error occurred".to_string(),
                )
            }
        };

        // JSON 응답 본문을 생성합니다.
        // 결과: { "ok": false, "error": "invalid_input", "message": "..." }
        let body = Json(json!({
            "ok": false,
            "error": code,
            "message": message
        }));

        // Axum은 튜플 (상태코드, 본문)을 자동으로 HTTP 응답으로 변환합니다.
        (status, body).into_response()
    }
}
