//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `analyze`: 자가진단 응답 분석 (핵심 엔드포인트, AppState 정의 포함)
//! - `survey`: 주제별 설문 문항 조회
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod analyze;
pub mod health;
pub mod survey;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::analyze`처럼 바로 접근 가능하게 합니다.
pub use analyze::*;
pub use health::*;
pub use survey::*;
