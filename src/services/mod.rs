//! # 비즈니스 로직(Service) 모듈
//!
//! HTTP 계층(routes/)과 분리된 순수 로직을 모아둔 모듈입니다.
//! - `scoring`: 자유 서술 응답에서 위험 단어를 집계하여
//!   위험 점수·등급·진단문 묶음을 만들어내는 위험도 분석 엔진

pub mod scoring;

pub use scoring::*;
