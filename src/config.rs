//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `HOST` / `PORT`: 서버 바인딩 주소와 포트
//! - `DATA_PATH`: 진단표 JSON 파일들이 있는 디렉토리
//! - `PUBLIC_PATH`: 정적 안내 페이지 디렉토리 (있을 때만 서빙)
//! - `SCORE_PER_HIT`: 위험 단어 1회 감지당 가산 점수 (K 계수)
//! - `TOPIC_FALLBACK`: 미등록 주제를 기본 진단표로 대체할지 여부
//! - `RELOAD_INTERVAL_SECS`: 진단표 파일 변경 감지 주기 (0이면 비활성화)

// std::env: Rust 표준 라이브러리의 환경변수 모듈
use std::env;

// #[derive(...)]: 자동으로 트레이트 구현을 생성하는 **derive 매크로**
// - Debug: {:?} 포맷으로 출력 가능 (디버깅용 문자열 표현)
// - Clone: .clone() 메서드로 값을 복제 가능
#[derive(Debug, Clone)]
/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
pub struct Config {
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    /// u16: 0~65535 범위의 부호 없는 16비트 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
    /// 진단표 JSON(analysis/affiliate/survey)이 저장된 디렉토리 (기본값: "data")
    pub data_path: String,
    /// 정적 안내 페이지 디렉토리 (기본값: "public")
    pub public_path: String,
    /// 위험 단어 1회 감지당 점수 (기본값: 10 → 감지 10회면 100점 포화)
    pub score_per_hit: u32,
    /// 미등록 주제 처리 정책 (기본값: true)
    /// true  → "default" 진단표로 대체하여 항상 결과를 돌려줍니다.
    /// false → 404 unknown_topic 에러를 반환합니다.
    pub topic_fallback: bool,
    /// 진단표 파일 변경 감지(mtime 폴링) 주기, 초 단위 (기본값: 10, 0이면 끔)
    pub reload_interval_secs: u64,
}

// impl: 구조체에 메서드를 추가하는 블록
impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 모든 항목에 기본값이 있으므로 이 함수는 실패하지 않습니다.
    /// (진단표 파일이 실제로 존재하는지는 시작 단계의 로드에서 검증합니다.)
    pub fn from_env() -> Self {
        Self {
            // unwrap_or_else(|_| ...): 환경변수가 없을 때 실행할 클로저(익명 함수).
            // |_|: 클로저의 매개변수. `_`는 "이 값은 사용하지 않겠다"는 의미입니다.
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            // 포트 번호는 문자열 → 숫자 변환이 필요합니다.
            // .parse(): 문자열을 다른 타입으로 파싱. 여기서는 u16으로 변환합니다.
            // .unwrap_or(3000): 파싱 실패 시 기본값 3000 사용
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            data_path: env::var("DATA_PATH").unwrap_or_else(|_| "data".to_string()),
            public_path: env::var("PUBLIC_PATH").unwrap_or_else(|_| "public".to_string()),

            score_per_hit: env::var("SCORE_PER_HIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // "false"만 비활성화로 취급하고, 그 외 값은 기본 정책(true)을 따릅니다.
            topic_fallback: env::var("TOPIC_FALLBACK")
                .map(|v| v != "false")
                .unwrap_or(true),

            reload_interval_secs: env::var("RELOAD_INTERVAL_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }
}
