//! # 진단표 접근 계층 (Static Table Access Layer)
//!
//! 디스크의 JSON 진단표와 직접 상호작용하는 코드를 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)는 파일을 직접 읽지 않고
//! 이 모듈이 들고 있는 메모리 내 스냅샷만 바라봅니다.
//!
//! 각 하위 모듈:
//! - `tables`: 세 진단표(analysis/affiliate/survey)의 파싱·검증과
//!   원자적으로 교체되는 스냅샷 보관(`TableStore`)
//! - `watcher`: 파일 변경(mtime) 감지 후 자동 재로드하는 백그라운드 태스크

pub mod tables;
pub mod watcher;

// 하위 모듈의 공개 항목을 재공개(re-export)하여
// `crate::store::TableStore`처럼 바로 접근할 수 있게 합니다.
pub use tables::*;
pub use watcher::*;
