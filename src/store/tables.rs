//! # 진단표 로드·스냅샷 모듈
//!
//! 세 개의 정적 JSON 진단표를 메모리로 읽어 들이고,
//! 요청 처리 중에는 불변(immutable) 스냅샷으로만 제공합니다.
//!
//! ## 로드 시점
//! - **시작 시**: 하나라도 읽기/파싱에 실패하면 서버가 뜨지 않습니다
//!   (잘못된 진단표로 빈 결과를 서빙하는 것보다 빨리 실패하는 편이 낫습니다).
//! - **재로드 시**: 실패하면 이전 스냅샷을 그대로 유지하고 에러만 기록합니다.
//!
//! ## 동시성 모델
//! `TableStore`는 `RwLock<Arc<Tables>>` 하나로 스냅샷을 보관합니다.
//! - 읽기: 요청당 한 번 `snapshot()`으로 `Arc`를 복제해 가져갑니다.
//!   이후 그 요청은 락과 무관하게 복제 시점의 테이블만 바라봅니다.
//! - 쓰기(재로드): 새 테이블을 **끝까지** 파싱한 뒤에야 참조를 교체하므로,
//!   어떤 독자도 반쯤 파싱된 표나 섞인 표를 관찰할 수 없습니다.

use crate::models::{AffiliateItem, Survey, TierBundles};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// 주제 → 등급별 진단문 테이블 파일
pub const ANALYSIS_FILE: &str = "analysis.json";
/// 주제 → 추천 목록 테이블 파일
pub const AFFILIATE_FILE: &str = "affiliate.json";
/// 주제 → 설문지 테이블 파일
pub const SURVEY_FILE: &str = "survey.json";

/// 미등록 주제에 사용할 범용 진단표의 키.
/// analysis.json에 이 항목이 없으면 로드 자체가 실패합니다.
pub const DEFAULT_TOPIC: &str = "default";

/// 한 번의 로드로 만들어진 세 진단표의 묶음. 로드 후에는 절대 수정되지 않습니다.
#[derive(Debug, Clone)]
pub struct Tables {
    pub analysis: HashMap<String, TierBundles>,
    pub affiliate: HashMap<String, Vec<AffiliateItem>>,
    pub survey: HashMap<String, Survey>,
}

impl Tables {
    /// 디렉토리에서 세 JSON 파일을 모두 읽어 파싱합니다.
    ///
    /// # 에러
    /// - 파일을 읽을 수 없거나 JSON이 스키마에 맞지 않는 경우
    /// - analysis.json에 `"default"` 항목이 없는 경우
    ///   (미등록 주제 fallback이 항상 가능해야 하므로 필수입니다)
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let analysis: HashMap<String, TierBundles> = read_json(&dir.join(ANALYSIS_FILE))?;

        // bail!: 메시지와 함께 즉시 anyhow::Error를 반환하는 매크로
        if !analysis.contains_key(DEFAULT_TOPIC) {
            bail!(
                "{} is missing the required \"{}\" topic entry",
                dir.join(ANALYSIS_FILE).display(),
                DEFAULT_TOPIC
            );
        }

        let affiliate = read_json(&dir.join(AFFILIATE_FILE))?;
        let survey = read_json(&dir.join(SURVEY_FILE))?;

        Ok(Self {
            analysis,
            affiliate,
            survey,
        })
    }
}

/// JSON 파일 하나를 읽어 원하는 타입으로 파싱합니다.
///
/// 제네릭 `T: DeserializeOwned`: serde로 역직렬화 가능한 아무 타입.
/// 세 테이블이 각기 다른 값 타입의 HashMap이므로 제네릭으로 공통화했습니다.
fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    // .with_context(): 에러에 "어느 파일에서" 실패했는지 문맥을 덧붙입니다.
    // 시작 실패 메시지만 보고도 원인 파일을 바로 찾을 수 있게 합니다.
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read table file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse table file {}", path.display()))
}

/// 진단표 스냅샷 보관소
///
/// 서버 전체가 `Arc<TableStore>` 하나를 공유합니다.
/// 독자(요청 핸들러)는 `snapshot()`, 작성자(재로드 태스크)는 `reload()`만 씁니다.
pub struct TableStore {
    dir: PathBuf,
    current: RwLock<Arc<Tables>>,
}

impl TableStore {
    /// 디렉토리에서 진단표를 로드하여 보관소를 만듭니다. 시작 시 1회 호출됩니다.
    pub fn load(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        let tables = Tables::load_dir(&dir)?;
        Ok(Self {
            dir,
            current: RwLock::new(Arc::new(tables)),
        })
    }

    /// 진단표 디렉토리 경로 (watcher가 mtime을 조회할 때 사용)
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 현재 스냅샷의 `Arc`를 복제해 반환합니다. 요청당 한 번 호출합니다.
    ///
    /// 락은 포인터 복제 동안만 잡히므로 사실상 경합이 없습니다.
    pub fn snapshot(&self) -> Arc<Tables> {
        // into_inner: 락이 poison 상태(이전 writer가 panic)여도 값 자체는
        // 항상 완전한 스냅샷이므로 그대로 복구해 사용합니다.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 디스크에서 진단표를 다시 읽어 스냅샷을 교체합니다.
    ///
    /// 파싱이 전부 성공한 뒤에만 참조를 바꿉니다. 실패하면 기존 스냅샷이
    /// 그대로 유지되므로, 호출자는 에러를 기록만 하고 계속 서빙하면 됩니다.
    pub fn reload(&self) -> anyhow::Result<()> {
        let fresh = Tables::load_dir(&self.dir)?;
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(fresh);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// 테스트용 최소 진단표 세트를 임시 디렉토리에 기록합니다.
    fn write_sample_tables(dir: &Path, default_detail: &str) {
        let analysis = serde_json::json!({
            "default": {
                "mild": { "detail": [default_detail], "summary": ["요약"], "expert": ["의견"] },
                "moderate": { "detail": ["중간"], "summary": ["요약"], "expert": ["의견"] },
                "severe": { "detail": ["심각"], "summary": ["요약"], "expert": ["의견"] }
            },
            "혈압 관리": {
                "mild": { "detail": ["혈압 양호"], "summary": ["요약"], "expert": ["의견"] },
                "moderate": { "detail": ["혈압 주의"], "summary": ["요약"], "expert": ["의견"] },
                "severe": { "detail": ["혈압 위험"], "summary": ["요약"], "expert": ["의견"] }
            }
        });
        let affiliate = serde_json::json!({
            "혈압 관리": [ { "name": "오메가3", "url": "https://example.com/omega3" } ]
        });
        let survey = serde_json::json!({
            "혈압 관리": {
                "title": "혈압 자가진단",
                "questions": [ { "question": "두통이 있습니까?", "options": ["없다", "가끔", "자주"] } ]
            }
        });
        fs::write(dir.join(ANALYSIS_FILE), analysis.to_string()).unwrap();
        fs::write(dir.join(AFFILIATE_FILE), affiliate.to_string()).unwrap();
        fs::write(dir.join(SURVEY_FILE), survey.to_string()).unwrap();
    }

    #[test]
    fn load_parses_all_three_tables() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample_tables(tmp.path(), "기본");
        let tables = Tables::load_dir(tmp.path()).unwrap();
        assert!(tables.analysis.contains_key("혈압 관리"));
        assert!(tables.analysis.contains_key(DEFAULT_TOPIC));
        assert_eq!(tables.affiliate["혈압 관리"][0].name, "오메가3");
        assert_eq!(tables.survey["혈압 관리"].questions.len(), 1);
    }

    #[test]
    fn missing_file_fails_load() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample_tables(tmp.path(), "기본");
        fs::remove_file(tmp.path().join(SURVEY_FILE)).unwrap();
        assert!(Tables::load_dir(tmp.path()).is_err());
    }

    #[test]
    fn malformed_json_fails_load() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample_tables(tmp.path(), "기본");
        fs::write(tmp.path().join(ANALYSIS_FILE), "{ not json").unwrap();
        assert!(Tables::load_dir(tmp.path()).is_err());
    }

    #[test]
    fn missing_default_topic_fails_load() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample_tables(tmp.path(), "기본");
        let analysis = serde_json::json!({
            "혈압 관리": {
                "mild": { "detail": ["d"], "summary": ["s"], "expert": ["e"] },
                "moderate": { "detail": ["d"], "summary": ["s"], "expert": ["e"] },
                "severe": { "detail": ["d"], "summary": ["s"], "expert": ["e"] }
            }
        });
        fs::write(tmp.path().join(ANALYSIS_FILE), analysis.to_string()).unwrap();
        assert!(Tables::load_dir(tmp.path()).is_err());
    }

    #[test]
    fn reload_swaps_snapshot_atomically() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample_tables(tmp.path(), "이전");
        let store = TableStore::load(tmp.path()).unwrap();

        // 재로드 전에 얻은 스냅샷은 교체 이후에도 이전 내용만 보여야 합니다.
        let old = store.snapshot();
        write_sample_tables(tmp.path(), "이후");
        store.reload().unwrap();

        assert_eq!(old.analysis[DEFAULT_TOPIC].mild.detail[0], "이전");
        assert_eq!(store.snapshot().analysis[DEFAULT_TOPIC].mild.detail[0], "이후");
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample_tables(tmp.path(), "이전");
        let store = TableStore::load(tmp.path()).unwrap();

        fs::write(tmp.path().join(ANALYSIS_FILE), "{ broken").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.snapshot().analysis[DEFAULT_TOPIC].mild.detail[0], "이전");
    }
}
