//! # 진단표 변경 감지(핫리로드) 태스크
//!
//! 원본 서버는 `fs.watchFile`로 affiliate.json 변경을 감지해 자동으로
//! 다시 읽었습니다. 같은 동작을 세 진단표 전체로 일반화한 모듈입니다.
//!
//! 구현은 파일 시스템 이벤트 대신 **mtime 폴링**입니다.
//! 일정 주기로 세 파일의 수정 시각을 조회하여, 하나라도 달라지면
//! `TableStore::reload()`로 전체 테이블을 다시 읽습니다.
//! 재로드가 실패해도 서버는 이전 스냅샷으로 계속 서빙합니다.

use crate::store::tables::{TableStore, AFFILIATE_FILE, ANALYSIS_FILE, SURVEY_FILE};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// 진단표 변경 감지 태스크를 백그라운드로 띄웁니다.
///
/// # 매개변수
/// - `store`: 공유 진단표 보관소. 태스크가 소유권을 나눠 갖도록 `Arc`로 받습니다.
/// - `interval_secs`: 폴링 주기(초). `0`이면 감지를 끄고 아무 태스크도 띄우지 않습니다.
///
/// tokio::spawn(): async 블록을 별도의 비동기 태스크로 실행합니다.
/// 서버의 요청 처리와 같은 런타임에서 돌지만 서로를 블로킹하지 않습니다.
pub fn spawn_watcher(store: Arc<TableStore>, interval_secs: u64) {
    if interval_secs == 0 {
        tracing::info!("Table hot-reload disabled (RELOAD_INTERVAL_SECS=0)");
        return;
    }

    tokio::spawn(async move {
        let mut last = file_mtimes(store.dir()).await;
        // interval(): 지정한 주기마다 깨어나는 타이머.
        // 첫 tick은 즉시 완료되므로 루프가 곧바로 한 번 돌고 이후 주기적으로 돕니다.
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            ticker.tick().await;
            let now = file_mtimes(store.dir()).await;
            if now == last {
                continue;
            }

            tracing::info!("Table file change detected, reloading");

            // 파싱은 CPU + 동기 파일 I/O 작업이므로 spawn_blocking으로
            // 전용 블로킹 스레드에 보냅니다. (비동기 워커 스레드를 잡아두지 않음)
            let reloader = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || reloader.reload()).await {
                Ok(Ok(())) => tracing::info!("Tables reloaded"),
                // {:#}: anyhow 에러의 원인 체인까지 한 줄로 출력하는 포맷
                Ok(Err(err)) => {
                    tracing::error!("Table reload failed, keeping previous snapshot: {:#}", err)
                }
                Err(err) => tracing::error!("Table reload task panicked: {}", err),
            }

            // 실패했더라도 mtime 기준점은 갱신합니다.
            // 깨진 파일을 주기마다 재시도하지 않고, 다음 실제 변경 때 다시 시도합니다.
            last = now;
        }
    });
}

/// 세 진단표 파일의 수정 시각을 조회합니다.
///
/// 파일이 없거나 조회에 실패하면 해당 항목은 `None`이 됩니다.
/// (없던 파일이 생기는 것도 "변경"으로 감지됩니다)
async fn file_mtimes(dir: &Path) -> [Option<SystemTime>; 3] {
    let mut mtimes = [None; 3];
    for (slot, name) in mtimes
        .iter_mut()
        .zip([ANALYSIS_FILE, AFFILIATE_FILE, SURVEY_FILE])
    {
        *slot = tokio::fs::metadata(dir.join(name))
            .await
            .ok()
            .and_then(|meta| meta.modified().ok());
    }
    mtimes
}
