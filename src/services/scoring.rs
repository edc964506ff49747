//! # 위험도 분석 엔진 (Risk Scorer)
//!
//! 이 서비스의 전체 흐름:
//! 1. 응답 문장들에서 위험 단어를 집계 (부분 문자열 매칭)
//! 2. 감지 횟수 × 가중치(K)를 0~100으로 포화시켜 위험 점수 계산
//! 3. 점수를 고정 임계값(70/40)으로 3단계 등급에 매핑
//! 4. (주제, 등급)으로 진단표에서 진단문 묶음을 조회
//! 5. 주제에 연결된 추천 목록을 단순 키 조회로 첨부
//!
//! 전 과정이 상태 없는 순수 계산입니다. 요청 사이에 어떤 이력도 공유하지
//! 않으며, 진단표 스냅샷은 읽기 전용으로만 참조합니다. 같은 입력은
//! 언제나 같은 결과를 냅니다 (등급을 난수로 고르는 일은 없습니다).

use crate::error::AppError;
use crate::models::{DiagnosisBundle, SeverityTier};
use crate::store::{Tables, DEFAULT_TOPIC};

/// 위험 단어 사전: 응답에 이 단어가 부분 문자열로 나타나면 점수가 올라갑니다.
/// 프로세스 전역 상수이며 사용자나 설정으로 바뀌지 않습니다.
pub const RISK_WORDS: &[&str] = &[
    "심함", "악화", "통증", "위험", "저림", "숨", "가슴", "이상", "갑자기",
];

/// 분석 동작을 결정하는 배포 단위 옵션 (Config에서 한 번 도출)
#[derive(Debug, Clone, Copy)]
pub struct ScoringOptions {
    /// 감지 1회당 가산 점수 (K). 기본 10 → 10회 감지면 100점 포화.
    pub score_per_hit: u32,
    /// 미등록 주제를 "default" 진단표로 대체할지(true), 404로 거부할지(false)
    pub topic_fallback: bool,
}

/// 기본 사전으로 위험 단어를 감지합니다.
pub fn detect_risk_words(answers: &[String]) -> Vec<String> {
    detect_with_lexicon(answers, RISK_WORDS)
}

/// 응답 목록에서 사전의 단어를 감지하여 감지 순서대로 반환합니다.
///
/// 집계 규칙: **(응답, 단어) 쌍마다 최대 1회**입니다.
/// 한 응답 안에 같은 단어가 여러 번 나와도 1회로 세고,
/// 서로 다른 응답에 나타나면 각각 셉니다. 대소문자를 구분하는 정확한
/// 부분 문자열 매칭이며(한국어 사전이라 대소문자는 사실상 무관),
/// 응답을 이어 붙이지 않고 원소별로 스캔하므로 경계에 걸친 우연한
/// 매칭이 생기지 않습니다.
pub fn detect_with_lexicon(answers: &[String], lexicon: &[&str]) -> Vec<String> {
    let mut detected = Vec::new();
    for answer in answers {
        for word in lexicon {
            // .contains(): 부분 문자열 검사. 원소별 스캔이므로 O(응답 수 × 사전 크기).
            if answer.contains(word) {
                detected.push((*word).to_string());
            }
        }
    }
    detected
}

/// 감지 횟수를 0~100 범위의 위험 점수로 변환합니다.
///
/// `score = min(100, hits × K)` — 선형 가산 후 100에서 포화시킵니다.
/// 응답 목록이 아무리 길어도 점수는 100을 넘지 않습니다.
pub fn risk_score(hits: usize, score_per_hit: u32) -> u32 {
    // u64로 곱해 오버플로 없이 계산한 뒤 100으로 자릅니다.
    let raw = (hits as u64).saturating_mul(u64::from(score_per_hit));
    raw.min(100) as u32
}

/// 주제와 응답 목록을 진단 결과 묶음으로 변환합니다.
///
/// # 매개변수
/// - `tables`: 요청 시점의 진단표 스냅샷 (읽기 전용)
/// - `opts`: 배포 단위 분석 옵션
/// - `topic`: 진단 주제 (검증된 비어 있지 않은 문자열)
/// - `answers`: 자유 서술 응답 목록 (비어 있어도 됩니다)
///
/// # 에러
/// - `UnknownTopic`: 진단표에 없는 주제이고 fallback 정책이 꺼진 경우.
///   fallback이 켜져 있으면 "default" 진단표로 대체하여 절대 실패하지 않습니다.
pub fn analyze(
    tables: &Tables,
    opts: ScoringOptions,
    topic: &str,
    answers: &[String],
) -> Result<DiagnosisBundle, AppError> {
    let detected = detect_risk_words(answers);
    let score = risk_score(detected.len(), opts.score_per_hit);
    let level = SeverityTier::for_score(score);

    // (주제, 등급) → 진단문. 미등록 주제는 정책에 따라 기본표 또는 404.
    let bundles = match tables.analysis.get(topic) {
        Some(bundles) => bundles,
        None if opts.topic_fallback => tables
            .analysis
            .get(DEFAULT_TOPIC)
            // 로드 단계에서 "default" 존재를 검증하므로 도달하지 않는 경로입니다.
            .ok_or_else(|| {
                AppError::Internal("analysis table lost its default entry".to_string())
            })?,
        None => return Err(AppError::UnknownTopic(topic.to_string())),
    };
    let text = bundles.get(level);

    // 원본 서버의 동적 요약 블록: 계산된 통계 네 줄과 전반 상태 한 줄을
    // 표의 요약 줄 앞에 붙입니다.
    let mut summary = vec![
        format!("주제: {}", topic),
        format!("위험도 수준: {}", level.as_str()),
        format!("응답 수: {}개", answers.len()),
        format!("위험 단어 감지: {}개", detected.len()),
        format!(
            "전반적으로 {} 상태입니다.",
            if score <= 30 { "양호" } else { "주의" }
        ),
    ];
    summary.extend(text.summary.iter().cloned());

    // 추천 목록은 점수와 무관한 단순 키-값 조회입니다. 없으면 빈 배열.
    let supplements = tables.affiliate.get(topic).cloned().unwrap_or_default();

    Ok(DiagnosisBundle {
        topic: topic.to_string(),
        risk_score: score,
        level,
        detail: text.detail.join("\n"),
        summary,
        expert: text.expert.clone(),
        risk_words: detected,
        supplements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// 테스트용 진단표: default + 혈압 관리, 혈압 관리에만 추천 목록.
    fn sample_tables() -> Tables {
        let tier = |label: &str| {
            serde_json::json!({
                "detail": [format!("{label} 상세 1"), format!("{label} 상세 2")],
                "summary": [format!("{label} 권고")],
                "expert": [format!("{label} 소견")]
            })
        };
        let topic = serde_json::json!({
            "mild": tier("경미"), "moderate": tier("중간"), "severe": tier("심각")
        });
        let analysis = serde_json::from_value(serde_json::json!({
            "default": topic.clone(), "혈압 관리": topic
        }))
        .unwrap();
        let affiliate = serde_json::from_value(serde_json::json!({
            "혈압 관리": [ { "name": "오메가3", "url": "https://example.com/omega3" } ]
        }))
        .unwrap();
        Tables {
            analysis,
            affiliate,
            survey: HashMap::new(),
        }
    }

    fn default_opts() -> ScoringOptions {
        ScoringOptions {
            score_per_hit: 10,
            topic_fallback: true,
        }
    }

    #[test]
    fn no_risk_words_scores_zero_and_mild() {
        let tables = sample_tables();
        let bundle = analyze(
            &tables,
            default_opts(),
            "혈압 관리",
            &owned(&["오늘은 괜찮았어요", "잘 잤어요"]),
        )
        .unwrap();
        assert_eq!(bundle.risk_score, 0);
        assert_eq!(bundle.level, SeverityTier::Mild);
        assert!(bundle.risk_words.is_empty());
    }

    #[test]
    fn empty_answers_is_a_valid_mild_diagnosis() {
        let tables = sample_tables();
        let bundle = analyze(&tables, default_opts(), "혈압 관리", &[]).unwrap();
        assert_eq!(bundle.risk_score, 0);
        assert_eq!(bundle.level, SeverityTier::Mild);
        assert!(!bundle.detail.is_empty());
        assert!(!bundle.summary.is_empty());
    }

    #[test]
    fn hits_count_once_per_answer_word_pair() {
        // 한 응답 안의 반복은 1회, 서로 다른 단어는 각각 1회.
        assert_eq!(detect_risk_words(&owned(&["통증 통증 통증"])).len(), 1);
        assert_eq!(detect_risk_words(&owned(&["통증이 심함"])).len(), 2);
        // 같은 단어라도 응답이 다르면 각각 셉니다.
        assert_eq!(detect_risk_words(&owned(&["통증", "통증"])).len(), 2);
    }

    #[test]
    fn score_saturates_at_one_hundred() {
        let answers: Vec<String> = (0..50).map(|i| format!("{i}번째 통증")).collect();
        let tables = sample_tables();
        let bundle = analyze(&tables, default_opts(), "혈압 관리", &answers).unwrap();
        assert_eq!(bundle.risk_score, 100);
        assert_eq!(bundle.level, SeverityTier::Severe);
    }

    #[test]
    fn tier_is_monotonic_in_hit_count() {
        let tables = sample_tables();
        let mut previous = SeverityTier::Mild;
        for hits in 0..15 {
            let answers: Vec<String> = (0..hits).map(|i| format!("{i}번째 통증")).collect();
            let bundle = analyze(&tables, default_opts(), "혈압 관리", &answers).unwrap();
            assert!(bundle.level >= previous, "tier dropped at {hits} hits");
            previous = bundle.level;
        }
    }

    #[test]
    fn threshold_walkthrough_with_small_lexicon() {
        // 영어 2단어 사전으로 경계값을 직접 확인합니다. K=10.
        let lexicon = ["pain", "severe"];

        // 감지 0회 → 0점 → Mild
        let hits = detect_with_lexicon(&owned(&["mild discomfort"]), &lexicon).len();
        assert_eq!(hits, 0);
        assert_eq!(SeverityTier::for_score(risk_score(hits, 10)), SeverityTier::Mild);

        // 응답 2개 × 단어 2개 감지 → 4회 → 40점 → Moderate
        let hits = detect_with_lexicon(&owned(&["severe pain", "severe pain"]), &lexicon).len();
        assert_eq!(hits, 4);
        assert_eq!(risk_score(hits, 10), 40);
        assert_eq!(SeverityTier::for_score(40), SeverityTier::Moderate);

        // 1회짜리 응답 7개 → 70점 → Severe
        let answers = owned(&["pain"; 7]);
        let hits = detect_with_lexicon(&answers, &lexicon).len();
        assert_eq!(hits, 7);
        assert_eq!(risk_score(hits, 10), 70);
        assert_eq!(SeverityTier::for_score(70), SeverityTier::Severe);
    }

    #[test]
    fn identical_input_yields_identical_bundle() {
        let tables = sample_tables();
        let answers = owned(&["가슴이 답답하고 숨이 참"]);
        let first = analyze(&tables, default_opts(), "혈압 관리", &answers).unwrap();
        let second = analyze(&tables, default_opts(), "혈압 관리", &answers).unwrap();
        // 숨은 난수가 없어야 하므로 직렬화 결과까지 동일해야 합니다.
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn unknown_topic_falls_back_to_default_bundle() {
        let tables = sample_tables();
        let bundle = analyze(
            &tables,
            default_opts(),
            "존재하지 않는 주제",
            &owned(&["통증"]),
        )
        .unwrap();
        // 요청한 주제 이름은 유지하되, 진단문은 기본표에서 가져옵니다.
        assert_eq!(bundle.topic, "존재하지 않는 주제");
        assert_eq!(bundle.level, SeverityTier::Mild);
        assert!(bundle.detail.contains("경미"));
        assert!(bundle.supplements.is_empty());
    }

    #[test]
    fn unknown_topic_errors_when_fallback_disabled() {
        let tables = sample_tables();
        let opts = ScoringOptions {
            score_per_hit: 10,
            topic_fallback: false,
        };
        let result = analyze(&tables, opts, "존재하지 않는 주제", &owned(&["통증"]));
        assert!(matches!(result, Err(AppError::UnknownTopic(_))));
    }

    #[test]
    fn supplements_are_attached_by_topic_lookup() {
        let tables = sample_tables();
        let bundle = analyze(&tables, default_opts(), "혈압 관리", &[]).unwrap();
        assert_eq!(bundle.supplements.len(), 1);
        assert_eq!(bundle.supplements[0].name, "오메가3");
    }

    #[test]
    fn summary_includes_computed_stat_lines() {
        let tables = sample_tables();
        let answers = owned(&["통증이 심함", "갑자기 악화"]);
        let bundle = analyze(&tables, default_opts(), "혈압 관리", &answers).unwrap();
        assert_eq!(bundle.summary[0], "주제: 혈압 관리");
        assert_eq!(bundle.summary[1], "위험도 수준: Moderate");
        assert_eq!(bundle.summary[2], "응답 수: 2개");
        assert_eq!(bundle.summary[3], "위험 단어 감지: 4개");
        assert_eq!(bundle.summary[4], "전반적으로 주의 상태입니다.");
        // 그 뒤로 표의 권고 줄이 이어집니다.
        assert!(bundle.summary[5..].iter().any(|line| line.contains("권고")));
    }
}
