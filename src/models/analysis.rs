//! # 분석 요청/진단 결과 모델
//!
//! `POST /analyze`의 요청·응답 구조체와, analysis.json을 파싱하는
//! 진단표 구조체를 정의합니다.
//!
//! 요청 본문은 원본 프런트엔드의 느슨한 JSON을 그대로 받기 때문에
//! 타입이 맞는지(topic이 문자열인지, answers가 문자열 배열인지)를
//! 경계(boundary)에서 직접 검증합니다. 검증을 통과한 뒤에는
//! 애플리케이션 내부 어디에서도 null/타입 불일치를 걱정하지 않습니다.

use crate::error::AppError;
use crate::models::AffiliateItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 위험도 3단계 등급. 점수에서 결정적으로(monotonic) 도출됩니다.
///
/// derive 설명:
/// - PartialOrd/Ord: variant 선언 순서(Mild < Moderate < Severe)로
///   비교 가능하게 합니다. "등급이 점수에 단조"라는 성질을 테스트할 때 씁니다.
/// - Serialize: JSON으로는 원본 서버와 같은 "Mild"/"Moderate"/"Severe"
///   문자열로 나갑니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityTier {
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    /// 위험 점수(0~100)를 등급으로 변환합니다.
    ///
    /// 기준(모든 배포 변형에서 공통으로 쓰이는 계약):
    /// - 70점 이상 → Severe
    /// - 40점 이상 70점 미만 → Moderate
    /// - 40점 미만 → Mild
    pub fn for_score(score: u32) -> Self {
        if score >= 70 {
            SeverityTier::Severe
        } else if score >= 40 {
            SeverityTier::Moderate
        } else {
            SeverityTier::Mild
        }
    }

    /// 응답 요약문에 넣을 등급 문자열 ("Mild" 등)
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Mild => "Mild",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::Severe => "Severe",
        }
    }
}

/// `POST /analyze` 요청 본문 (검증 완료 상태)
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub topic: String,
    pub answers: Vec<String>,
}

impl AnalyzeRequest {
    /// 느슨한 JSON 값에서 요청을 검증·추출합니다.
    ///
    /// 검증 규칙:
    /// - `topic`: 필수. 비어 있지 않은 문자열이어야 합니다.
    /// - `answers`: 선택. 있다면 문자열 배열이어야 합니다. 없거나 null이면
    ///   빈 목록으로 취급합니다 (응답이 하나도 없어도 분석은 실패하지 않음).
    ///
    /// 규칙에 어긋나면 `AppError::InvalidInput`을 반환하여
    /// 400 invalid_input 응답으로 변환됩니다.
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        // .get(): JSON 객체에서 키를 찾습니다. 객체가 아니면 None입니다.
        // .and_then(Value::as_str): 값이 문자열일 때만 &str로 꺼냅니다.
        let topic = body
            .get("topic")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::InvalidInput("'topic' must be a non-empty string".to_string())
            })?;

        let answers = match body.get("answers") {
            // 필드 자체가 없거나 null → 빈 응답 목록
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => {
                // 배열의 모든 원소가 문자열인지 확인하며 수집합니다.
                // collect::<Result<...>>: 원소 하나라도 Err이면 전체가 Err이 됩니다.
                items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            AppError::InvalidInput(
                                "'answers' must contain only strings".to_string(),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            // 배열도 null도 아닌 값(문자열, 숫자, 객체 등) → 거부
            Some(_) => {
                return Err(AppError::InvalidInput(
                    "'answers' must be an array of strings".to_string(),
                ))
            }
        };

        Ok(Self {
            topic: topic.to_string(),
            answers,
        })
    }
}

/// analysis.json의 등급별 진단문 한 벌
///
/// JSON에서는 줄 단위 배열로 저장하고, 응답 시 detail만 한 문자열로 합칩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleText {
    pub detail: Vec<String>,
    pub summary: Vec<String>,
    pub expert: Vec<String>,
}

/// analysis.json의 주제 하나: 세 등급 각각의 진단문
#[derive(Debug, Clone, Deserialize)]
pub struct TierBundles {
    pub mild: BundleText,
    pub moderate: BundleText,
    pub severe: BundleText,
}

impl TierBundles {
    pub fn get(&self, tier: SeverityTier) -> &BundleText {
        match tier {
            SeverityTier::Mild => &self.mild,
            SeverityTier::Moderate => &self.moderate,
            SeverityTier::Severe => &self.severe,
        }
    }
}

/// `POST /analyze` 응답의 `result` 객체
///
/// 요청마다 새로 만들어지며 어디에도 저장되지 않습니다.
/// serde(rename_all = "camelCase"): Rust의 snake_case 필드를
/// 프런트엔드가 기대하는 camelCase(riskScore, riskWords)로 직렬화합니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisBundle {
    pub topic: String,
    /// 0~100으로 포화(saturation)된 위험 점수
    pub risk_score: u32,
    pub level: SeverityTier,
    /// 여러 줄의 상세 진단문을 "\n"으로 합친 문자열
    pub detail: String,
    pub summary: Vec<String>,
    pub expert: Vec<String>,
    /// 감지된 위험 단어 목록. (응답, 단어) 쌍마다 최대 1회씩, 스캔 순서대로.
    pub risk_words: Vec<String>,
    /// 주제에 연결된 추천 목록 (affiliate.json 단순 조회; 없으면 빈 배열)
    pub supplements: Vec<AffiliateItem>,
}
