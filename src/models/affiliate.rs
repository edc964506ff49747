use serde::{Deserialize, Serialize};

/// affiliate.json의 항목 하나: 주제에 연결된 추천 영양제/제휴 상품
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateItem {
    pub name: String,
    pub url: String,
    /// 가격·용량 등 부가 설명 (없으면 JSON에서 생략 가능)
    pub note: Option<String>,
}
