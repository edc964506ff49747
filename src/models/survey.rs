use serde::{Deserialize, Serialize};

/// survey.json의 항목 하나: 주제별 설문지
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub title: String,
    pub questions: Vec<SurveyQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub question: String,
    pub options: Vec<String>,
}
