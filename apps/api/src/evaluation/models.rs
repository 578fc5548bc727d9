use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

/// Advisory attached when leftover template text was found in the résumé.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateWarning {
    pub title: String,
    pub detail: String,
    pub found_patterns: Vec<String>,
}

/// Final ATS result returned to the client. `ats_score` is always 0–100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsEvaluation {
    pub ats_score: u8,
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_warning: Option<TemplateWarning>,
}
