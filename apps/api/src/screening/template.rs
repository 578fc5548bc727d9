//! Template-artifact detection — finds placeholder text left over from a design
//! template (e.g. "Lorem ipsum"). Advisory only; never rejects a request.

use serde::Serialize;

use crate::screening::vocabulary::Vocabulary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDetection {
    pub detected: bool,
    /// Matched patterns in vocabulary order, each at most once.
    pub matched_patterns: Vec<String>,
}

pub fn detect_template_artifacts(text: &str, vocabulary: &Vocabulary) -> TemplateDetection {
    let lowered = text.to_lowercase();
    let matched_patterns: Vec<String> = vocabulary
        .template_patterns
        .iter()
        .filter(|pattern| lowered.contains(pattern.as_str()))
        .cloned()
        .collect();

    TemplateDetection {
        detected: !matched_patterns.is_empty(),
        matched_patterns,
    }
}
