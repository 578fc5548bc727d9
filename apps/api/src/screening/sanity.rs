use serde::{Deserialize, Serialize};

use crate::screening::extraction::ExtractedDocument;
use crate::screening::vocabulary::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SanityReason {
    Passed,
    NoExtractableText,
    TooShort,
    NotResumeLike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanityOutcome {
    pub passed: bool,
    pub reason: SanityReason,
}

impl SanityOutcome {
    fn fail(reason: SanityReason) -> Self {
        Self {
            passed: false,
            reason,
        }
    }
}

/// Cheap gate deciding whether extracted text plausibly is a résumé.
///
/// Passing proves very little: non-empty, long enough, and mentions at least
/// one résumé signal word. It is not a classifier.
pub fn check_resume_sanity(document: &ExtractedDocument, vocabulary: &Vocabulary) -> SanityOutcome {
    if document.raw_text.is_empty() {
        return SanityOutcome::fail(SanityReason::NoExtractableText);
    }

    if document.char_count < vocabulary.min_resume_chars {
        return SanityOutcome::fail(SanityReason::TooShort);
    }

    let lowered = document.raw_text.to_lowercase();
    if !vocabulary
        .resume_signals
        .iter()
        .any(|keyword| lowered.contains(keyword.as_str()))
    {
        return SanityOutcome::fail(SanityReason::NotResumeLike);
    }

    SanityOutcome {
        passed: true,
        reason: SanityReason::Passed,
    }
}
