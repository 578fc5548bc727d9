//! Recovers an `AtsEvaluation` from raw model output.
//!
//! The model is told to return bare JSON but often wraps it in prose or code
//! fences. Recovery tries the whole text first, then the greedy region from
//! the first `{` to the last `}`. Anything else is an explicit error; no
//! default score is ever substituted.

use serde::Deserialize;
use tracing::debug;

use crate::errors::EvaluationError;
use crate::evaluation::models::{AtsEvaluation, Suggestion};

const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    ats_score: f64,
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

pub fn recover_evaluation(raw: &str) -> Result<AtsEvaluation, EvaluationError> {
    let text = raw.trim();

    let parsed = match serde_json::from_str::<RawEvaluation>(text) {
        Ok(parsed) => parsed,
        Err(direct_err) => {
            debug!("Direct parse of AI response failed: {direct_err}");
            let region = outer_brace_region(text).ok_or_else(|| {
                EvaluationError::UnparseableGenerationResponse(
                    "no JSON object found in response".to_string(),
                )
            })?;
            serde_json::from_str::<RawEvaluation>(region).map_err(|e| {
                EvaluationError::UnparseableGenerationResponse(format!(
                    "embedded JSON is invalid: {e}"
                ))
            })?
        }
    };

    Ok(AtsEvaluation {
        ats_score: validate_score(parsed.ats_score)?,
        suggestions: parsed.suggestions,
        template_warning: None,
    })
}

/// Greedy outer-brace match: first `{` through last `}`.
fn outer_brace_region(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn validate_score(score: f64) -> Result<u8, EvaluationError> {
    if !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
        return Err(EvaluationError::UnparseableGenerationResponse(format!(
            "ats_score {score} is outside 0-100"
        )));
    }
    Ok(score.round() as u8)
}
