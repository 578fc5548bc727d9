//! Job-role plausibility check.
//!
//! Rules run in a fixed order and the first match decides. The blacklist and
//! whitelist run before the length heuristics so a known-good short token
//! ("qa") is never penalised for its length and a junk token is never
//! rescued by the words around it.

use serde::{Deserialize, Serialize};

use crate::screening::alpha_tokens;
use crate::screening::gibberish::is_gibberish;
use crate::screening::vocabulary::Vocabulary;

/// Tokens shorter than this never count as meaningful.
const MEANINGFUL_TOKEN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleReason {
    Whitelisted,
    CompoundRole,
    DescriptiveWord,
    Empty,
    NoLetters,
    NoTokens,
    Blacklisted,
    Gibberish,
    Vague,
}

impl RoleReason {
    pub fn code(&self) -> &'static str {
        match self {
            RoleReason::Whitelisted => "whitelisted",
            RoleReason::CompoundRole => "compound-role",
            RoleReason::DescriptiveWord => "descriptive-word",
            RoleReason::Empty => "empty",
            RoleReason::NoLetters => "no-letters",
            RoleReason::NoTokens => "no-tokens",
            RoleReason::Blacklisted => "blacklisted",
            RoleReason::Gibberish => "gibberish",
            RoleReason::Vague => "vague",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRoleValidation {
    pub accepted: bool,
    pub reason: RoleReason,
    pub message: String,
}

impl JobRoleValidation {
    fn accept(reason: RoleReason) -> Self {
        Self {
            accepted: true,
            reason,
            message: "Job role accepted".to_string(),
        }
    }

    fn reject(reason: RoleReason, message: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason,
            message: message.into(),
        }
    }
}

pub fn validate_job_role(role: &str, vocabulary: &Vocabulary) -> JobRoleValidation {
    let trimmed = role.trim();
    if trimmed.is_empty() {
        return JobRoleValidation::reject(RoleReason::Empty, "Job role is required.");
    }

    if !trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        return JobRoleValidation::reject(
            RoleReason::NoLetters,
            "Job role must contain letters, not only numbers or symbols.",
        );
    }

    let tokens: Vec<String> = alpha_tokens(trimmed)
        .into_iter()
        .map(|t| t.to_ascii_lowercase())
        .collect();
    if tokens.is_empty() {
        return JobRoleValidation::reject(
            RoleReason::NoTokens,
            "Job role must contain at least one real word.",
        );
    }

    if let Some(junk) = tokens.iter().find(|t| vocabulary.is_blacklisted(t)) {
        return JobRoleValidation::reject(
            RoleReason::Blacklisted,
            format!("'{junk}' does not look like a job role. Enter a real role title."),
        );
    }

    if tokens.iter().any(|t| vocabulary.is_whitelisted(t)) {
        return JobRoleValidation::accept(RoleReason::Whitelisted);
    }

    let meaningful: Vec<&String> = tokens
        .iter()
        .filter(|t| t.len() >= MEANINGFUL_TOKEN_LEN && !vocabulary.is_stop_word(t))
        .collect();

    match meaningful.as_slice() {
        [_, _, ..] => return JobRoleValidation::accept(RoleReason::CompoundRole),
        [only] if only.len() >= vocabulary.single_word_min_len => {
            return JobRoleValidation::accept(RoleReason::DescriptiveWord)
        }
        _ => {}
    }

    if is_gibberish(role) {
        return JobRoleValidation::reject(
            RoleReason::Gibberish,
            "Job role looks like random characters. Enter a real role title.",
        );
    }

    JobRoleValidation::reject(
        RoleReason::Vague,
        "Job role is too vague. Try a specific two-word role like \"Frontend Developer\".",
    )
}
