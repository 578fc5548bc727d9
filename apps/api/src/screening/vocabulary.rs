//! Fixed word lists used by the screening checks.
//!
//! Every list has a built-in default. A JSON file (see `ATS_VOCABULARY_PATH`)
//! may override any subset of fields; omitted fields keep their defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tokens that mark a job role as junk input, checked before the whitelist.
const ROLE_BLACKLIST: &[&str] = &[
    "asd", "asdf", "asdfg", "qwe", "qwer", "qwerty", "zxc", "zxcv", "xyz", "abc", "abcd", "lorem",
    "ipsum", "testtest", "dummy", "foobar", "blah", "hjkl",
];

/// Job-domain vocabulary. A single hit accepts the role outright.
const ROLE_WHITELIST: &[&str] = &[
    // role nouns
    "developer",
    "engineer",
    "manager",
    "analyst",
    "designer",
    "architect",
    "consultant",
    "administrator",
    "admin",
    "scientist",
    "intern",
    "lead",
    "specialist",
    "tester",
    "programmer",
    "researcher",
    "technician",
    "coordinator",
    "executive",
    "officer",
    "accountant",
    "teacher",
    "writer",
    "editor",
    "marketer",
    "recruiter",
    "director",
    "associate",
    "assistant",
    "sre",
    "qa",
    "hr",
    // domain qualifiers
    "software",
    "frontend",
    "backend",
    "fullstack",
    "full",
    "stack",
    "web",
    "devops",
    "cloud",
    "mobile",
    "data",
    "security",
    "network",
    "product",
    "project",
    "marketing",
    "sales",
    "finance",
    "business",
    "embedded",
    "systems",
    "database",
    "ui",
    "ux",
    // technology names and acronyms
    "react",
    "angular",
    "vue",
    "node",
    "nodejs",
    "java",
    "python",
    "javascript",
    "typescript",
    "golang",
    "rust",
    "php",
    "ruby",
    "dotnet",
    "android",
    "ios",
    "flutter",
    "aws",
    "azure",
    "gcp",
    "ml",
    "ai",
    "sql",
];

const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "in", "of"];

/// Lower-case keywords whose presence suggests the text is a résumé.
const RESUME_SIGNALS: &[&str] = &[
    "education",
    "experience",
    "skills",
    "project",
    "internship",
    "university",
    "bachelor",
    "contact",
    "cv",
];

/// Leftover design-template phrases, in scan order.
const TEMPLATE_PATTERNS: &[&str] = &[
    "lorem ipsum",
    "untitled design",
    "placeholder",
    "click to edit",
    "your text here",
    "insert your",
    "dummy text",
    "replace this",
];

/// Minimum length of a lone meaningful token for a single-word role.
pub const DEFAULT_SINGLE_WORD_MIN_LEN: usize = 5;

/// Minimum trimmed character count for extracted résumé text.
pub const DEFAULT_MIN_RESUME_CHARS: usize = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vocabulary {
    pub role_blacklist: Vec<String>,
    pub role_whitelist: Vec<String>,
    pub stop_words: Vec<String>,
    pub resume_signals: Vec<String>,
    pub template_patterns: Vec<String>,
    pub single_word_min_len: usize,
    pub min_resume_chars: usize,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            role_blacklist: owned(ROLE_BLACKLIST),
            role_whitelist: owned(ROLE_WHITELIST),
            stop_words: owned(STOP_WORDS),
            resume_signals: owned(RESUME_SIGNALS),
            template_patterns: owned(TEMPLATE_PATTERNS),
            single_word_min_len: DEFAULT_SINGLE_WORD_MIN_LEN,
            min_resume_chars: DEFAULT_MIN_RESUME_CHARS,
        }
    }
}

impl Vocabulary {
    /// Loads a vocabulary override file. Entries are lower-cased so the
    /// case-insensitive checks can compare directly.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file '{}'", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid vocabulary file '{}'", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut vocabulary: Vocabulary = serde_json::from_str(raw)?;
        vocabulary.normalize();
        Ok(vocabulary)
    }

    pub fn is_blacklisted(&self, token: &str) -> bool {
        self.role_blacklist.iter().any(|w| w == token)
    }

    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.role_whitelist.iter().any(|w| w == token)
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.iter().any(|w| w == token)
    }

    fn normalize(&mut self) {
        for list in [
            &mut self.role_blacklist,
            &mut self.role_whitelist,
            &mut self.stop_words,
            &mut self.resume_signals,
            &mut self.template_patterns,
        ] {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
            list.retain(|e| !e.is_empty());
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
