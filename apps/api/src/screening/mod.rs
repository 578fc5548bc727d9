// Input screening: the cheap, deterministic gates that run before any LLM call.
// Every check here is a pure function over request data plus the shared Vocabulary.

pub mod extraction;
pub mod gibberish;
pub mod job_role;
pub mod sanity;
pub mod template;
pub mod vocabulary;

/// Splits text into runs of ASCII letters, keeping runs of two or more.
pub(crate) fn alpha_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| t.len() >= 2)
        .collect()
}
