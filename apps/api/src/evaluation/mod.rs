// ATS evaluation: merges the screening gates with the LLM scoring call.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod recovery;
