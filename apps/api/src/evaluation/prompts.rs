use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Builds the ATS evaluation prompt. Both values are substituted in one pass,
/// so placeholder-like text inside the role or résumé stays literal.
pub fn build_ats_prompt(job_role: &str, resume_text: &str) -> String {
    format!(
        r#"You are an ATS resume evaluator.

Analyze the resume against the job role: "{job_role}"

Return STRICT JSON ONLY in this format:
{{
  "ats_score": number (0-100),
  "suggestions": [
    {{
      "title": "Short improvement title",
      "detail": "Clear actionable improvement suggestion"
    }}
  ]
}}

{json_only}

Resume:
{resume_text}
"#,
        json_only = JSON_ONLY_INSTRUCTION,
    )
}
