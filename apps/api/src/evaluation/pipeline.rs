//! ATS Evaluation — orchestrates screening, generation and recovery.
//!
//! Flow: required inputs → validate_job_role → file type → extract_document →
//!       check_resume_sanity → detect_template_artifacts → LLM generate →
//!       recover_evaluation → merge template advisory → AtsEvaluation.
//!
//! Every step is a hard gate. Nothing here retries; a failed generation call
//! surfaces immediately and retry policy belongs to the caller.

use tracing::{info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::errors::EvaluationError;
use crate::evaluation::models::{AtsEvaluation, Suggestion, TemplateWarning};
use crate::evaluation::prompts::build_ats_prompt;
use crate::evaluation::recovery::recover_evaluation;
use crate::llm_client::TextGenerator;
use crate::screening::extraction::{
    extract_document, ExtractedDocument, ExtractionError, PagedDocument,
};
use crate::screening::job_role::validate_job_role;
use crate::screening::sanity::{check_resume_sanity, SanityReason};
use crate::screening::template::{detect_template_artifacts, TemplateDetection};
use crate::screening::vocabulary::Vocabulary;

/// The only accepted upload extension (compared case-insensitively).
pub const ACCEPTED_EXTENSION: &str = ".pdf";

pub const TEMPLATE_ADVISORY_TITLE: &str = "Hidden template text detected";

/// An uploaded document together with the name the client gave it.
pub struct Upload<D> {
    pub file_name: String,
    pub document: D,
}

/// One evaluation run. Holds only borrowed, read-only collaborators.
pub struct EvaluationPipeline<'a> {
    generator: &'a dyn TextGenerator,
    vocabulary: &'a Vocabulary,
    request_id: Uuid,
}

impl<'a> EvaluationPipeline<'a> {
    pub fn new(generator: &'a dyn TextGenerator, vocabulary: &'a Vocabulary) -> Self {
        Self {
            generator,
            vocabulary,
            request_id: Uuid::new_v4(),
        }
    }

    /// Full flow for an uploaded résumé document.
    pub async fn evaluate_document<D>(
        &self,
        job_role: Option<&str>,
        upload: Option<Upload<D>>,
    ) -> Result<AtsEvaluation, EvaluationError>
    where
        D: PagedDocument + Send + 'static,
    {
        self.document_flow(job_role, upload)
            .instrument(self.span())
            .await
    }

    /// Flow for résumé text the client already extracted.
    pub async fn evaluate_text(
        &self,
        job_role: Option<&str>,
        resume_text: Option<&str>,
    ) -> Result<AtsEvaluation, EvaluationError> {
        self.text_flow(job_role, resume_text)
            .instrument(self.span())
            .await
    }

    fn span(&self) -> Span {
        info_span!("ats_evaluation", request_id = %self.request_id)
    }

    async fn document_flow<D>(
        &self,
        job_role: Option<&str>,
        upload: Option<Upload<D>>,
    ) -> Result<AtsEvaluation, EvaluationError>
    where
        D: PagedDocument + Send + 'static,
    {
        // Step 1: both inputs present
        let (job_role, upload) = match (non_empty(job_role), upload) {
            (Some(role), Some(upload)) => (role, upload),
            _ => return Err(EvaluationError::MissingInput),
        };

        // Step 2: job role
        let job_role = self.check_job_role(job_role)?;

        // Step 3: file type
        let Upload {
            file_name,
            document,
        } = upload;
        if !has_accepted_extension(&file_name) {
            return Err(EvaluationError::UnsupportedFileType { file_name });
        }

        // Step 4: extraction (consumes and releases the document) + sanity
        let extracted = extract_off_runtime(document).await.map_err(|e| {
            warn!("Extraction failed for '{file_name}': {e}");
            EvaluationError::UnextractableDocument {
                detail: Some(e.to_string()),
            }
        })?;
        info!("Extracted {} chars from '{file_name}'", extracted.char_count);

        self.score(job_role, &extracted).await
    }

    async fn text_flow(
        &self,
        job_role: Option<&str>,
        resume_text: Option<&str>,
    ) -> Result<AtsEvaluation, EvaluationError> {
        let (job_role, resume_text) = match (non_empty(job_role), non_empty(resume_text)) {
            (Some(role), Some(text)) => (role, text),
            _ => return Err(EvaluationError::MissingInput),
        };

        let job_role = self.check_job_role(job_role)?;
        let extracted = ExtractedDocument::from_text(resume_text);
        self.score(job_role, &extracted).await
    }

    fn check_job_role<'r>(&self, job_role: &'r str) -> Result<&'r str, EvaluationError> {
        let validation = validate_job_role(job_role, self.vocabulary);
        if !validation.accepted {
            info!("Job role rejected: {}", validation.reason.code());
            return Err(EvaluationError::InvalidJobRole {
                reason: validation.reason,
                message: validation.message,
            });
        }
        Ok(job_role.trim())
    }

    /// Steps 4 (sanity) through 9, shared by both entry points.
    async fn score(
        &self,
        job_role: &str,
        extracted: &ExtractedDocument,
    ) -> Result<AtsEvaluation, EvaluationError> {
        let sanity = check_resume_sanity(extracted, self.vocabulary);
        match sanity.reason {
            SanityReason::Passed => {}
            SanityReason::NoExtractableText => {
                return Err(EvaluationError::UnextractableDocument { detail: None })
            }
            SanityReason::TooShort => {
                return Err(EvaluationError::DocumentTooShort {
                    char_count: extracted.char_count,
                    min_chars: self.vocabulary.min_resume_chars,
                })
            }
            SanityReason::NotResumeLike => return Err(EvaluationError::NotResumeLike),
        }

        // Step 5: advisory only
        let detection = detect_template_artifacts(&extracted.raw_text, self.vocabulary);
        if detection.detected {
            info!("Template artifacts found: {:?}", detection.matched_patterns);
        }

        // Step 6: external generation
        let prompt = build_ats_prompt(job_role, &extracted.raw_text);
        let raw = self.generator.generate(&prompt).await.map_err(|e| {
            EvaluationError::UpstreamGenerationFailure(e.to_string())
        })?;

        // Step 7: recovery
        let mut evaluation = recover_evaluation(&raw)?;

        // Step 8: merge advisory
        merge_template_advisory(&mut evaluation, detection);

        info!(
            "ATS score {}/100 for role '{}' ({} suggestions)",
            evaluation.ats_score,
            job_role,
            evaluation.suggestions.len()
        );

        Ok(evaluation)
    }
}

/// Prepends the template advisory unless the model already gave one with
/// the same title, and attaches the warning record.
fn merge_template_advisory(evaluation: &mut AtsEvaluation, detection: TemplateDetection) {
    if !detection.detected {
        return;
    }

    let detail = format!(
        "Your resume contains leftover template text ({}). ATS systems read this text and it \
         can lower your score. Remove it before applying.",
        detection.matched_patterns.join(", ")
    );

    let already_present = evaluation
        .suggestions
        .iter()
        .any(|s| s.title.eq_ignore_ascii_case(TEMPLATE_ADVISORY_TITLE));
    if !already_present {
        evaluation.suggestions.insert(
            0,
            Suggestion {
                title: TEMPLATE_ADVISORY_TITLE.to_string(),
                detail: detail.clone(),
            },
        );
    }

    evaluation.template_warning = Some(TemplateWarning {
        title: TEMPLATE_ADVISORY_TITLE.to_string(),
        detail,
        found_patterns: detection.matched_patterns,
    });
}

/// Parses the document on the blocking pool. A parser panic on a malformed
/// file comes back as an extraction error instead of unwinding the request.
async fn extract_off_runtime<D>(document: D) -> Result<ExtractedDocument, ExtractionError>
where
    D: PagedDocument + Send + 'static,
{
    let span = Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(|| extract_document(document)))
        .await
        .map_err(|e| ExtractionError::Crashed(e.to_string()))?
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn has_accepted_extension(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(ACCEPTED_EXTENSION)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::LlmError;
    use crate::screening::extraction::tests::TextPages;
    use crate::screening::job_role::RoleReason;

    /// Fake generator returning a canned completion and recording prompts.
    pub(crate) struct FakeGenerator {
        pub(crate) reply: Result<String, String>,
        pub(crate) calls: AtomicUsize,
        pub(crate) last_prompt: Mutex<Option<String>>,
    }

    impl FakeGenerator {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply.clone().map_err(|message| LlmError::Api {
                status: 503,
                message,
            })
        }
    }

    pub(crate) const AI_REPLY: &str = r#"Here you go:
{"ats_score": 78, "suggestions": [{"title": "Add metrics", "detail": "Quantify outcomes."}]}"#;

    /// A ~500 character résumé mentioning Experience and no template phrases.
    pub(crate) fn resume_text() -> String {
        let mut text = String::from(
            "Jane Doe\nBackend Developer\n\nExperience\nAcme Corp, 2021-2024: built REST APIs in \
             Rust and Go serving internal billing workloads; migrated batch jobs to a queue-based \
             design; owned on-call for the payments service.\n\nSkills\nRust, Go, PostgreSQL, \
             Docker, Kubernetes.\n",
        );
        while text.chars().count() < 500 {
            text.push_str("Maintained CI pipelines and reviewed code. ");
        }
        text
    }

    fn upload(text: &str) -> Option<Upload<TextPages>> {
        Some(Upload {
            file_name: "resume.pdf".to_string(),
            document: TextPages::single(text),
        })
    }

    #[tokio::test]
    async fn test_clean_resume_has_no_template_warning() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);

        let eval = pipeline
            .evaluate_document(Some("Backend Developer"), upload(&resume_text()))
            .await
            .unwrap();

        assert_eq!(eval.ats_score, 78);
        assert_eq!(eval.suggestions[0].title, "Add metrics");
        assert!(eval.template_warning.is_none());

        let json = serde_json::to_value(&eval).unwrap();
        assert!(json.get("template_warning").is_none());
    }

    #[tokio::test]
    async fn test_lorem_ipsum_adds_advisory_first() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);
        let text = format!("{}\nLorem ipsum dolor sit amet.", resume_text());

        let eval = pipeline
            .evaluate_document(Some("Backend Developer"), upload(&text))
            .await
            .unwrap();

        assert_eq!(eval.suggestions.len(), 2);
        assert!(eval.suggestions[0].title.to_lowercase().contains("template"));
        assert!(eval.suggestions[0].title.to_lowercase().contains("hidden"));
        let warning = eval.template_warning.unwrap();
        assert_eq!(warning.found_patterns, vec!["lorem ipsum".to_string()]);
    }

    #[tokio::test]
    async fn test_advisory_not_duplicated_when_model_mentions_it() {
        let reply = r#"{"ats_score": 40, "suggestions": [
            {"title": "HIDDEN TEMPLATE TEXT DETECTED", "detail": "Remove lorem ipsum."}
        ]}"#;
        let generator = FakeGenerator::replying(reply);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);
        let text = format!("{}\nLorem ipsum.", resume_text());

        let eval = pipeline
            .evaluate_document(Some("Backend Developer"), upload(&text))
            .await
            .unwrap();

        assert_eq!(eval.suggestions.len(), 1);
        assert_eq!(eval.suggestions[0].detail, "Remove lorem ipsum.");
        assert!(eval.template_warning.is_some());
    }

    #[tokio::test]
    async fn test_missing_inputs() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);

        let err = pipeline
            .evaluate_document(None, upload(&resume_text()))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::MissingInput));

        let err = pipeline
            .evaluate_document::<TextPages>(Some("Backend Developer"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::MissingInput));

        let err = pipeline
            .evaluate_text(Some(""), Some("text"))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::MissingInput));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_role_stops_before_file_checks() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);
        let upload = Some(Upload {
            file_name: "resume.docx".to_string(),
            document: TextPages::single(&resume_text()),
        });

        let err = pipeline
            .evaluate_document(Some("asdf"), upload)
            .await
            .unwrap_err();
        match err {
            EvaluationError::InvalidJobRole { reason, .. } => {
                assert_eq!(reason, RoleReason::Blacklisted)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_pdf_is_unsupported() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);
        let upload = Some(Upload {
            file_name: "resume.docx".to_string(),
            document: TextPages::single(&resume_text()),
        });

        let err = pipeline
            .evaluate_document(Some("Backend Developer"), upload)
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::UnsupportedFileType { .. }));
    }

    #[tokio::test]
    async fn test_uppercase_extension_is_accepted() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);
        let upload = Some(Upload {
            file_name: "CV.PDF".to_string(),
            document: TextPages::single(&resume_text()),
        });

        assert!(pipeline
            .evaluate_document(Some("Backend Developer"), upload)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_image_only_document_is_unextractable() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);
        let upload = Some(Upload {
            file_name: "scan.pdf".to_string(),
            document: TextPages(vec![None, None]),
        });

        let err = pipeline
            .evaluate_document(Some("Backend Developer"), upload)
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::UnextractableDocument { .. }));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    struct ExplodingDocument;

    impl PagedDocument for ExplodingDocument {
        fn page_texts(&self) -> Result<Vec<Option<String>>, ExtractionError> {
            panic!("unexpected encoding \"BogusEncoding\"")
        }
    }

    #[tokio::test]
    async fn test_parser_panic_is_unextractable() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);
        let upload = Some(Upload {
            file_name: "cv.pdf".to_string(),
            document: ExplodingDocument,
        });

        let err = pipeline
            .evaluate_document(Some("Backend Developer"), upload)
            .await
            .unwrap_err();
        match err {
            EvaluationError::UnextractableDocument { detail } => {
                assert!(detail.unwrap().contains("aborted"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_and_non_resume_text() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);

        let err = pipeline
            .evaluate_document(Some("Backend Developer"), upload("Experience: none"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::DocumentTooShort {
                char_count: 16,
                min_chars: 300
            }
        ));

        let recipe = "Banana bread. Mix flour, sugar and ripe bananas. ".repeat(10);
        let err = pipeline
            .evaluate_document(Some("Backend Developer"), upload(&recipe))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::NotResumeLike));
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces_without_retry() {
        let generator = FakeGenerator::failing("model overloaded");
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);

        let err = pipeline
            .evaluate_document(Some("Backend Developer"), upload(&resume_text()))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::UpstreamGenerationFailure(_)));
        assert!(!err.is_input_error());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_an_error_not_a_score() {
        let generator = FakeGenerator::replying("I'd rate this resume highly!");
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);

        let err = pipeline
            .evaluate_document(Some("Backend Developer"), upload(&resume_text()))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::UnparseableGenerationResponse(_)));
    }

    #[tokio::test]
    async fn test_prompt_carries_trimmed_role_and_text() {
        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);

        let text = resume_text();
        pipeline
            .evaluate_text(Some("  Data Analyst "), Some(text.as_str()))
            .await
            .unwrap();

        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("\"Data Analyst\""));
        assert!(prompt.contains("Acme Corp"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_logs_carry_request_id_span() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let generator = FakeGenerator::replying(AI_REPLY);
        let vocabulary = Vocabulary::default();
        let pipeline = EvaluationPipeline::new(&generator, &vocabulary);
        let text = resume_text();
        pipeline
            .evaluate_text(Some("Backend Developer"), Some(text.as_str()))
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let span = format!("ats_evaluation{{request_id={}}}", pipeline.request_id);
        let score_line = output
            .lines()
            .find(|line| line.contains("ATS score 78/100"))
            .unwrap();
        assert!(score_line.contains(&span), "{output}");
    }

    #[test]
    fn test_extension_check() {
        assert!(has_accepted_extension("resume.pdf"));
        assert!(has_accepted_extension("Resume.Pdf"));
        assert!(!has_accepted_extension("resume.pdf.exe"));
        assert!(!has_accepted_extension("pdf"));
    }
}
