//! Prompt Assembler: builds the mode-specific system prompt.
//!
//! Document modes get the uploaded text interpolated, narrowed by the
//! retriever when it is long and there is a question to rank against.
//! Resume review additionally embeds the heuristic ATS report as a baseline
//! for the model to refine. Whether the model answers with that report or
//! with free text is left to the model by the template; nothing here
//! enforces it.

use std::borrow::Cow;

use crate::ats::heuristics::analyze;
use crate::ats::report::AtsReport;
use crate::chatbot::prompts::{
    MENTAL_SUPPORT_PROMPT, NO_BASELINE_PLACEHOLDER, NO_DOCUMENT_PLACEHOLDER, PDF_QA_PROMPT,
    RESUME_BUILDER_PROMPT, RESUME_OPTIMIZE_PROMPT, RESUME_REVIEW_PROMPT, STUDENT_HELPER_PROMPT,
    STUDYBUDDY_AI_PROMPT,
};
use crate::chatbot::retriever::{retrieve, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CHUNKS};
use crate::models::chat::Mode;

/// Documents longer than this (in chars) are narrowed by the retriever when
/// the user asked something.
pub const RETRIEVAL_THRESHOLD: usize = 2000;

/// Builds the system prompt, scoring the raw document locally for resume review.
pub fn build_system_prompt(mode: Mode, context: &str, user_message: &str) -> String {
    let baseline = match mode {
        Mode::ResumeReview => analyze(context),
        _ => None,
    };
    build_system_prompt_with_baseline(mode, context, user_message, baseline.as_ref())
}

/// Same as [`build_system_prompt`] with a precomputed ATS baseline, e.g. from
/// a remote-augmented scorer. `baseline` is ignored outside resume review.
pub fn build_system_prompt_with_baseline(
    mode: Mode,
    context: &str,
    user_message: &str,
    baseline: Option<&AtsReport>,
) -> String {
    let template = template_for(mode);
    if !mode.uses_document() {
        return template.to_string();
    }

    let mut prompt = template.to_string();

    // Baseline first: the document must not be scanned for placeholders.
    if mode == Mode::ResumeReview {
        prompt = prompt.replace("{ats_baseline}", &render_baseline(baseline));
    }

    let document = select_context(context, user_message);
    let document = if document.trim().is_empty() {
        NO_DOCUMENT_PLACEHOLDER
    } else {
        document.as_ref()
    };

    prompt.replace("{document}", document)
}

/// The fixed template for each mode.
pub fn template_for(mode: Mode) -> &'static str {
    match mode {
        Mode::MentalSupport => MENTAL_SUPPORT_PROMPT,
        Mode::ResumeBuilder => RESUME_BUILDER_PROMPT,
        Mode::ResumeReview => RESUME_REVIEW_PROMPT,
        Mode::PdfQa => PDF_QA_PROMPT,
        Mode::ResumeOptimize => RESUME_OPTIMIZE_PROMPT,
        Mode::StudentHelper => STUDENT_HELPER_PROMPT,
        Mode::StudyBuddyAi => STUDYBUDDY_AI_PROMPT,
    }
}

/// The document text to embed: retrieved excerpts for long documents with a
/// question, otherwise the raw text.
pub fn select_context<'a>(context: &'a str, user_message: &str) -> Cow<'a, str> {
    if context.chars().count() > RETRIEVAL_THRESHOLD && !user_message.trim().is_empty() {
        Cow::Owned(retrieve(
            context,
            user_message,
            DEFAULT_MAX_CHUNKS,
            DEFAULT_CHUNK_SIZE,
        ))
    } else {
        Cow::Borrowed(context)
    }
}

fn render_baseline(baseline: Option<&AtsReport>) -> String {
    baseline
        .and_then(|report| serde_json::to_string_pretty(report).ok())
        .unwrap_or_else(|| NO_BASELINE_PLACEHOLDER.to_string())
}
