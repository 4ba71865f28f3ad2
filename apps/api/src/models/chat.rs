use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a conversation. Sequences are chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat behaviour selector. Decides the system prompt template and whether
/// an uploaded document is retrieved over or scored.
///
/// Deserializes through [`Mode::from_tag`], so an unknown tag never fails a
/// request: it becomes `StudentHelper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Mode {
    MentalSupport,
    ResumeBuilder,
    ResumeReview,
    PdfQa,
    ResumeOptimize,
    #[default]
    StudentHelper,
    StudyBuddyAi,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::MentalSupport,
        Mode::ResumeBuilder,
        Mode::ResumeReview,
        Mode::PdfQa,
        Mode::ResumeOptimize,
        Mode::StudentHelper,
        Mode::StudyBuddyAi,
    ];

    /// Resolves a wire tag. Unknown or empty tags fall back to `StudentHelper`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "mental-support" => Mode::MentalSupport,
            "resume-builder" => Mode::ResumeBuilder,
            "resume-review" => Mode::ResumeReview,
            "pdf-qa" => Mode::PdfQa,
            "resume-optimize" => Mode::ResumeOptimize,
            "studybuddy-ai" => Mode::StudyBuddyAi,
            _ => Mode::StudentHelper,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Mode::MentalSupport => "mental-support",
            Mode::ResumeBuilder => "resume-builder",
            Mode::ResumeReview => "resume-review",
            Mode::PdfQa => "pdf-qa",
            Mode::ResumeOptimize => "resume-optimize",
            Mode::StudentHelper => "student-helper",
            Mode::StudyBuddyAi => "studybuddy-ai",
        }
    }

    /// Modes whose template embeds the uploaded document.
    pub fn uses_document(self) -> bool {
        match self {
            Mode::PdfQa | Mode::ResumeReview | Mode::ResumeBuilder | Mode::ResumeOptimize => true,
            Mode::MentalSupport | Mode::StudentHelper | Mode::StudyBuddyAi => false,
        }
    }
}

impl From<String> for Mode {
    fn from(tag: String) -> Self {
        Mode::from_tag(&tag)
    }
}

impl From<Mode> for &'static str {
    fn from(mode: Mode) -> Self {
        mode.as_tag()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
