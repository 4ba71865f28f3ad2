//! ATS scorer backends. Pluggable and trait-based.
//!
//! Default: `HeuristicAtsScorer` (local, deterministic).
//! With `APILAYER_KEY` set: `RemoteAtsScorer`, which augments the local
//! report with skills parsed by the remote resume parser. The remote call is
//! best-effort: any failure yields the plain local report.
//!
//! `AppState` holds an `Arc<dyn AtsScorer>`, chosen at startup from config.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::ats::heuristics::analyze;
use crate::ats::report::{AtsItem, AtsReport, ItemStatus};

pub const APILAYER_RESUME_PARSER_URL: &str = "https://api.apilayer.com/resume_parser/text";

#[async_trait]
pub trait AtsScorer: Send + Sync {
    /// Scores resume text. `None` means no analysis is available.
    async fn score(&self, text: &str) -> Option<AtsReport>;

    /// "heuristic" | "apilayer", for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicAtsScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct HeuristicAtsScorer;

#[async_trait]
impl AtsScorer for HeuristicAtsScorer {
    async fn score(&self, text: &str) -> Option<AtsReport> {
        analyze(text)
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteAtsScorer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RemoteAtsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {0})")]
    Status(u16),
}

#[derive(Debug, Default, Deserialize)]
struct ParsedResume {
    #[serde(default)]
    skills: Vec<String>,
}

pub struct RemoteAtsScorer {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl RemoteAtsScorer {
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_endpoint(client, api_key, APILAYER_RESUME_PARSER_URL.to_string())
    }

    pub fn with_endpoint(client: Client, api_key: String, endpoint: String) -> Self {
        Self {
            client,
            api_key,
            endpoint,
        }
    }

    async fn fetch_skills(&self, text: &str) -> Result<Vec<String>, RemoteAtsError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .header("content-type", "text/plain")
            .body(text.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteAtsError::Status(status.as_u16()));
        }

        let parsed: ParsedResume = response.json().await?;
        Ok(parsed.skills)
    }
}

#[async_trait]
impl AtsScorer for RemoteAtsScorer {
    async fn score(&self, text: &str) -> Option<AtsReport> {
        let mut report = analyze(text)?;

        match self.fetch_skills(text).await {
            Ok(skills) => {
                debug!("Resume parser returned {} skills", skills.len());
                augment_with_skills(&mut report, &skills);
            }
            Err(e) => warn!("Resume parser unavailable, using local heuristic only: {e}"),
        }

        Some(report)
    }

    fn backend(&self) -> &'static str {
        "apilayer"
    }
}

/// Adds a "Skills Detected" finding to SECTIONS. Scores and the issue count
/// are untouched: the item is always a success and only added when skills
/// were found.
fn augment_with_skills(report: &mut AtsReport, skills: &[String]) {
    let skills: Vec<&str> = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if skills.is_empty() {
        return;
    }

    report.categories.sections.items.push(AtsItem {
        label: "Skills Detected".to_string(),
        status: ItemStatus::Success,
        issues: 0,
        description: format!("Parsed {} skills: {}.", skills.len(), skills.join(", ")),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Summary\nEngineer. jane@example.com +1 555 123 4567\nSkills: Rust";

    #[tokio::test]
    async fn test_heuristic_scorer_matches_analyze() {
        let scorer = HeuristicAtsScorer;
        assert_eq!(scorer.score(RESUME).await, analyze(RESUME));
        assert!(scorer.score("").await.is_none());
        assert_eq!(scorer.backend(), "heuristic");
    }

    #[tokio::test]
    async fn test_remote_scorer_falls_back_when_unreachable() {
        // Port 9 (discard) is closed on loopback: connection refused
        let scorer = RemoteAtsScorer::with_endpoint(
            Client::new(),
            "test-key".to_string(),
            "http://127.0.0.1:9/resume_parser/text".to_string(),
        );

        let report = scorer.score(RESUME).await;
        assert_eq!(report, analyze(RESUME));
    }

    #[tokio::test]
    async fn test_remote_scorer_empty_text_skips_network() {
        let scorer = RemoteAtsScorer::with_endpoint(
            Client::new(),
            "test-key".to_string(),
            "http://127.0.0.1:9/".to_string(),
        );
        assert!(scorer.score("  ").await.is_none());
    }

    #[test]
    fn test_augment_adds_success_item_without_changing_scores() {
        let mut report = analyze(RESUME).unwrap();
        let before = report.clone();

        augment_with_skills(&mut report, &["Rust".to_string(), " SQL ".to_string()]);

        assert_eq!(report.overall_score, before.overall_score);
        assert_eq!(report.issues_count, before.issues_count);
        assert_eq!(
            report.categories.sections.items.len(),
            before.categories.sections.items.len() + 1
        );
        let added = report.categories.sections.items.last().unwrap();
        assert_eq!(added.status, ItemStatus::Success);
        assert!(added.description.contains("Rust, SQL"));
    }

    #[test]
    fn test_augment_ignores_empty_skill_list() {
        let mut report = analyze(RESUME).unwrap();
        let before = report.clone();
        augment_with_skills(&mut report, &["  ".to_string()]);
        assert_eq!(report, before);
    }

    // ── Resume parser round trips against a local mock server ────────────

    fn scorer_for(server: &mockito::ServerGuard) -> RemoteAtsScorer {
        RemoteAtsScorer::with_endpoint(
            Client::new(),
            "test-key".to_string(),
            format!("{}/resume_parser/text", server.url()),
        )
    }

    #[tokio::test]
    async fn test_remote_scorer_adds_parsed_skills() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/resume_parser/text")
            .match_header("apikey", "test-key")
            .match_header("content-type", "text/plain")
            .match_body(RESUME)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "Jane", "skills": ["Rust", "PostgreSQL"]}"#)
            .create_async()
            .await;

        let report = scorer_for(&server).score(RESUME).await.unwrap();
        let local = analyze(RESUME).unwrap();

        mock.assert_async().await;
        assert_eq!(report.overall_score, local.overall_score);
        assert_eq!(report.issues_count, local.issues_count);
        let added = report.categories.sections.items.last().unwrap();
        assert_eq!(added.label, "Skills Detected");
        assert!(added.description.contains("Rust, PostgreSQL"));
    }

    #[tokio::test]
    async fn test_remote_scorer_falls_back_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/resume_parser/text")
            .with_status(429)
            .with_body(r#"{"message": "rate limited"}"#)
            .create_async()
            .await;

        assert_eq!(scorer_for(&server).score(RESUME).await, analyze(RESUME));
    }

    #[tokio::test]
    async fn test_remote_scorer_falls_back_on_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/resume_parser/text")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        assert_eq!(scorer_for(&server).score(RESUME).await, analyze(RESUME));
    }
}
