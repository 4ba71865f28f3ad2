//! Rule-based resume scorer producing an [`AtsReport`].
//!
//! Three independent categories, averaged without weights:
//! - CONTENT: quantified impact, action verbs, buzzwords, readability
//! - SECTIONS: presence of the four essential resume sections
//! - ATS ESSENTIALS: email, phone and LinkedIn contact details
//!
//! Pure and deterministic. Never fails on non-empty text.

use std::sync::LazyLock;

use regex::Regex;

use crate::ats::report::{AtsCategories, AtsItem, AtsReport, CategoryReport, ItemStatus};

const ACTION_VERBS: &[&str] = &[
    "developed",
    "managed",
    "led",
    "implemented",
    "created",
    "designed",
    "optimized",
    "reduced",
    "increased",
    "achieved",
    "spearheaded",
    "orchestrated",
    "streamlined",
    "automated",
    "built",
    "delivered",
    "generated",
    "initiated",
    "launched",
    "mentored",
];

const BUZZWORDS: &[&str] = &[
    "team player",
    "hard worker",
    "detail-oriented",
    "passionate",
    "motivated",
    "think outside the box",
    "synergy",
    "results-driven",
    "dynamic",
    "go-getter",
];

/// (display name, keywords); any keyword present marks the section found.
const ESSENTIAL_SECTIONS: &[(&str, &[&str])] = &[
    ("Summary", &["summary", "profile", "objective"]),
    ("Experience", &["experience", "work history", "employment"]),
    ("Education", &["education", "academic"]),
    ("Skills", &["skills", "technologies", "expertise"]),
];

const SECTION_POINTS: u32 = 25;
const EMAIL_POINTS: u32 = 40;
const PHONE_POINTS: u32 = 40;
const LINKEDIN_POINTS: u32 = 20;

static METRIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+%|\$\d+|\d+\s?%").expect("metric pattern is valid"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s-]{8,}").expect("phone pattern is valid"));
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"));
static VOWEL_CLUSTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[aeiouy]+").expect("vowel pattern is valid"));

/// Scores resume text. Returns `None` for empty input: "no analysis
/// available", not an error.
pub fn analyze(text: &str) -> Option<AtsReport> {
    if text.trim().is_empty() {
        return None;
    }

    let lower = text.to_lowercase();

    Some(AtsReport::from_categories(AtsCategories {
        content: score_content(text, &lower),
        sections: score_sections(&lower),
        ats_essentials: score_essentials(text, &lower),
    }))
}

fn score_content(text: &str, lower: &str) -> CategoryReport {
    let mut items = Vec::with_capacity(4);
    let mut score = 0.0_f64;

    // Quantified impact
    let metric_count = METRIC.find_iter(text).count() as u32;
    let quantified = metric_count > 2;
    items.push(AtsItem {
        label: "Quantifying Impact".to_string(),
        status: if quantified {
            ItemStatus::Success
        } else {
            ItemStatus::Error
        },
        issues: u32::from(!quantified),
        description: if quantified {
            format!(
                "Great job! We found {metric_count} metrics. Numbers make your achievements concrete."
            )
        } else {
            "Recruiters look for results. Use more numbers and percentages to show your impact."
                .to_string()
        },
    });
    score += f64::from((metric_count * 10).min(30));

    // Action verbs
    let verb_count = count_present(lower, ACTION_VERBS);
    let strong_verbs = verb_count > 5;
    items.push(AtsItem {
        label: "Action Verbs".to_string(),
        status: if strong_verbs {
            ItemStatus::Success
        } else {
            ItemStatus::Error
        },
        issues: u32::from(!strong_verbs),
        description: format!(
            "You used {verb_count} strong action verbs. {}",
            if strong_verbs {
                "Strong choice of words!"
            } else {
                "Try adding words like \"Spearheaded\" or \"Automated\"."
            }
        ),
    });
    score += f64::from((verb_count * 5).min(25));

    // Buzzwords: a heavy hand is a warning, not an error
    let buzz_count = count_present(lower, BUZZWORDS);
    let low_buzz = buzz_count < 3;
    items.push(AtsItem {
        label: "Buzzword Check".to_string(),
        status: if low_buzz {
            ItemStatus::Success
        } else {
            ItemStatus::Warning
        },
        issues: buzz_count,
        description: if low_buzz {
            "Low usage of buzzwords! Your resume feels authentic.".to_string()
        } else {
            format!(
                "We found {buzz_count} buzzwords. Replace generic terms like \"team player\" with specific actions."
            )
        },
    });
    score += f64::from(20u32.saturating_sub(buzz_count * 5));

    // Readability
    let readability = reading_ease(text);
    let readable = readability > 50.0;
    items.push(AtsItem {
        label: "Readability Score".to_string(),
        status: if readable {
            ItemStatus::Success
        } else {
            ItemStatus::Error
        },
        issues: u32::from(!readable),
        description: format!(
            "Your readability score is {readability:.0}/100. {}",
            if readable {
                "Your resume is easy to read."
            } else {
                "Try shorter sentences to improve clarity."
            }
        ),
    });
    score += (readability / 4.0).min(25.0);

    CategoryReport {
        score: score.round() as u32,
        items,
    }
}

fn score_sections(lower: &str) -> CategoryReport {
    let mut items = Vec::with_capacity(ESSENTIAL_SECTIONS.len());
    let mut score = 0u32;

    for (name, keywords) in ESSENTIAL_SECTIONS {
        let found = keywords.iter().any(|k| lower.contains(k));
        if found {
            score += SECTION_POINTS;
        }
        items.push(AtsItem {
            label: format!("{name} Section"),
            status: if found {
                ItemStatus::Success
            } else {
                ItemStatus::Error
            },
            issues: u32::from(!found),
            description: if found {
                format!("Found your {name} section.")
            } else {
                format!("Critical: Could not find a clear {name} section.")
            },
        });
    }

    CategoryReport { score, items }
}

fn score_essentials(text: &str, lower: &str) -> CategoryReport {
    let has_email = lower.contains('@');
    let has_phone = PHONE.is_match(text);
    let has_linkedin = lower.contains("linkedin.com/in");

    let yes_no = |present: bool| if present { "Yes" } else { "No" };

    let items = vec![
        AtsItem {
            label: "Contact Info".to_string(),
            status: if has_email && has_phone {
                ItemStatus::Success
            } else {
                ItemStatus::Error
            },
            issues: u32::from(!has_email) + u32::from(!has_phone),
            description: format!(
                "Found email: {}, Phone: {}.",
                yes_no(has_email),
                yes_no(has_phone)
            ),
        },
        AtsItem {
            label: "LinkedIn Profile".to_string(),
            status: if has_linkedin {
                ItemStatus::Success
            } else {
                ItemStatus::Warning
            },
            issues: u32::from(!has_linkedin),
            description: if has_linkedin {
                "LinkedIn profile found.".to_string()
            } else {
                "Adding a LinkedIn profile is highly recommended.".to_string()
            },
        },
    ];

    let score = if has_email { EMAIL_POINTS } else { 0 }
        + if has_phone { PHONE_POINTS } else { 0 }
        + if has_linkedin { LINKEDIN_POINTS } else { 0 };

    CategoryReport { score, items }
}

/// Number of lexicon entries present anywhere in `lower`.
fn count_present(lower: &str, lexicon: &[&str]) -> u32 {
    lexicon.iter().filter(|term| lower.contains(*term)).count() as u32
}

/// Simplified Flesch Reading Ease, clipped to [0, 100]. Syllables are
/// approximated by vowel clusters.
pub fn reading_ease(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    let sentences = SENTENCE_BREAK.split(text).count();
    let syllables = VOWEL_CLUSTER.find_iter(text).count();

    if words == 0 || sentences == 0 {
        return 0.0;
    }

    let words = words as f64;
    let score =
        206.835 - 1.015 * (words / sentences as f64) - 84.6 * (syllables as f64 / words);
    score.clamp(0.0, 100.0)
}
