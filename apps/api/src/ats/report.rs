use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Success,
    Warning,
    Error,
}

/// One finding inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsItem {
    pub label: String,
    pub status: ItemStatus,
    pub issues: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub score: u32, // 0 – 100
    pub items: Vec<AtsItem>,
}

/// The three fixed report categories, serialized under their display keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsCategories {
    #[serde(rename = "CONTENT")]
    pub content: CategoryReport,
    #[serde(rename = "SECTIONS")]
    pub sections: CategoryReport,
    #[serde(rename = "ATS ESSENTIALS")]
    pub ats_essentials: CategoryReport,
}

/// ATS-style resume assessment. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsReport {
    pub overall_score: u32, // 0 – 100
    pub issues_count: u32,
    pub categories: AtsCategories,
}

impl AtsCategories {
    pub fn iter(&self) -> impl Iterator<Item = &CategoryReport> {
        [&self.content, &self.sections, &self.ats_essentials].into_iter()
    }
}

impl AtsReport {
    /// Builds a report from its categories, deriving the overall score and
    /// the issue count.
    pub fn from_categories(categories: AtsCategories) -> Self {
        let total: u32 = categories.iter().map(|c| c.score).sum();
        let overall_score = (total as f64 / 3.0).round() as u32;
        let issues_count = count_issues(&categories);

        Self {
            overall_score,
            issues_count,
            categories,
        }
    }
}

/// Items whose status is anything other than success.
pub fn count_issues(categories: &AtsCategories) -> u32 {
    categories
        .iter()
        .flat_map(|c| c.items.iter())
        .filter(|item| item.status != ItemStatus::Success)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(score: u32, statuses: &[ItemStatus]) -> CategoryReport {
        CategoryReport {
            score,
            items: statuses
                .iter()
                .map(|&status| AtsItem {
                    label: "item".to_string(),
                    status,
                    issues: 0,
                    description: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_overall_score_is_rounded_mean() {
        let report = AtsReport::from_categories(AtsCategories {
            content: category(50, &[]),
            sections: category(75, &[]),
            ats_essentials: category(80, &[]),
        });
        // 205 / 3 = 68.33
        assert_eq!(report.overall_score, 68);
    }

    #[test]
    fn test_overall_score_rounds_half_up() {
        let report = AtsReport::from_categories(AtsCategories {
            content: category(1, &[]),
            sections: category(0, &[]),
            ats_essentials: category(0, &[]),
        });
        assert_eq!(report.overall_score, 0);

        let report = AtsReport::from_categories(AtsCategories {
            content: category(2, &[]),
            sections: category(0, &[]),
            ats_essentials: category(0, &[]),
        });
        assert_eq!(report.overall_score, 1);
    }

    #[test]
    fn test_issues_count_ignores_successes() {
        let report = AtsReport::from_categories(AtsCategories {
            content: category(0, &[ItemStatus::Success, ItemStatus::Warning]),
            sections: category(0, &[ItemStatus::Error]),
            ats_essentials: category(0, &[ItemStatus::Success]),
        });
        assert_eq!(report.issues_count, 2);
    }

    #[test]
    fn test_report_serializes_with_display_keys() {
        let report = AtsReport::from_categories(AtsCategories {
            content: category(10, &[ItemStatus::Warning]),
            sections: category(20, &[]),
            ats_essentials: category(30, &[]),
        });
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["overallScore"], 20);
        assert_eq!(json["issuesCount"], 1);
        assert_eq!(json["categories"]["ATS ESSENTIALS"]["score"], 30);
        assert_eq!(json["categories"]["CONTENT"]["items"][0]["status"], "warning");
    }
}
