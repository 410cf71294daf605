//! Mocked compliance analysis.
//!
//! Findings are drawn at random from the laws that apply to the document's
//! jurisdiction. The analyzer takes any [`rand::Rng`] so callers control
//! determinism.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::jurisdiction::Jurisdiction;
use crate::laws::{ComplianceCategory, laws_for};

const CONTEXT_MAX_CHARS: usize = 160;
const MAX_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non-compliant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComplianceIssue {
    pub issue_type: String,
    pub law: String,
    pub category: ComplianceCategory,
    pub description: String,
    pub severity: Severity,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub recommendations: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LawReference {
    pub name: String,
    pub description: String,
    pub category: ComplianceCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResult {
    pub category: ComplianceCategory,
    pub label: String,
    pub compliant: bool,
    pub issues_count: usize,
}

/// Result of analysing one document, stored alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComplianceReport {
    pub document_id: i64,
    pub jurisdiction: String,
    pub resolved_jurisdiction: String,
    pub jurisdiction_display: String,
    pub compliance_status: ComplianceStatus,
    pub issues_count: usize,
    pub issues: Vec<ComplianceIssue>,
    pub applicable_laws: Vec<LawReference>,
    pub categories: Vec<CategoryResult>,
    pub summary: String,
    pub analyzed_at: DateTime<Utc>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        self.compliance_status == ComplianceStatus::Compliant
    }
}

/// What the analyzer needs to know about a document.
#[derive(Debug, Clone)]
pub struct AnalysisInput<'a> {
    pub document_id: i64,
    pub file_type: &'a str,
    pub jurisdiction: &'a Jurisdiction,
    /// Extracted plain text, when available.
    pub text: Option<&'a str>,
}

impl<'a> AnalysisInput<'a> {
    pub fn new(document_id: i64, file_type: &'a str, jurisdiction: &'a Jurisdiction) -> Self {
        Self {
            document_id,
            file_type,
            jurisdiction,
            text: None,
        }
    }

    pub fn with_text(mut self, text: &'a str) -> Self {
        self.text = Some(text);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ComplianceAnalyzer {
    max_issues: usize,
}

impl Default for ComplianceAnalyzer {
    fn default() -> Self {
        Self { max_issues: 5 }
    }
}

impl ComplianceAnalyzer {
    pub fn new(max_issues: usize) -> Self {
        Self { max_issues }
    }

    pub fn analyze<R: Rng + ?Sized>(&self, input: &AnalysisInput<'_>, rng: &mut R) -> ComplianceReport {
        let applicable = laws_for(input.jurisdiction);
        let lines: Vec<&str> = input
            .text
            .map(|t| t.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
            .unwrap_or_default();

        let num_issues = if applicable.laws.is_empty() {
            0
        } else {
            rng.gen_range(0..=self.max_issues)
        };

        let mut issues = Vec::with_capacity(num_issues);
        for _ in 0..num_issues {
            let Some(law) = applicable.laws.choose(rng) else {
                break;
            };
            let severity = *Severity::ALL.choose(rng).unwrap_or(&Severity::Medium);
            let page = rng.gen_range(1..=MAX_PAGE);
            let context = lines.choose(rng).map(|line| snippet(line));

            issues.push(ComplianceIssue {
                issue_type: law.category.issue_type().to_string(),
                law: law.name.to_string(),
                category: law.category,
                description: format!("Potential compliance issue with {}", law.name),
                severity,
                page,
                context,
                recommendations: law.category.recommendation(law.name),
            });
        }

        let mut by_category: BTreeMap<ComplianceCategory, usize> = applicable
            .laws
            .iter()
            .map(|law| (law.category, 0))
            .collect();
        for issue in &issues {
            *by_category.entry(issue.category).or_default() += 1;
        }

        let categories = by_category
            .into_iter()
            .map(|(category, issues_count)| CategoryResult {
                category,
                label: category.label().to_string(),
                compliant: issues_count == 0,
                issues_count,
            })
            .collect();

        let applicable_laws = applicable
            .laws
            .iter()
            .map(|law| LawReference {
                name: law.name.to_string(),
                description: law.description.to_string(),
                category: law.category,
            })
            .collect();

        let issues_count = issues.len();
        let compliance_status = if issues_count == 0 {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::NonCompliant
        };

        ComplianceReport {
            document_id: input.document_id,
            jurisdiction: input.jurisdiction.as_str().to_string(),
            resolved_jurisdiction: applicable.resolved.to_string(),
            jurisdiction_display: input.jurisdiction.display(),
            compliance_status,
            issues_count,
            issues,
            applicable_laws,
            categories,
            summary: format!(
                "Document analysis complete. Found {issues_count} potential compliance issues."
            ),
            analyzed_at: Utc::now(),
        }
    }
}

const ELLIPSIS: &str = "...";

/// `line` cut to [`CONTEXT_MAX_CHARS`] characters, ellipsis included.
fn snippet(line: &str) -> String {
    if line.chars().count() <= CONTEXT_MAX_CHARS {
        return line.to_string();
    }
    let mut cut: String = line
        .chars()
        .take(CONTEXT_MAX_CHARS - ELLIPSIS.len())
        .collect();
    cut.push_str(ELLIPSIS);
    cut
}
