//! Plain-text compliance report.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::analyzer::ComplianceReport;

const RULE_WIDTH: usize = 72;

/// Everything the renderer needs besides the analysis itself.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub title: &'a str,
    pub file_name: &'a str,
    pub document_date: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub report: &'a ComplianceReport,
}

pub fn render_report(ctx: &ReportContext<'_>) -> String {
    ctx.to_string()
}

/// `compliance_report_<id>_<YYYYmmddHHMMSS>.txt`
pub fn report_file_name(document_id: i64, at: DateTime<Utc>) -> String {
    format!(
        "compliance_report_{}_{}.txt",
        document_id,
        at.format("%Y%m%d%H%M%S")
    )
}

fn heading(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{text}")?;
    writeln!(f, "{}", "-".repeat(text.chars().count()))
}

impl fmt::Display for ReportContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "Norma AI Compliance Report")?;
        writeln!(f, "Document: {}", self.title)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f)?;
        writeln!(f, "Generated Date:  {}", self.generated_at.format("%Y-%m-%d %H:%M"))?;
        writeln!(f, "Document Date:   {}", self.document_date.format("%Y-%m-%d %H:%M"))?;
        writeln!(f, "File:            {}", self.file_name)?;
        writeln!(f, "Jurisdiction:    {}", report.jurisdiction_display)?;

        heading(f, "Compliance Summary")?;
        if report.is_compliant() {
            writeln!(
                f,
                "✓ Compliant with Legal Requirements - No compliance issues were found in this document."
            )?;
        } else {
            let noun = if report.issues_count == 1 {
                "issue"
            } else {
                "issues"
            };
            writeln!(
                f,
                "✗ Non-Compliant with Legal Requirements - The document has {} compliance {} that need to be addressed.",
                report.issues_count, noun
            )?;
        }

        if !report.applicable_laws.is_empty() {
            heading(f, "Applicable Laws and Regulations")?;
            for law in &report.applicable_laws {
                writeln!(f, "  * {} - {}", law.name, law.description)?;
            }
        }

        if !report.issues.is_empty() {
            heading(f, &format!("Compliance Issues ({})", report.issues_count))?;
            for (idx, issue) in report.issues.iter().enumerate() {
                if idx > 0 {
                    writeln!(f)?;
                }
                writeln!(f, "Issue {}: {}", idx + 1, issue.issue_type)?;
                writeln!(f, "  Severity: {}", issue.severity.as_str())?;
                writeln!(f, "  Description: {} (page {})", issue.description, issue.page)?;
                if let Some(context) = &issue.context {
                    writeln!(f, "  Context: \"{context}\"")?;
                }
                writeln!(f, "  Recommendation: {}", issue.recommendations)?;
            }
        }

        if !report.categories.is_empty() {
            heading(f, "Compliance by Category")?;
            let width = report
                .categories
                .iter()
                .map(|c| c.label.chars().count())
                .chain(std::iter::once("Category".len()))
                .max()
                .unwrap_or(0);

            writeln!(f, "{:<width$}  {:<16}  Issues", "Category", "Status")?;
            writeln!(f, "{:-<width$}  {:-<16}  {:-<6}", "", "", "")?;
            for category in &report.categories {
                let status = if category.compliant {
                    "✓ Compliant"
                } else {
                    "✗ Non-Compliant"
                };
                writeln!(
                    f,
                    "{:<width$}  {:<16}  {}",
                    category.label, status, category.issues_count
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            f,
            "This report was automatically generated by Norma AI. The analysis is based on the document content"
        )?;
        writeln!(
            f,
            "and the selected jurisdiction's legal requirements as of {}.",
            self.generated_at.format("%Y-%m-%d")
        )?;
        writeln!(f, "© {} Norma AI. All rights reserved.", self.generated_at.format("%Y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{
        CategoryResult, ComplianceIssue, ComplianceStatus, LawReference, Severity,
    };
    use crate::laws::ComplianceCategory;
    use chrono::TimeZone;

    fn base_report() -> ComplianceReport {
        ComplianceReport {
            document_id: 12,
            jurisdiction: "us-ca".into(),
            resolved_jurisdiction: "us-ca".into(),
            jurisdiction_display: "US-CA".into(),
            compliance_status: ComplianceStatus::Compliant,
            issues_count: 0,
            issues: vec![],
            applicable_laws: vec![LawReference {
                name: "California Consumer Privacy Act (CCPA)".into(),
                description: "Consumer privacy rights".into(),
                category: ComplianceCategory::DataProtection,
            }],
            categories: vec![CategoryResult {
                category: ComplianceCategory::DataProtection,
                label: "Data Protection".into(),
                compliant: true,
                issues_count: 0,
            }],
            summary: "Document analysis complete. Found 0 potential compliance issues.".into(),
            analyzed_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    fn with_issues(mut report: ComplianceReport, count: usize) -> ComplianceReport {
        report.issues = (0..count)
            .map(|i| ComplianceIssue {
                issue_type: "Data Privacy Concern".into(),
                law: "California Consumer Privacy Act (CCPA)".into(),
                category: ComplianceCategory::DataProtection,
                description: "Potential compliance issue with California Consumer Privacy Act (CCPA)"
                    .into(),
                severity: Severity::High,
                page: (i + 1) as u32,
                context: (i == 0).then(|| "We may sell your data".to_string()),
                recommendations: "Review the consent clauses".into(),
            })
            .collect();
        report.issues_count = count;
        report.compliance_status = ComplianceStatus::NonCompliant;
        report.categories[0].compliant = false;
        report.categories[0].issues_count = count;
        report
    }

    fn render(report: &ComplianceReport) -> String {
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 14, 5, 0).unwrap();
        render_report(&ReportContext {
            title: "Master Services Agreement",
            file_name: "msa.pdf",
            document_date: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            generated_at: at,
            report,
        })
    }

    #[test]
    fn compliant_report_has_summary_and_no_issue_section() {
        let text = render(&base_report());

        assert!(text.contains("Norma AI Compliance Report"));
        assert!(text.contains("Document: Master Services Agreement"));
        assert!(text.contains("Jurisdiction:    US-CA"));
        assert!(text.contains("Generated Date:  2024-03-02 14:05"));
        assert!(text.contains(
            "✓ Compliant with Legal Requirements - No compliance issues were found in this document."
        ));
        assert!(text.contains("Applicable Laws and Regulations"));
        assert!(!text.contains("Compliance Issues ("));
        assert!(text.contains("Norma AI. All rights reserved."));
    }

    #[test]
    fn single_issue_uses_singular_noun() {
        let text = render(&with_issues(base_report(), 1));
        assert!(text.contains("The document has 1 compliance issue that need to be addressed."));
        assert!(text.contains("Compliance Issues (1)"));
        assert!(text.contains("Issue 1: Data Privacy Concern"));
        assert!(text.contains("  Severity: high"));
        assert!(text.contains("  Context: \"We may sell your data\""));
    }

    #[test]
    fn multiple_issues_listed_in_order() {
        let text = render(&with_issues(base_report(), 3));
        assert!(text.contains("The document has 3 compliance issues"));
        let first = text.find("Issue 1:").unwrap();
        let third = text.find("Issue 3:").unwrap();
        assert!(first < third);
        assert_eq!(text.matches("  Context:").count(), 1);
    }

    #[test]
    fn category_table_is_aligned() {
        let text = render(&with_issues(base_report(), 2));
        let header = text.lines().find(|l| l.starts_with("Category")).unwrap();
        let row = text.lines().find(|l| l.starts_with("Data Protection")).unwrap();

        assert_eq!(header.find("Status"), row.find('✗'));
        assert!(row.ends_with("  2"));
    }

    #[test]
    fn file_name_uses_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 14, 5, 9).unwrap();
        assert_eq!(
            report_file_name(12, at),
            "compliance_report_12_20240302140509.txt"
        );
    }
}
