//! # Norma Compliance
//!
//! The compliance engine behind document analysis.
//!
//! - [`jurisdiction`]: Parsing and display of region codes such as `us-ca`
//! - [`laws`]: The static jurisdiction-to-law mapping table
//! - [`analyzer`]: Mocked, jurisdiction-aware compliance analysis
//! - [`report`]: Plain-text compliance report rendering
//!
//! # Example
//!
//! ```ignore
//! use norma_compliance::{AnalysisInput, ComplianceAnalyzer, Jurisdiction};
//!
//! let jurisdiction = Jurisdiction::parse("us-ca")?;
//! let input = AnalysisInput::new(42, "pdf", &jurisdiction);
//! let report = ComplianceAnalyzer::default().analyze(&input, &mut rand::thread_rng());
//!
//! assert_eq!(report.issues_count, report.issues.len());
//! ```

pub mod analyzer;
pub mod jurisdiction;
pub mod laws;
pub mod report;

pub use analyzer::{
    AnalysisInput, CategoryResult, ComplianceAnalyzer, ComplianceIssue, ComplianceReport,
    ComplianceStatus, LawReference, Severity,
};
pub use jurisdiction::{Jurisdiction, JurisdictionError, MAX_JURISDICTION_LEN, display_code};
pub use laws::{
    ApplicableLaws, ComplianceCategory, Law, SupportedJurisdiction, laws_for,
    supported_jurisdictions,
};
pub use report::{ReportContext, render_report, report_file_name};
