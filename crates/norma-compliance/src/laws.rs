//! Jurisdiction-to-law mapping table.
//!
//! Lookups resolve the exact code first, then its region, then the
//! `international` table. A subdivision also inherits its region's laws.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::jurisdiction::{Jurisdiction, display_code};

/// Code of the table used when nothing more specific matches.
pub const INTERNATIONAL: &str = "international";

/// Area of law a regulation belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceCategory {
    DataProtection,
    ConsumerProtection,
    Employment,
    Corporate,
    AntiMoneyLaundering,
    Contract,
    Accessibility,
}

impl ComplianceCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DataProtection => "Data Protection",
            Self::ConsumerProtection => "Consumer Protection",
            Self::Employment => "Employment",
            Self::Corporate => "Corporate Governance",
            Self::AntiMoneyLaundering => "Anti-Money Laundering",
            Self::Contract => "Contract Law",
            Self::Accessibility => "Accessibility",
        }
    }

    /// Issue type reported for findings in this category.
    pub fn issue_type(&self) -> &'static str {
        match self {
            Self::DataProtection => "Data Privacy Concern",
            Self::ConsumerProtection => "Consumer Rights Concern",
            Self::Employment => "Employment Terms Concern",
            Self::Corporate => "Corporate Governance Concern",
            Self::AntiMoneyLaundering => "Financial Controls Concern",
            Self::Contract => "Contractual Clause Concern",
            Self::Accessibility => "Accessibility Concern",
        }
    }

    pub fn recommendation(&self, law: &str) -> String {
        let focus = match self {
            Self::DataProtection => "the data collection, retention and consent clauses",
            Self::ConsumerProtection => "the customer-facing terms and disclosures",
            Self::Employment => "the working conditions and termination clauses",
            Self::Corporate => "the governance and reporting obligations",
            Self::AntiMoneyLaundering => "the customer due diligence provisions",
            Self::Contract => "the liability and termination clauses",
            Self::Accessibility => "the accessibility commitments",
        };
        format!("Review {focus} and ensure compliance with {law}")
    }
}

/// A single law or regulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Law {
    pub name: &'static str,
    pub description: &'static str,
    pub category: ComplianceCategory,
}

const fn law(name: &'static str, description: &'static str, category: ComplianceCategory) -> Law {
    Law {
        name,
        description,
        category,
    }
}

struct JurisdictionEntry {
    code: &'static str,
    name: &'static str,
    laws: &'static [Law],
}

use ComplianceCategory::*;

static TABLE: &[JurisdictionEntry] = &[
    JurisdictionEntry {
        code: "us",
        name: "United States",
        laws: &[
            law(
                "FTC Act Section 5",
                "Prohibits unfair or deceptive acts or practices in commerce",
                ConsumerProtection,
            ),
            law(
                "HIPAA",
                "Protects the privacy and security of health information",
                DataProtection,
            ),
            law(
                "Sarbanes-Oxley Act",
                "Sets financial reporting and internal control requirements for public companies",
                Corporate,
            ),
            law(
                "Fair Labor Standards Act",
                "Establishes minimum wage, overtime pay and recordkeeping standards",
                Employment,
            ),
            law(
                "Bank Secrecy Act",
                "Requires record keeping and reporting to detect money laundering",
                AntiMoneyLaundering,
            ),
            law(
                "Americans with Disabilities Act",
                "Prohibits discrimination against people with disabilities",
                Accessibility,
            ),
        ],
    },
    JurisdictionEntry {
        code: "us-ca",
        name: "California",
        laws: &[
            law(
                "California Consumer Privacy Act (CCPA)",
                "Grants California consumers rights over the personal information businesses collect",
                DataProtection,
            ),
            law(
                "California Privacy Rights Act (CPRA)",
                "Amends the CCPA and adds protections for sensitive personal information",
                DataProtection,
            ),
            law(
                "California Labor Code",
                "Regulates wages, hours and working conditions in California",
                Employment,
            ),
            law(
                "Unruh Civil Rights Act",
                "Requires full and equal access to business establishments",
                Accessibility,
            ),
        ],
    },
    JurisdictionEntry {
        code: "us-ny",
        name: "New York",
        laws: &[
            law(
                "NY SHIELD Act",
                "Requires safeguards for private information and breach notification",
                DataProtection,
            ),
            law(
                "NYDFS Cybersecurity Regulation (23 NYCRR 500)",
                "Sets cybersecurity requirements for financial services companies",
                DataProtection,
            ),
            law(
                "New York Labor Law",
                "Regulates employment conditions and wage payments in New York",
                Employment,
            ),
        ],
    },
    JurisdictionEntry {
        code: "eu",
        name: "European Union",
        laws: &[
            law(
                "General Data Protection Regulation (GDPR)",
                "Regulates the processing of personal data of individuals in the EU",
                DataProtection,
            ),
            law(
                "ePrivacy Directive",
                "Governs confidentiality of electronic communications and cookies",
                DataProtection,
            ),
            law(
                "Unfair Contract Terms Directive (93/13/EEC)",
                "Protects consumers against unfair standard contract terms",
                Contract,
            ),
            law(
                "Consumer Rights Directive (2011/83/EU)",
                "Harmonizes consumer information and withdrawal rights",
                ConsumerProtection,
            ),
            law(
                "Fifth Anti-Money Laundering Directive",
                "Strengthens customer due diligence and beneficial ownership transparency",
                AntiMoneyLaundering,
            ),
            law(
                "European Accessibility Act",
                "Sets accessibility requirements for products and services",
                Accessibility,
            ),
        ],
    },
    JurisdictionEntry {
        code: "uk",
        name: "United Kingdom",
        laws: &[
            law(
                "UK GDPR",
                "Retained EU data protection rules as applied in the United Kingdom",
                DataProtection,
            ),
            law(
                "Data Protection Act 2018",
                "Supplements the UK GDPR and sets out data protection enforcement",
                DataProtection,
            ),
            law(
                "Consumer Rights Act 2015",
                "Consolidates consumer rights for goods, services and digital content",
                ConsumerProtection,
            ),
            law(
                "Companies Act 2006",
                "Governs company formation, directors' duties and reporting",
                Corporate,
            ),
            law(
                "Employment Rights Act 1996",
                "Sets out statutory employment rights including unfair dismissal",
                Employment,
            ),
            law(
                "Money Laundering Regulations 2017",
                "Implements customer due diligence and reporting obligations",
                AntiMoneyLaundering,
            ),
        ],
    },
    JurisdictionEntry {
        code: "it",
        name: "Italy",
        laws: &[
            law(
                "Regolamento Generale sulla Protezione dei Dati (GDPR)",
                "EU data protection regulation as applied in Italy",
                DataProtection,
            ),
            law(
                "Decreto Legislativo 231/2001",
                "Administrative liability of companies for offences committed in their interest",
                Corporate,
            ),
            law(
                "Codice Civile Italiano",
                "General rules on contracts and obligations",
                Contract,
            ),
            law(
                "Codice del Consumo",
                "Italian consumer protection code",
                ConsumerProtection,
            ),
            law(
                "Legge sulla Privacy (196/2003)",
                "Italian personal data protection code",
                DataProtection,
            ),
            law(
                "Decreto Legislativo 81/2008 (Sicurezza sul Lavoro)",
                "Health and safety obligations in the workplace",
                Employment,
            ),
            law(
                "Legge Antiriciclaggio (231/2007)",
                "Prevention of money laundering and terrorist financing",
                AntiMoneyLaundering,
            ),
        ],
    },
    JurisdictionEntry {
        code: "ca",
        name: "Canada",
        laws: &[
            law(
                "PIPEDA",
                "Governs how private sector organizations handle personal information",
                DataProtection,
            ),
            law(
                "Canada's Anti-Spam Legislation (CASL)",
                "Regulates commercial electronic messages and consent",
                ConsumerProtection,
            ),
            law(
                "Competition Act",
                "Prohibits misleading advertising and anti-competitive conduct",
                ConsumerProtection,
            ),
            law(
                "Canada Labour Code",
                "Regulates employment in federally regulated industries",
                Employment,
            ),
            law(
                "Proceeds of Crime (Money Laundering) and Terrorist Financing Act",
                "Requires reporting of suspicious and large cash transactions",
                AntiMoneyLaundering,
            ),
        ],
    },
    JurisdictionEntry {
        code: "au",
        name: "Australia",
        laws: &[
            law(
                "Privacy Act 1988",
                "Regulates the handling of personal information under the Australian Privacy Principles",
                DataProtection,
            ),
            law(
                "Australian Consumer Law",
                "Protects consumers against unfair practices and unsafe products",
                ConsumerProtection,
            ),
            law(
                "Corporations Act 2001",
                "Regulates companies, directors and financial products",
                Corporate,
            ),
            law(
                "Fair Work Act 2009",
                "Sets national employment standards and workplace relations rules",
                Employment,
            ),
            law(
                "AML/CTF Act 2006",
                "Anti-money laundering and counter-terrorism financing obligations",
                AntiMoneyLaundering,
            ),
        ],
    },
    JurisdictionEntry {
        code: INTERNATIONAL,
        name: "International",
        laws: &[
            law(
                "UN Convention on Contracts for the International Sale of Goods",
                "Uniform rules for international commercial sales contracts",
                Contract,
            ),
            law(
                "UNIDROIT Principles of International Commercial Contracts",
                "General rules for international commercial contracts",
                Contract,
            ),
            law(
                "OECD Privacy Guidelines",
                "International principles for the protection of personal data",
                DataProtection,
            ),
            law(
                "ILO Core Labour Standards",
                "Fundamental principles and rights at work",
                Employment,
            ),
        ],
    },
];

fn entry(code: &str) -> Option<&'static JurisdictionEntry> {
    TABLE.iter().find(|e| e.code == code)
}

/// Laws resolved for a requested jurisdiction.
#[derive(Debug, Clone)]
pub struct ApplicableLaws {
    pub requested: Jurisdiction,
    /// Code of the table entry that supplied the laws.
    pub resolved: &'static str,
    pub laws: Vec<&'static Law>,
}

pub fn laws_for(jurisdiction: &Jurisdiction) -> ApplicableLaws {
    let exact = entry(jurisdiction.as_str());
    let region = jurisdiction
        .subdivision()
        .and_then(|_| entry(jurisdiction.region()));

    let (resolved, laws) = match (exact, region) {
        (Some(exact), Some(region)) => {
            let mut laws: Vec<&'static Law> = exact.laws.iter().collect();
            for law in region.laws {
                if !laws.iter().any(|l| l.name == law.name) {
                    laws.push(law);
                }
            }
            (exact.code, laws)
        }
        (Some(exact), None) => (exact.code, exact.laws.iter().collect()),
        (None, Some(region)) => (region.code, region.laws.iter().collect()),
        (None, None) => entry(INTERNATIONAL)
            .map(|e| (e.code, e.laws.iter().collect()))
            .unwrap_or((INTERNATIONAL, Vec::new())),
    };

    ApplicableLaws {
        requested: jurisdiction.clone(),
        resolved,
        laws,
    }
}

/// Entry of the public jurisdiction catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SupportedJurisdiction {
    pub code: String,
    pub name: String,
    pub display: String,
    pub law_count: usize,
}

/// Every jurisdiction with a dedicated table, `international` excluded.
pub fn supported_jurisdictions() -> Vec<SupportedJurisdiction> {
    TABLE
        .iter()
        .filter(|e| e.code != INTERNATIONAL)
        .filter_map(|e| {
            let jurisdiction = Jurisdiction::parse(e.code).ok()?;
            Some(SupportedJurisdiction {
                code: e.code.to_string(),
                name: e.name.to_string(),
                display: display_code(e.code),
                law_count: laws_for(&jurisdiction).laws.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn j(code: &str) -> Jurisdiction {
        Jurisdiction::parse(code).unwrap()
    }

    #[test]
    fn region_lookup_is_exact() {
        let resolved = laws_for(&j("eu"));
        assert_eq!(resolved.resolved, resolved.requested.as_str());
        assert!(
            resolved
                .laws
                .iter()
                .any(|l| l.name.contains("GDPR") && l.category == DataProtection)
        );
    }

    #[test]
    fn subdivision_inherits_region_laws_first_local() {
        let resolved = laws_for(&j("us-ca"));
        assert_eq!(resolved.resolved, "us-ca");
        assert!(resolved.laws[0].name.contains("CCPA"));
        assert!(resolved.laws.iter().any(|l| l.name == "HIPAA"));

        let us_ca = entry("us-ca").unwrap().laws.len();
        let us = entry("us").unwrap().laws.len();
        assert_eq!(resolved.laws.len(), us_ca + us);
    }

    #[test]
    fn unknown_subdivision_falls_back_to_region() {
        let resolved = laws_for(&j("us-tx"));
        assert_eq!(resolved.resolved, "us");
        assert_eq!(resolved.requested.as_str(), "us-tx");
        assert_eq!(resolved.laws.len(), entry("us").unwrap().laws.len());
    }

    #[test]
    fn unknown_region_falls_back_to_international() {
        let resolved = laws_for(&j("fr"));
        assert_eq!(resolved.resolved, INTERNATIONAL);
        assert!(!resolved.laws.is_empty());
    }

    #[test]
    fn italian_table_matches_known_laws() {
        let names: Vec<&str> = laws_for(&j("it")).laws.iter().map(|l| l.name).collect();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"Codice del Consumo"));
        assert!(names.contains(&"Legge Antiriciclaggio (231/2007)"));
    }

    #[test]
    fn no_duplicate_law_names_after_merge() {
        for code in ["us-ca", "us-ny"] {
            let laws = laws_for(&j(code)).laws;
            let mut names: Vec<&str> = laws.iter().map(|l| l.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), laws.len(), "duplicates for {code}");
        }
    }

    #[test]
    fn catalogue_lists_supported_codes() {
        let catalogue = supported_jurisdictions();
        let codes: Vec<&str> = catalogue.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["us", "us-ca", "us-ny", "eu", "uk", "it", "ca", "au"]);

        let ca = catalogue.iter().find(|s| s.code == "us-ca").unwrap();
        assert_eq!(ca.display, "US-CA");
        assert_eq!(ca.law_count, laws_for(&j("us-ca")).laws.len());
        assert!(!codes.contains(&INTERNATIONAL));
    }

    #[test]
    fn recommendation_mentions_law() {
        let text = Employment.recommendation("Fair Work Act 2009");
        assert!(text.starts_with("Review "));
        assert!(text.ends_with("ensure compliance with Fair Work Act 2009"));
    }
}
