use norma_compliance::{Jurisdiction, supported_jurisdictions};
use norma_core::AppError;

use super::model::JurisdictionInfo;

pub struct JurisdictionService;

impl JurisdictionService {
    pub fn list() -> Vec<JurisdictionInfo> {
        supported_jurisdictions()
            .into_iter()
            .map(|j| JurisdictionInfo {
                code: j.code,
                name: j.name,
                display: j.display,
                law_count: j.law_count,
            })
            .collect()
    }

    /// Parses a client supplied code, 400 on malformed input.
    pub fn parse(code: &str) -> Result<Jurisdiction, AppError> {
        Jurisdiction::parse(code).map_err(|e| AppError::bad_request(e.to_string()))
    }

    /// Parses every code and drops duplicates, keeping the first occurrence.
    pub fn parse_all(codes: &[String]) -> Result<Vec<String>, AppError> {
        let mut parsed: Vec<String> = Vec::with_capacity(codes.len());
        for code in codes {
            let jurisdiction = Self::parse(code)?;
            if !parsed.iter().any(|p| p == jurisdiction.as_str()) {
                parsed.push(jurisdiction.as_str().to_string());
            }
        }
        Ok(parsed)
    }
}
