//! Common types used throughout the WorldCat client
//!
//! Enumerated option values shared by several endpoint methods.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Query string pairs in send order; repeated keys are allowed
pub type QueryPairs = Vec<(String, String)>;

// ============================================================================
// Record Formats
// ============================================================================

/// Serialization of a MARC record body, sent as `Content-Type` or `Accept`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordFormat {
    /// MARCXML (`application/marcxml+xml`)
    #[default]
    #[serde(rename = "application/marcxml+xml")]
    MarcXml,
    /// Binary MARC21 (`application/marc`)
    #[serde(rename = "application/marc")]
    Marc21,
}

impl RecordFormat {
    /// MIME type used on the wire
    pub fn mime_type(self) -> &'static str {
        match self {
            RecordFormat::MarcXml => "application/marcxml+xml",
            RecordFormat::Marc21 => "application/marc",
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Level at which `/manage/bibs/validate` checks a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationLevel {
    #[default]
    ValidateFull,
    ValidateAdd,
    ValidateReplace,
}

impl ValidationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationLevel::ValidateFull => "validateFull",
            ValidationLevel::ValidateAdd => "validateAdd",
            ValidationLevel::ValidateReplace => "validateReplace",
        }
    }
}

// ============================================================================
// Search Options
// ============================================================================

/// Distance unit for geographic search limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "M")]
    Miles,
    #[serde(rename = "K")]
    Kilometers,
}

impl DistanceUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "M",
            DistanceUnit::Kilometers => "K",
        }
    }
}

/// Library type filter for holdings summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LibraryType {
    Public,
    All,
}

impl LibraryType {
    pub fn as_str(self) -> &'static str {
        match self {
            LibraryType::Public => "PUBLIC",
            LibraryType::All => "ALL",
        }
    }
}

/// Sort order for `/search/brief-bibs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BriefBibsOrderBy {
    Recency,
    BestMatch,
    Creator,
    Library,
    PublicationDateAsc,
    PublicationDateDesc,
    #[default]
    MostWidelyHeld,
    Title,
}

impl BriefBibsOrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            BriefBibsOrderBy::Recency => "recency",
            BriefBibsOrderBy::BestMatch => "bestMatch",
            BriefBibsOrderBy::Creator => "creator",
            BriefBibsOrderBy::Library => "library",
            BriefBibsOrderBy::PublicationDateAsc => "publicationDateAsc",
            BriefBibsOrderBy::PublicationDateDesc => "publicationDateDesc",
            BriefBibsOrderBy::MostWidelyHeld => "mostWidelyHeld",
            BriefBibsOrderBy::Title => "title",
        }
    }
}

/// Sort order for `/search/brief-bibs/{oclcNumber}/other-editions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtherEditionsOrderBy {
    #[serde(rename = "+date")]
    DateAsc,
    #[serde(rename = "-date")]
    DateDesc,
    #[serde(rename = "+language")]
    LanguageAsc,
    #[serde(rename = "-language")]
    LanguageDesc,
}

impl OtherEditionsOrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            OtherEditionsOrderBy::DateAsc => "+date",
            OtherEditionsOrderBy::DateDesc => "-date",
            OtherEditionsOrderBy::LanguageAsc => "+language",
            OtherEditionsOrderBy::LanguageDesc => "-language",
        }
    }
}

/// Sort order for local holdings searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocalHoldingsOrderBy {
    CommitmentExpirationDate,
    Location,
    OclcSymbol,
}

impl LocalHoldingsOrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            LocalHoldingsOrderBy::CommitmentExpirationDate => "commitmentExpirationDate",
            LocalHoldingsOrderBy::Location => "location",
            LocalHoldingsOrderBy::OclcSymbol => "oclcSymbol",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format_mime_types() {
        assert_eq!(RecordFormat::default(), RecordFormat::MarcXml);
        assert_eq!(RecordFormat::MarcXml.to_string(), "application/marcxml+xml");
        assert_eq!(RecordFormat::Marc21.mime_type(), "application/marc");
    }

    #[test]
    fn test_serde_matches_wire_values() {
        let json = serde_json::to_string(&RecordFormat::Marc21).unwrap();
        assert_eq!(json, "\"application/marc\"");

        let level: ValidationLevel = serde_json::from_str("\"validateAdd\"").unwrap();
        assert_eq!(level.as_str(), "validateAdd");

        let order: OtherEditionsOrderBy = serde_json::from_str("\"-date\"").unwrap();
        assert_eq!(order, OtherEditionsOrderBy::DateDesc);

        let unit = serde_json::to_string(&DistanceUnit::Kilometers).unwrap();
        assert_eq!(unit, "\"K\"");
    }

    #[test]
    fn test_order_by_defaults() {
        assert_eq!(BriefBibsOrderBy::default().as_str(), "mostWidelyHeld");
        assert_eq!(
            LocalHoldingsOrderBy::CommitmentExpirationDate.as_str(),
            "commitmentExpirationDate"
        );
        assert_eq!(LibraryType::Public.as_str(), "PUBLIC");
    }
}
