//! Bibliographic record management (`/manage/bibs`)

use super::{record_body, MetadataSession, JSON};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::identifiers::{verify_oclc_number, verify_oclc_numbers, ToOclcNumber, ToOclcNumbers};
use crate::types::{RecordFormat, ValidationLevel};
use reqwest::Response;

impl MetadataSession {
    /// Create a bib record in WorldCat if it does not already exist
    pub async fn bib_create(
        &self,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let body = record_body(record)?;
        let request = ApiRequest::new()
            .accept(response_format.mime_type())
            .content_type(record_format.mime_type())
            .body(body);
        self.post("/manage/bibs", request).await
    }

    /// Full bibliographic record
    pub async fn bib_get(
        &self,
        oclc_number: impl ToOclcNumber,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let oclc_number = verify_oclc_number(&oclc_number)?;
        let request = ApiRequest::new().accept(response_format.mime_type());
        self.get(&format!("/manage/bibs/{oclc_number}"), request)
            .await
    }

    /// Dewey and LC classification of a record
    pub async fn bib_get_classification(&self, oclc_number: impl ToOclcNumber) -> Result<Response> {
        let oclc_number = verify_oclc_number(&oclc_number)?;
        self.get(
            &format!("/search/classification-bibs/{oclc_number}"),
            ApiRequest::new().accept(JSON),
        )
        .await
    }

    /// Current control numbers for possibly merged or deleted OCLC #s
    pub async fn bib_get_current_oclc_number(
        &self,
        oclc_numbers: impl ToOclcNumbers,
    ) -> Result<Response> {
        let numbers = verify_oclc_numbers(&oclc_numbers)?;
        let joined = numbers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let request = ApiRequest::new()
            .accept(JSON)
            .query("oclcNumbers", joined);
        self.get("/manage/bibs/current", request).await
    }

    /// Find the best WorldCat match for a record
    pub async fn bib_match(
        &self,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
    ) -> Result<Response> {
        let body = record_body(record)?;
        let request = ApiRequest::new()
            .accept(JSON)
            .content_type(record_format.mime_type())
            .body(body);
        self.post("/manage/bibs/match", request).await
    }

    /// Replace an existing bib record
    pub async fn bib_replace(
        &self,
        oclc_number: impl ToOclcNumber,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let oclc_number = verify_oclc_number(&oclc_number)?;
        let body = record_body(record)?;
        let request = ApiRequest::new()
            .accept(response_format.mime_type())
            .content_type(record_format.mime_type())
            .body(body);
        self.put(&format!("/manage/bibs/{oclc_number}"), request)
            .await
    }

    /// Check a record against MARC and WorldCat rules at the given level
    pub async fn bib_validate(
        &self,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
        validation_level: ValidationLevel,
    ) -> Result<Response> {
        let body = record_body(record)?;
        let request = ApiRequest::new()
            .accept(JSON)
            .content_type(record_format.mime_type())
            .body(body);
        self.post(
            &format!("/manage/bibs/validate/{}", validation_level.as_str()),
            request,
        )
        .await
    }
}
