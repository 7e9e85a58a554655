//! Institution holdings (`/manage/institution`)

use super::{record_body, MetadataSession, JSON};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::identifiers::{
    split_into_batches, verify_oclc_number, verify_oclc_numbers, ToOclcNumber, ToOclcNumbers,
};
use crate::types::RecordFormat;
use reqwest::Response;
use tracing::debug;

/// Numbers accepted per `/manage/institution/holdings/current` request
pub const CURRENT_HOLDINGS_BATCH_SIZE: usize = 10;

impl MetadataSession {
    /// Holding codes of the authenticated institution
    pub async fn holdings_get_codes(&self) -> Result<Response> {
        self.get(
            "/manage/institution/holding-codes",
            ApiRequest::new().accept(JSON),
        )
        .await
    }

    /// Holdings status of each number, one request per batch of ten
    ///
    /// Batches are sent in order; the first failure stops the run.
    pub async fn holdings_get_current(
        &self,
        oclc_numbers: impl ToOclcNumbers,
    ) -> Result<Vec<Response>> {
        let numbers = verify_oclc_numbers(&oclc_numbers)?;
        let batches = split_into_batches(&numbers, CURRENT_HOLDINGS_BATCH_SIZE);
        debug!(
            "Checking holdings of {} OCLC #s in {} batches",
            numbers.len(),
            batches.len()
        );

        let mut responses = Vec::with_capacity(batches.len());
        for batch in batches {
            let request = ApiRequest::new().accept(JSON).query("oclcNumbers", batch);
            responses.push(
                self.get("/manage/institution/holdings/current", request)
                    .await?,
            );
        }
        Ok(responses)
    }

    /// Set the institution's holding on a record
    pub async fn holdings_set(&self, oclc_number: impl ToOclcNumber) -> Result<Response> {
        let oclc_number = verify_oclc_number(&oclc_number)?;
        self.post(
            &format!("/manage/institution/holdings/{oclc_number}/set"),
            ApiRequest::new().accept(JSON),
        )
        .await
    }

    /// Remove the institution's holding from a record
    ///
    /// With `cascade_delete` the service also deletes the institution's
    /// local holdings records and local bibliographic data attached to the
    /// record. See [`MetadataSession::DEFAULT_CASCADE_DELETE`].
    pub async fn holdings_unset(
        &self,
        oclc_number: impl ToOclcNumber,
        cascade_delete: bool,
    ) -> Result<Response> {
        let oclc_number = verify_oclc_number(&oclc_number)?;
        let request = ApiRequest::new()
            .accept(JSON)
            .query("cascadeDelete", cascade_delete);
        self.post(
            &format!("/manage/institution/holdings/{oclc_number}/unset"),
            request,
        )
        .await
    }

    /// Set a holding on the record identified inside a MARC record
    pub async fn holdings_set_on_bib(
        &self,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
    ) -> Result<Response> {
        let body = record_body(record)?;
        let request = ApiRequest::new()
            .accept(JSON)
            .content_type(record_format.mime_type())
            .body(body);
        self.post("/manage/institution/holdings/set", request).await
    }

    /// Unset a holding on the record identified inside a MARC record
    pub async fn holdings_unset_on_bib(
        &self,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
        cascade_delete: bool,
    ) -> Result<Response> {
        let body = record_body(record)?;
        let request = ApiRequest::new()
            .accept(JSON)
            .content_type(record_format.mime_type())
            .query("cascadeDelete", cascade_delete)
            .body(body);
        self.post("/manage/institution/holdings/unset", request)
            .await
    }
}
