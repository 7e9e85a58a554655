//! Local bibliographic data and local holdings records
//!
//! Management endpoints (`/manage/lbds`, `/manage/lhrs`) plus the search
//! and browse endpoints over the institution's own local records.

use super::{control_number, record_body, MetadataSession, JSON};
use crate::error::{Error, Result};
use crate::http::ApiRequest;
use crate::identifiers::verify_oclc_number;
use crate::types::{LocalHoldingsOrderBy, RecordFormat};
use reqwest::Response;
use std::fmt;

/// Parameters for `/search/my-local-bib-data`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalBibsSearch {
    /// Keyword or fielded query, e.g. `ti:Zendegi AND au:greg egan`
    pub q: String,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl LocalBibsSearch {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_request(&self) -> Result<ApiRequest> {
        if self.q.trim().is_empty() {
            return Err(Error::invalid_argument("q", "is required to construct a query"));
        }
        Ok(ApiRequest::new()
            .accept(JSON)
            .query("q", &self.q)
            .query_opt("offset", self.offset)
            .query_opt("limit", self.limit))
    }
}

/// Parameters for `/search/my-holdings`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalHoldingsSearch {
    /// OCLC # with or without prefix
    pub oclc_number: Option<String>,
    pub barcode: Option<String>,
    pub order_by: Option<LocalHoldingsOrderBy>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl LocalHoldingsSearch {
    pub(crate) fn to_request(&self) -> Result<ApiRequest> {
        let oclc_number = self
            .oclc_number
            .as_deref()
            .map(verify_oclc_number)
            .transpose()?;
        Ok(ApiRequest::new()
            .accept(JSON)
            .query_opt("oclcNumber", oclc_number)
            .query_opt("barcode", self.barcode.as_deref())
            .query_opt("orderBy", self.order_by.map(LocalHoldingsOrderBy::as_str))
            .query_opt("offset", self.offset)
            .query_opt("limit", self.limit))
    }
}

/// Parameters for `/browse/my-holdings`
///
/// Holding and shelving locations are both required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalHoldingsBrowse {
    pub holding_location: String,
    pub shelving_location: String,
    pub call_number: Option<String>,
    /// OCLC # with or without prefix
    pub oclc_number: Option<String>,
    /// Position of the matching record within the browse list
    pub browse_position: Option<u32>,
    pub limit: Option<u32>,
}

impl LocalHoldingsBrowse {
    pub fn new(holding_location: impl Into<String>, shelving_location: impl Into<String>) -> Self {
        Self {
            holding_location: holding_location.into(),
            shelving_location: shelving_location.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_request(&self) -> Result<ApiRequest> {
        if self.holding_location.trim().is_empty() {
            return Err(Error::invalid_argument("holding_location", "is missing"));
        }
        if self.shelving_location.trim().is_empty() {
            return Err(Error::invalid_argument("shelving_location", "is missing"));
        }
        let oclc_number = self
            .oclc_number
            .as_deref()
            .map(verify_oclc_number)
            .transpose()?;

        Ok(ApiRequest::new()
            .accept(JSON)
            .query_opt("callNumber", self.call_number.as_deref())
            .query_opt("oclcNumber", oclc_number)
            .query("holdingLocation", &self.holding_location)
            .query("shelvingLocation", &self.shelving_location)
            .query_opt("browsePosition", self.browse_position)
            .query_opt("limit", self.limit))
    }
}

/// Parameters for `/search/retained-holdings`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedPrintLocalHoldingsSearch {
    /// OCLC # with or without prefix
    pub oclc_number: Option<String>,
    pub barcode: Option<String>,
    pub held_by_symbol: Vec<String>,
    pub held_by_institution_id: Vec<u64>,
    pub sp_program: Vec<String>,
    pub order_by: Option<LocalHoldingsOrderBy>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl SharedPrintLocalHoldingsSearch {
    pub(crate) fn to_request(&self) -> Result<ApiRequest> {
        let oclc_number = self
            .oclc_number
            .as_deref()
            .map(verify_oclc_number)
            .transpose()?;
        Ok(ApiRequest::new()
            .accept(JSON)
            .query_opt("oclcNumber", oclc_number)
            .query_opt("barcode", self.barcode.as_deref())
            .query_list("heldBySymbol", &self.held_by_symbol)
            .query_list("heldByInstitutionID", &self.held_by_institution_id)
            .query_list("spProgram", &self.sp_program)
            .query_opt("orderBy", self.order_by.map(LocalHoldingsOrderBy::as_str))
            .query_opt("offset", self.offset)
            .query_opt("limit", self.limit))
    }
}

impl MetadataSession {
    // ------------------------------------------------------------------------
    // Local bibliographic data
    // ------------------------------------------------------------------------

    pub async fn lbd_create(
        &self,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let request = record_request(record, record_format, response_format)?;
        self.post("/manage/lbds", request).await
    }

    pub async fn lbd_get(
        &self,
        control_num: impl fmt::Display,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let control_num = control_number(control_num)?;
        let request = ApiRequest::new().accept(response_format.mime_type());
        self.get(&format!("/manage/lbds/{control_num}"), request)
            .await
    }

    pub async fn lbd_replace(
        &self,
        control_num: impl fmt::Display,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let control_num = control_number(control_num)?;
        let request = record_request(record, record_format, response_format)?;
        self.put(&format!("/manage/lbds/{control_num}"), request)
            .await
    }

    pub async fn lbd_delete(
        &self,
        control_num: impl fmt::Display,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let control_num = control_number(control_num)?;
        let request = ApiRequest::new().accept(response_format.mime_type());
        self.delete(&format!("/manage/lbds/{control_num}"), request)
            .await
    }

    // ------------------------------------------------------------------------
    // Local holdings records
    // ------------------------------------------------------------------------

    pub async fn lhr_create(
        &self,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let request = record_request(record, record_format, response_format)?;
        self.post("/manage/lhrs", request).await
    }

    pub async fn lhr_get(
        &self,
        control_num: impl fmt::Display,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let control_num = control_number(control_num)?;
        let request = ApiRequest::new().accept(response_format.mime_type());
        self.get(&format!("/manage/lhrs/{control_num}"), request)
            .await
    }

    pub async fn lhr_replace(
        &self,
        control_num: impl fmt::Display,
        record: impl Into<Vec<u8>>,
        record_format: RecordFormat,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let control_num = control_number(control_num)?;
        let request = record_request(record, record_format, response_format)?;
        self.put(&format!("/manage/lhrs/{control_num}"), request)
            .await
    }

    pub async fn lhr_delete(
        &self,
        control_num: impl fmt::Display,
        response_format: RecordFormat,
    ) -> Result<Response> {
        let control_num = control_number(control_num)?;
        let request = ApiRequest::new().accept(response_format.mime_type());
        self.delete(&format!("/manage/lhrs/{control_num}"), request)
            .await
    }

    // ------------------------------------------------------------------------
    // Search and browse
    // ------------------------------------------------------------------------

    /// Local bibliographic data record as JSON
    pub async fn local_bibs_get(&self, control_num: impl fmt::Display) -> Result<Response> {
        let control_num = control_number(control_num)?;
        self.get(
            &format!("/search/my-local-bib-data/{control_num}"),
            ApiRequest::new().accept(JSON),
        )
        .await
    }

    pub async fn local_bibs_search(&self, params: &LocalBibsSearch) -> Result<Response> {
        let request = params.to_request()?;
        self.get("/search/my-local-bib-data", request).await
    }

    /// Local holdings record as JSON
    pub async fn local_holdings_get(&self, control_num: impl fmt::Display) -> Result<Response> {
        let control_num = control_number(control_num)?;
        self.get(
            &format!("/search/my-holdings/{control_num}"),
            ApiRequest::new().accept(JSON),
        )
        .await
    }

    pub async fn local_holdings_search(&self, params: &LocalHoldingsSearch) -> Result<Response> {
        let request = params.to_request()?;
        self.get("/search/my-holdings", request).await
    }

    pub async fn local_holdings_browse(&self, params: &LocalHoldingsBrowse) -> Result<Response> {
        let request = params.to_request()?;
        self.get("/browse/my-holdings", request).await
    }

    /// Shared print local holdings records
    pub async fn local_holdings_search_shared_print(
        &self,
        params: &SharedPrintLocalHoldingsSearch,
    ) -> Result<Response> {
        let request = params.to_request()?;
        self.get("/search/retained-holdings", request).await
    }
}

fn record_request(
    record: impl Into<Vec<u8>>,
    record_format: RecordFormat,
    response_format: RecordFormat,
) -> Result<ApiRequest> {
    let body = record_body(record)?;
    Ok(ApiRequest::new()
        .accept(response_format.mime_type())
        .content_type(record_format.mime_type())
        .body(body))
}
