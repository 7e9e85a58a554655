//! Brief bibliographic search and holdings summaries (`/search`)

use super::{MetadataSession, JSON};
use crate::error::{Error, Result};
use crate::http::ApiRequest;
use crate::identifiers::{verify_oclc_number, OclcNumber, ToOclcNumber};
use crate::types::{BriefBibsOrderBy, DistanceUnit, LibraryType, OtherEditionsOrderBy};
use reqwest::Response;

// ============================================================================
// Brief bibs
// ============================================================================

/// Parameters for `/search/brief-bibs`
///
/// Only `q` is required. List fields repeat their query key once per value;
/// empty lists and `None` options are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BriefBibsSearch {
    /// Keyword or fielded query, e.g. `ti:Zendegi AND au:greg egan`
    pub q: String,
    pub dewey_number: Vec<String>,
    pub date_published: Vec<String>,
    pub held_by_group: Option<String>,
    pub held_by_symbol: Vec<String>,
    pub held_by_institution_id: Vec<u64>,
    pub in_language: Vec<String>,
    pub in_catalog_language: Option<String>,
    pub material_type: Option<String>,
    pub catalog_source: Option<String>,
    pub item_type: Vec<String>,
    pub item_sub_type: Vec<String>,
    pub retention_commitments: Option<bool>,
    pub sp_program: Option<String>,
    pub genre: Option<String>,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub audience: Option<String>,
    pub content: Vec<String>,
    pub open_access: Option<bool>,
    pub peer_reviewed: Option<bool>,
    pub facets: Vec<String>,
    pub group_related_editions: Option<bool>,
    pub group_variant_records: Option<bool>,
    pub preferred_language: Option<String>,
    pub show_holdings_indicators: Option<bool>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub distance: Option<u32>,
    pub unit: Option<DistanceUnit>,
    /// Always sent; defaults to `mostWidelyHeld`
    pub order_by: BriefBibsOrderBy,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl BriefBibsSearch {
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
            .query_list("deweyNumber", &self.dewey_number)
            .query_list("datePublished", &self.date_published)
            .query_opt("heldByGroup", self.held_by_group.as_deref())
            .query_list("heldBySymbol", &self.held_by_symbol)
            .query_list("heldByInstitutionID", &self.held_by_institution_id)
            .query_list("inLanguage", &self.in_language)
            .query_opt("inCatalogLanguage", self.in_catalog_language.as_deref())
            .query_opt("materialType", self.material_type.as_deref())
            .query_opt("catalogSource", self.catalog_source.as_deref())
            .query_list("itemType", &self.item_type)
            .query_list("itemSubType", &self.item_sub_type)
            .query_opt("retentionCommitments", self.retention_commitments)
            .query_opt("spProgram", self.sp_program.as_deref())
            .query_opt("genre", self.genre.as_deref())
            .query_opt("topic", self.topic.as_deref())
            .query_opt("subtopic", self.subtopic.as_deref())
            .query_opt("audience", self.audience.as_deref())
            .query_list("content", &self.content)
            .query_opt("openAccess", self.open_access)
            .query_opt("peerReviewed", self.peer_reviewed)
            .query_list("facets", &self.facets)
            .query_opt("groupRelatedEditions", self.group_related_editions)
            .query_opt("groupVariantRecords", self.group_variant_records)
            .query_opt("preferredLanguage", self.preferred_language.as_deref())
            .query_opt("showHoldingsIndicators", self.show_holdings_indicators)
            .query_opt("lat", self.lat)
            .query_opt("lon", self.lon)
            .query_opt("distance", self.distance)
            .query_opt("unit", self.unit.map(DistanceUnit::as_str))
            .query("orderBy", self.order_by.as_str())
            .query_opt("offset", self.offset)
            .query_opt("limit", self.limit))
    }
}

/// Parameters for `/search/brief-bibs/{oclcNumber}/other-editions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OtherEditionsSearch {
    pub dewey_number: Vec<String>,
    pub date_published: Vec<String>,
    pub held_by_group: Option<String>,
    pub held_by_symbol: Vec<String>,
    pub held_by_institution_id: Vec<u64>,
    pub in_language: Vec<String>,
    pub in_catalog_language: Option<String>,
    pub material_type: Option<String>,
    pub catalog_source: Option<String>,
    pub item_type: Vec<String>,
    pub item_sub_type: Vec<String>,
    pub retention_commitments: Option<bool>,
    pub sp_program: Option<String>,
    pub genre: Option<String>,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub audience: Option<String>,
    pub content: Vec<String>,
    pub open_access: Option<bool>,
    pub peer_reviewed: Option<bool>,
    pub facets: Vec<String>,
    pub group_variant_records: Option<bool>,
    pub preferred_language: Option<String>,
    pub show_holdings_indicators: Option<bool>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub order_by: Option<OtherEditionsOrderBy>,
}

impl OtherEditionsSearch {
    pub(crate) fn to_request(&self) -> ApiRequest {
        ApiRequest::new()
            .accept(JSON)
            .query_list("deweyNumber", &self.dewey_number)
            .query_list("datePublished", &self.date_published)
            .query_opt("heldByGroup", self.held_by_group.as_deref())
            .query_list("heldBySymbol", &self.held_by_symbol)
            .query_list("heldByInstitutionID", &self.held_by_institution_id)
            .query_list("inLanguage", &self.in_language)
            .query_opt("inCatalogLanguage", self.in_catalog_language.as_deref())
            .query_opt("materialType", self.material_type.as_deref())
            .query_opt("catalogSource", self.catalog_source.as_deref())
            .query_list("itemType", &self.item_type)
            .query_list("itemSubType", &self.item_sub_type)
            .query_opt("retentionCommitments", self.retention_commitments)
            .query_opt("spProgram", self.sp_program.as_deref())
            .query_opt("genre", self.genre.as_deref())
            .query_opt("topic", self.topic.as_deref())
            .query_opt("subtopic", self.subtopic.as_deref())
            .query_opt("audience", self.audience.as_deref())
            .query_list("content", &self.content)
            .query_opt("openAccess", self.open_access)
            .query_opt("peerReviewed", self.peer_reviewed)
            .query_list("facets", &self.facets)
            .query_opt("groupVariantRecords", self.group_variant_records)
            .query_opt("preferredLanguage", self.preferred_language.as_deref())
            .query_opt("showHoldingsIndicators", self.show_holdings_indicators)
            .query_opt("offset", self.offset)
            .query_opt("limit", self.limit)
            .query_opt("orderBy", self.order_by.map(OtherEditionsOrderBy::as_str))
    }
}

// ============================================================================
// Holdings summaries
// ============================================================================

/// Holdings filters shared by both summary holdings endpoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsFilters {
    pub holdings_all_editions: Option<bool>,
    pub holdings_all_variant_records: Option<bool>,
    /// Item sub types, e.g. `book-digital`
    pub holdings_filter_format: Vec<String>,
    pub held_in_country: Option<String>,
    /// State code, e.g. `US-NY`
    pub held_in_state: Option<String>,
    pub held_by_group: Option<String>,
    pub held_by_symbol: Vec<String>,
    pub held_by_institution_id: Vec<u64>,
    pub held_by_library_type: Vec<LibraryType>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub distance: Option<u32>,
    pub unit: Option<DistanceUnit>,
}

impl HoldingsFilters {
    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt("holdingsAllEditions", self.holdings_all_editions)
            .query_opt(
                "holdingsAllVariantRecords",
                self.holdings_all_variant_records,
            )
            .query_list("holdingsFilterFormat", &self.holdings_filter_format)
            .query_opt("heldInCountry", self.held_in_country.as_deref())
            .query_opt("heldInState", self.held_in_state.as_deref())
            .query_opt("heldByGroup", self.held_by_group.as_deref())
            .query_list("heldBySymbol", &self.held_by_symbol)
            .query_list("heldByInstitutionID", &self.held_by_institution_id)
            .query_list(
                "heldByLibraryType",
                self.held_by_library_type.iter().map(|t| t.as_str()),
            )
            .query_opt("lat", self.lat)
            .query_opt("lon", self.lon)
            .query_opt("distance", self.distance)
            .query_opt("unit", self.unit.map(DistanceUnit::as_str))
    }
}

/// Parameters for `/search/bibs-summary-holdings`
///
/// At least one of `oclc_number`, `isbn` or `issn` is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryHoldingsSearch {
    /// OCLC # with or without prefix
    pub oclc_number: Option<String>,
    /// ISBN without dashes
    pub isbn: Option<String>,
    /// Hyphenated ISSN, e.g. `0099-1234`
    pub issn: Option<String>,
    pub preferred_language: Option<String>,
    pub filters: HoldingsFilters,
}

impl SummaryHoldingsSearch {
    pub(crate) fn to_request(&self) -> Result<ApiRequest> {
        let oclc_number = known_item(
            self.oclc_number.as_deref(),
            self.isbn.as_deref(),
            self.issn.as_deref(),
        )?;
        let request = ApiRequest::new()
            .accept(JSON)
            .query_opt("oclcNumber", oclc_number)
            .query_opt("isbn", self.isbn.as_deref())
            .query_opt("issn", self.issn.as_deref())
            .query_opt("preferredLanguage", self.preferred_language.as_deref());
        Ok(self.filters.apply(request))
    }
}

/// Parameters for `/search/bibs-retained-holdings`
///
/// At least one of `oclc_number`, `isbn` or `issn` is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedPrintHoldingsSearch {
    /// OCLC # with or without prefix
    pub oclc_number: Option<String>,
    pub isbn: Option<String>,
    pub issn: Option<String>,
    pub held_by_group: Option<String>,
    pub held_in_state: Option<String>,
    pub item_type: Vec<String>,
    pub item_sub_type: Vec<String>,
}

impl SharedPrintHoldingsSearch {
    pub(crate) fn to_request(&self) -> Result<ApiRequest> {
        let oclc_number = known_item(
            self.oclc_number.as_deref(),
            self.isbn.as_deref(),
            self.issn.as_deref(),
        )?;
        Ok(ApiRequest::new()
            .accept(JSON)
            .query_opt("oclcNumber", oclc_number)
            .query_opt("isbn", self.isbn.as_deref())
            .query_opt("issn", self.issn.as_deref())
            .query_opt("heldByGroup", self.held_by_group.as_deref())
            .query_opt("heldInState", self.held_in_state.as_deref())
            .query_list("itemType", &self.item_type)
            .query_list("itemSubType", &self.item_sub_type))
    }
}

/// Require one identifier of a known item, normalizing the OCLC #
fn known_item(
    oclc_number: Option<&str>,
    isbn: Option<&str>,
    issn: Option<&str>,
) -> Result<Option<OclcNumber>> {
    let present = |v: Option<&str>| v.is_some_and(|v| !v.trim().is_empty());
    if !(present(oclc_number) || present(isbn) || present(issn)) {
        return Err(Error::invalid_argument(
            "oclc_number",
            "one of oclc_number, isbn or issn is required",
        ));
    }
    oclc_number
        .filter(|v| !v.trim().is_empty())
        .map(verify_oclc_number)
        .transpose()
}

impl MetadataSession {
    /// Brief record for one OCLC #
    pub async fn brief_bibs_get(&self, oclc_number: impl ToOclcNumber) -> Result<Response> {
        let oclc_number = verify_oclc_number(&oclc_number)?;
        self.get(
            &format!("/search/brief-bibs/{oclc_number}"),
            ApiRequest::new().accept(JSON),
        )
        .await
    }

    pub async fn brief_bibs_search(&self, params: &BriefBibsSearch) -> Result<Response> {
        let request = params.to_request()?;
        self.get("/search/brief-bibs", request).await
    }

    /// Other editions related to an OCLC #
    pub async fn brief_bibs_search_other_editions(
        &self,
        oclc_number: impl ToOclcNumber,
        params: &OtherEditionsSearch,
    ) -> Result<Response> {
        let oclc_number = verify_oclc_number(&oclc_number)?;
        self.get(
            &format!("/search/brief-bibs/{oclc_number}/other-editions"),
            params.to_request(),
        )
        .await
    }

    /// Member shared print holdings for a known item
    pub async fn shared_print_holdings_search(
        &self,
        params: &SharedPrintHoldingsSearch,
    ) -> Result<Response> {
        let request = params.to_request()?;
        self.get("/search/bibs-retained-holdings", request).await
    }

    /// Holdings summary and brief bib for a known item
    pub async fn summary_holdings_search(
        &self,
        params: &SummaryHoldingsSearch,
    ) -> Result<Response> {
        let request = params.to_request()?;
        self.get("/search/bibs-summary-holdings", request).await
    }

    /// Holdings summary for an OCLC #
    pub async fn summary_holdings_get(
        &self,
        oclc_number: impl ToOclcNumber,
        filters: &HoldingsFilters,
    ) -> Result<Response> {
        let oclc_number = verify_oclc_number(&oclc_number)?;
        let request = ApiRequest::new()
            .accept(JSON)
            .query("oclcNumber", oclc_number);
        self.get("/search/summary-holdings", filters.apply(request))
            .await
    }
}
