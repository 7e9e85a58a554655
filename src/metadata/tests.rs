//! Tests for the metadata endpoints

use super::*;
use crate::auth::Credentials;
use crate::types::{
    BriefBibsOrderBy, DistanceUnit, LibraryType, LocalHoldingsOrderBy, OtherEditionsOrderBy,
    RecordFormat, ValidationLevel,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MARCXML: &str = "<record><controlfield tag=\"001\">12345</controlfield></record>";

async fn metadata_session(server: &MockServer) -> MetadataSession {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tk_meta",
            "token_type": "bearer",
            "expires_in": 1199
        })))
        .mount(server)
        .await;

    let credentials = Credentials::new("my-key", "my-secret", "WorldCatMetadataAPI").unwrap();
    let manager = TokenManager::builder(credentials)
        .oauth_server(server.uri())
        .build()
        .unwrap();
    let config = SessionConfig::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    MetadataSession::open(manager, config).await.unwrap()
}

async fn api_requests(server: &MockServer) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() != "/token")
        .collect()
}

fn pairs(request: &ApiRequest) -> Vec<(&str, &str)> {
    request
        .query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

// ============================================================================
// Argument validation
// ============================================================================

#[test]
fn test_record_body_rejects_blank() {
    assert!(record_body("").is_err());
    assert!(record_body(" \n\t").is_err());
    assert!(record_body(Vec::<u8>::new()).is_err());
    assert_eq!(record_body("<record/>").unwrap(), b"<record/>".to_vec());
}

#[test]
fn test_control_number() {
    assert_eq!(control_number(" 12345 ").unwrap(), "12345");
    assert_eq!(control_number(987_u64).unwrap(), "987");
    assert!(control_number("").is_err());
    assert!(control_number("12/34").is_err());
    assert!(control_number("12?x=1").is_err());
}

#[test]
fn test_brief_bibs_search_requires_q() {
    let err = BriefBibsSearch::default().to_request().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { ref argument, .. } if argument == "q"));
    assert!(BriefBibsSearch::new("   ").to_request().is_err());
}

#[test]
fn test_brief_bibs_search_query() {
    let params = BriefBibsSearch {
        item_type: vec!["book".into(), "vis".into()],
        open_access: Some(false),
        lat: Some(37.5),
        unit: Some(DistanceUnit::Kilometers),
        limit: Some(50),
        ..BriefBibsSearch::new("ti:zendegi AND au:greg egan")
    };
    let request = params.to_request().unwrap();

    assert_eq!(
        pairs(&request),
        vec![
            ("q", "ti:zendegi AND au:greg egan"),
            ("itemType", "book"),
            ("itemType", "vis"),
            ("openAccess", "false"),
            ("lat", "37.5"),
            ("unit", "K"),
            ("orderBy", "mostWidelyHeld"),
            ("limit", "50"),
        ]
    );

    let request = BriefBibsSearch {
        order_by: BriefBibsOrderBy::PublicationDateDesc,
        ..BriefBibsSearch::new("kw:egan")
    }
    .to_request()
    .unwrap();
    assert_eq!(request.query_value("orderBy"), Some("publicationDateDesc"));
}

#[test]
fn test_other_editions_query_omits_unset_options() {
    let request = OtherEditionsSearch::default().to_request();
    assert!(request.query.is_empty());

    let request = OtherEditionsSearch {
        in_language: vec!["eng".into()],
        order_by: Some(OtherEditionsOrderBy::DateDesc),
        ..OtherEditionsSearch::default()
    }
    .to_request();
    assert_eq!(
        pairs(&request),
        vec![("inLanguage", "eng"), ("orderBy", "-date")]
    );
}

#[test]
fn test_local_holdings_browse_requires_locations() {
    let err = LocalHoldingsBrowse::new("", "JUVENILE").to_request().unwrap_err();
    assert!(
        matches!(err, Error::InvalidArgument { ref argument, .. } if argument == "holding_location")
    );

    let err = LocalHoldingsBrowse::new("EAST", " ").to_request().unwrap_err();
    assert!(
        matches!(err, Error::InvalidArgument { ref argument, .. } if argument == "shelving_location")
    );

    let request = LocalHoldingsBrowse {
        oclc_number: Some("ocn000123".into()),
        ..LocalHoldingsBrowse::new("EAST", "JUVENILE")
    }
    .to_request()
    .unwrap();
    assert_eq!(
        pairs(&request),
        vec![
            ("oclcNumber", "123"),
            ("holdingLocation", "EAST"),
            ("shelvingLocation", "JUVENILE"),
        ]
    );
}

#[test]
fn test_local_searches_normalize_oclc_number() {
    let request = LocalHoldingsSearch {
        oclc_number: Some("on1234567890".into()),
        order_by: Some(LocalHoldingsOrderBy::Location),
        ..LocalHoldingsSearch::default()
    }
    .to_request()
    .unwrap();
    assert_eq!(
        pairs(&request),
        vec![("oclcNumber", "1234567890"), ("orderBy", "location")]
    );

    let err = SharedPrintLocalHoldingsSearch {
        oclc_number: Some("bogus".into()),
        ..SharedPrintLocalHoldingsSearch::default()
    }
    .to_request()
    .unwrap_err();
    assert!(matches!(err, Error::InvalidOclcNumber { .. }));

    assert!(LocalBibsSearch::new("").to_request().is_err());
}

#[test]
fn test_known_item_searches_require_an_identifier() {
    assert!(matches!(
        SummaryHoldingsSearch::default().to_request(),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(SharedPrintHoldingsSearch {
        isbn: Some(" ".into()),
        ..SharedPrintHoldingsSearch::default()
    }
    .to_request()
    .is_err());

    let request = SharedPrintHoldingsSearch {
        issn: Some("0099-1234".into()),
        held_in_state: Some("NY".into()),
        ..SharedPrintHoldingsSearch::default()
    }
    .to_request()
    .unwrap();
    assert_eq!(
        pairs(&request),
        vec![("issn", "0099-1234"), ("heldInState", "NY")]
    );

    let request = SummaryHoldingsSearch {
        oclc_number: Some("ocm00012345".into()),
        filters: HoldingsFilters {
            holdings_all_editions: Some(true),
            held_by_library_type: vec![LibraryType::Public, LibraryType::All],
            ..HoldingsFilters::default()
        },
        ..SummaryHoldingsSearch::default()
    }
    .to_request()
    .unwrap();
    assert_eq!(
        pairs(&request),
        vec![
            ("oclcNumber", "12345"),
            ("holdingsAllEditions", "true"),
            ("heldByLibraryType", "PUBLIC"),
            ("heldByLibraryType", "ALL"),
        ]
    );
}

#[tokio::test]
async fn test_invalid_arguments_fail_before_any_request() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    assert!(matches!(
        session.bib_get("ocm-bogus", RecordFormat::MarcXml).await,
        Err(Error::InvalidOclcNumber { .. })
    ));
    assert!(session.holdings_set(0).await.is_err());
    assert!(session.holdings_get_current("").await.is_err());
    assert!(session
        .bib_create("", RecordFormat::MarcXml, RecordFormat::MarcXml)
        .await
        .is_err());
    assert!(session.lbd_get("", RecordFormat::MarcXml).await.is_err());
    assert!(session
        .local_holdings_browse(&LocalHoldingsBrowse::default())
        .await
        .is_err());

    assert!(api_requests(&mock_server).await.is_empty());
}

// ============================================================================
// Bibliographic records
// ============================================================================

#[tokio::test]
async fn test_bib_get() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/manage/bibs/12345"))
        .and(header("Accept", "application/marc"))
        .and(header("Authorization", "Bearer tk_meta"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"00000nam".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = session
        .bib_get("ocm00012345", RecordFormat::Marc21)
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_bib_create_sends_record() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/manage/bibs"))
        .and(header("Content-Type", "application/marcxml+xml"))
        .and(header("Accept", "application/marcxml+xml"))
        .and(body_string(MARCXML))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = session
        .bib_create(MARCXML, RecordFormat::MarcXml, RecordFormat::MarcXml)
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_bib_replace_match_and_validate() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("PUT"))
        .and(path("/manage/bibs/12345"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/manage/bibs/match"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/manage/bibs/validate/validateAdd"))
        .and(header("Content-Type", "application/marc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    session
        .bib_replace(12345, MARCXML, RecordFormat::MarcXml, RecordFormat::MarcXml)
        .await
        .unwrap();
    session
        .bib_match(MARCXML, RecordFormat::MarcXml)
        .await
        .unwrap();
    session
        .bib_validate(b"00000nam".to_vec(), RecordFormat::Marc21, ValidationLevel::ValidateAdd)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bib_get_current_oclc_number_joins_numbers() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/manage/bibs/current"))
        .and(query_param("oclcNumbers", "12345,67890"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    session
        .bib_get_current_oclc_number(["ocm00012345", "ocn67890"])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_classification_and_brief_bibs() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/search/classification-bibs/41266045"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/brief-bibs/41266045"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/brief-bibs/41266045/other-editions"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/brief-bibs"))
        .and(query_param("q", "ti:Zendegi"))
        .and(query_param("orderBy", "mostWidelyHeld"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    session.bib_get_classification(41266045).await.unwrap();
    session.brief_bibs_get("41266045").await.unwrap();
    let other = OtherEditionsSearch {
        limit: Some(5),
        ..OtherEditionsSearch::default()
    };
    session
        .brief_bibs_search_other_editions(41266045_u64, &other)
        .await
        .unwrap();
    session
        .brief_bibs_search(&BriefBibsSearch::new("ti:Zendegi"))
        .await
        .unwrap();
}

// ============================================================================
// Holdings
// ============================================================================

#[tokio::test]
async fn test_holdings_get_current_batches_by_ten() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/manage/institution/holdings/current"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let numbers: Vec<u64> = (1..=12).collect();
    let responses = session.holdings_get_current(numbers).await.unwrap();
    assert_eq!(responses.len(), 2);

    let received = api_requests(&mock_server).await;
    let batches: Vec<String> = received
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "oclcNumbers")
                .map(|(_, v)| v.into_owned())
                .unwrap()
        })
        .collect();
    assert_eq!(batches, vec!["1,2,3,4,5,6,7,8,9,10", "11,12"]);
}

#[tokio::test]
async fn test_holdings_set_and_codes() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/manage/institution/holdings/12345/set"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/manage/institution/holding-codes"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/manage/institution/holdings/set"))
        .and(body_string(MARCXML))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    session.holdings_set("ocm00012345").await.unwrap();
    session.holdings_get_codes().await.unwrap();
    session
        .holdings_set_on_bib(MARCXML, RecordFormat::MarcXml)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_holdings_unset_sends_cascade_delete_explicitly() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/manage/institution/holdings/12345/unset"))
        .and(query_param("cascadeDelete", "true"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/manage/institution/holdings/12345/unset"))
        .and(query_param("cascadeDelete", "false"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/manage/institution/holdings/unset"))
        .and(query_param("cascadeDelete", "true"))
        .and(header("Content-Type", "application/marcxml+xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    session
        .holdings_unset(12345, MetadataSession::DEFAULT_CASCADE_DELETE)
        .await
        .unwrap();
    session.holdings_unset(12345, false).await.unwrap();
    session
        .holdings_unset_on_bib(
            MARCXML,
            RecordFormat::MarcXml,
            MetadataSession::DEFAULT_CASCADE_DELETE,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_holdings_conflict_is_returned_to_caller() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/manage/institution/holdings/12345/set"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "type": "CONFLICT",
            "title": "Holding already set"
        })))
        .mount(&mock_server)
        .await;

    let response = session.holdings_set(12345).await.unwrap();
    assert_eq!(response.status(), 409);
}

// ============================================================================
// Local records
// ============================================================================

#[tokio::test]
async fn test_local_bib_data_crud() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/manage/lbds"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/manage/lbds/200"))
        .and(header("Accept", "application/marcxml+xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/manage/lbds/200"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/manage/lbds/200"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let xml = RecordFormat::MarcXml;
    session.lbd_create(MARCXML, xml, xml).await.unwrap();
    session.lbd_get(200, xml).await.unwrap();
    session.lbd_replace("200", MARCXML, xml, xml).await.unwrap();
    session.lbd_delete(200, xml).await.unwrap();
}

#[tokio::test]
async fn test_local_holdings_crud() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/manage/lhrs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/manage/lhrs/300"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/manage/lhrs/300"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/manage/lhrs/300"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let xml = RecordFormat::MarcXml;
    session.lhr_create(MARCXML, xml, xml).await.unwrap();
    session.lhr_get("300", xml).await.unwrap();
    session.lhr_replace(300, MARCXML, xml, xml).await.unwrap();
    session.lhr_delete(300, xml).await.unwrap();
}

#[tokio::test]
async fn test_local_searches() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    for endpoint in [
        "/search/my-local-bib-data/200",
        "/search/my-local-bib-data",
        "/search/my-holdings/300",
        "/search/my-holdings",
        "/browse/my-holdings",
        "/search/retained-holdings",
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    session.local_bibs_get(200).await.unwrap();
    session
        .local_bibs_search(&LocalBibsSearch::new("ti:permutation"))
        .await
        .unwrap();
    session.local_holdings_get(300).await.unwrap();
    session
        .local_holdings_search(&LocalHoldingsSearch {
            barcode: Some("33333".into()),
            ..LocalHoldingsSearch::default()
        })
        .await
        .unwrap();
    session
        .local_holdings_browse(&LocalHoldingsBrowse::new("EAST", "JUVENILE"))
        .await
        .unwrap();
    session
        .local_holdings_search_shared_print(&SharedPrintLocalHoldingsSearch {
            sp_program: vec!["EAST".into()],
            ..SharedPrintLocalHoldingsSearch::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_summary_and_shared_print_holdings() {
    let mock_server = MockServer::start().await;
    let session = metadata_session(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/search/summary-holdings"))
        .and(query_param("oclcNumber", "12345"))
        .and(query_param("heldInState", "US-NY"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/bibs-summary-holdings"))
        .and(query_param("isbn", "9781680502404"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/bibs-retained-holdings"))
        .and(query_param("oclcNumber", "12345"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filters = HoldingsFilters {
        held_in_state: Some("US-NY".into()),
        ..HoldingsFilters::default()
    };
    session
        .summary_holdings_get("ocm00012345", &filters)
        .await
        .unwrap();
    session
        .summary_holdings_search(&SummaryHoldingsSearch {
            isbn: Some("9781680502404".into()),
            ..SummaryHoldingsSearch::default()
        })
        .await
        .unwrap();
    session
        .shared_print_holdings_search(&SharedPrintHoldingsSearch {
            oclc_number: Some("12345".into()),
            ..SharedPrintHoldingsSearch::default()
        })
        .await
        .unwrap();
}
