//! HTTP client tests against a local mock server.

use registry_client::{
    ClientError, HttpQualityClient, HttpRegistryClient, HttpSearchClient, PackageId,
    QualityService, RegistryService, SearchService, ServiceEndpoints,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoints(server: &MockServer) -> ServiceEndpoints {
    ServiceEndpoints::default()
        .with_search_url(&format!("{}/v2/search", server.uri()))
        .with_registry_url(&format!("{}/", server.uri()))
        .with_quality_url(&format!("{}/api/v2/autocomplete_data", server.uri()))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_query_size_and_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/search"))
        .and(query_param("q", "ember"))
        .and(query_param("size", "250"))
        .and(query_param("from", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "results": [
                { "package": { "name": "ember-a", "date": "2026-10-01T00:00:00.000Z" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSearchClient::new(&endpoints(&server)).unwrap();
    let page = client.search_page(500, 250).await.unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].package.name, "ember-a");
}

#[tokio::test]
async fn search_non_success_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = HttpSearchClient::new(&endpoints(&server)).unwrap();
    let err = client.search_page(0, 250).await.unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 502, .. }));
}

#[tokio::test]
async fn search_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = HttpSearchClient::new(&endpoints(&server)).unwrap();
    let err = client.search_page(0, 250).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registry_fetches_scoped_name_as_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@ember%2Ftest-helpers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "@ember/test-helpers",
            "description": "Helpers for testing",
            "versions": { "3.0.0": {} },
            "readme": "long",
            "time": { "modified": "2026-10-10T12:00:00.000Z" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpRegistryClient::new(&endpoints(&server)).unwrap();
    let detail = client
        .package(&PackageId::new("@ember/test-helpers").unwrap())
        .await
        .unwrap();

    assert_eq!(detail.name, "@ember/test-helpers");
    assert_eq!(detail.fields["description"], "Helpers for testing");
    assert!(!detail.fields.contains_key("versions"));
    assert!(!detail.fields.contains_key("readme"));
}

#[tokio::test]
async fn registry_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ember-gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Not found" })))
        .mount(&server)
        .await;

    let client = HttpRegistryClient::new(&endpoints(&server)).unwrap();
    let err = client
        .package(&PackageId::new("ember-gone").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound(name) if name == "ember-gone"));
}

#[tokio::test]
async fn registry_document_without_modified_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ember-odd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "ember-odd" })))
        .mount(&server)
        .await;

    let client = HttpRegistryClient::new(&endpoints(&server)).unwrap();
    let err = client
        .package(&PackageId::new("ember-odd").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
}

// ---------------------------------------------------------------------------
// Quality data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quality_returns_all_addons() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/autocomplete_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "addons": [
                { "name": "ember-a", "score": 8, "is_wip": false },
                { "name": "ember-b", "score": null, "is_wip": true }
            ]
        })))
        .mount(&server)
        .await;

    let client = HttpQualityClient::new(&endpoints(&server)).unwrap();
    let records = client.fetch_all().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].score, Some(8.0));
    assert_eq!(records[1].is_wip, Some(true));
}

#[tokio::test]
async fn quality_failure_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/autocomplete_data"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpQualityClient::new(&endpoints(&server)).unwrap();
    let err = client.fetch_all().await.unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 500, .. }));
}
