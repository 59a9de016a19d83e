use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zotbridge::enrichment::{CrossrefLookup, LookupError, MetadataLookup};
use zotbridge::mapping::FieldMapper;

fn crossref(server: &MockServer) -> CrossrefLookup {
    CrossrefLookup::new(
        server.uri(),
        Some("librarian@example.org".to_string()),
        "zotbridge-test",
        Duration::from_secs(5),
    )
    .unwrap()
}

fn work_response() -> serde_json::Value {
    json!({
        "status": "ok",
        "message-type": "work",
        "message": {
            "title": ["On Computable Numbers, with an Application to the Entscheidungsproblem"],
            "author": [{"given": "Alan", "family": "Turing"}],
            "container-title": ["Proceedings of the London Mathematical Society"],
            "volume": "s2-42",
            "issue": "1",
            "page": "230-265",
            "publisher": "Wiley",
            "DOI": "10.1112/plms/s2-42.1.230",
            "type": "journal-article",
            "issued": {"date-parts": [[1937]]}
        }
    })
}

#[tokio::test]
async fn test_crossref_lookup_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/works/10\.1112"))
        .and(query_param("mailto", "librarian@example.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_response()))
        .expect(1)
        .mount(&server)
        .await;

    let fields = crossref(&server)
        .lookup("10.1112/plms/s2-42.1.230")
        .await
        .unwrap();

    assert_eq!(fields["author"], "Turing, Alan");
    assert_eq!(fields["journal"], "Proceedings of the London Mathematical Society");
    assert_eq!(fields["pages"], "230-265");
    assert_eq!(fields["year"], 1937);
    assert!(!fields.contains_key("month"));
}

#[tokio::test]
async fn test_crossref_lookup_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = crossref(&server).lookup("10.0000/unknown").await;

    assert!(matches!(result, Err(LookupError::NotFound(_))));
}

#[tokio::test]
async fn test_crossref_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = crossref(&server).lookup("10.1000/xyz").await;

    assert!(matches!(result, Err(LookupError::Status(500))));
}

#[tokio::test]
async fn test_mapper_enriches_record_from_crossref() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_response()))
        .mount(&server)
        .await;

    let lookup: Arc<dyn MetadataLookup> = Arc::new(crossref(&server));
    let mapper = FieldMapper::new(Some(lookup));

    let fields = json!({
        "title": "on computable numbers",
        "DOI": "10.1112/plms/s2-42.1.230",
        "tags": ["logic"]
    });
    let record = mapper.map(fields.as_object().unwrap().clone()).await;

    // The captured title is kept over the looked-up one
    assert_eq!(record.get_str("title"), Some("on computable numbers"));
    assert_eq!(record.get_str("author"), Some("Turing, Alan"));
    assert_eq!(record.get_str("publisher"), Some("Wiley"));
    assert_eq!(record.get_str("tags"), Some("logic"));
}

#[tokio::test]
async fn test_mapper_keeps_record_when_lookup_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let lookup: Arc<dyn MetadataLookup> = Arc::new(crossref(&server));
    let mapper = FieldMapper::new(Some(lookup));

    let fields = json!({"title": "Kept", "DOI": "10.0000/unknown"});
    let record = mapper.map(fields.as_object().unwrap().clone()).await;

    assert_eq!(record.get_str("title"), Some("Kept"));
    assert_eq!(record.get_str("doi"), Some("10.0000/unknown"));
}
