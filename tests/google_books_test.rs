use serde_json::json;
use shelfmark::domain::{CatalogLookup, DomainError};
use shelfmark::google_books::GoogleBooksClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dune() -> serde_json::Value {
    json!({
        "id": "B1hSG45JCX4C",
        "volumeInfo": {
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "publishedDate": "1965",
            "pageCount": 412,
            "categories": ["Fiction"],
            "imageLinks": { "thumbnail": "http://books.example/dune.jpg" },
            "language": "en"
        }
    })
}

#[tokio::test]
async fn test_search_normalizes_volumes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/volumes"))
        .and(query_param("q", "dune"))
        .and(query_param("maxResults", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalItems": 2,
            "items": [dune(), { "id": "bare" }]
        })))
        .mount(&mock_server)
        .await;

    let client = GoogleBooksClient::new(&mock_server.uri(), None);
    let drafts = client.search("dune", 5).await;

    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].google_books_id, "B1hSG45JCX4C");
    assert_eq!(drafts[0].authors, vec!["Frank Herbert".to_string()]);
    assert_eq!(drafts[0].thumbnail_url, "http://books.example/dune.jpg");
    assert_eq!(drafts[1].title, "");
}

#[tokio::test]
async fn test_search_clamps_and_sends_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/volumes"))
        .and(query_param("maxResults", "40"))
        .and(query_param("key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalItems": 0 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GoogleBooksClient::new(&mock_server.uri(), Some("secret-key".to_string()));
    let drafts = client.search("anything", 500).await;

    assert!(drafts.is_empty());
}

#[tokio::test]
async fn test_search_degrades_to_empty_on_upstream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/volumes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = GoogleBooksClient::new(&mock_server.uri(), None);
    assert!(client.search("dune", 10).await.is_empty());

    // Unreachable host behaves the same
    let offline = GoogleBooksClient::new("http://127.0.0.1:9", None);
    assert!(offline.search("dune", 10).await.is_empty());
}

#[tokio::test]
async fn test_fetch_single_volume() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/volumes/B1hSG45JCX4C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dune()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/volumes/unknown"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/volumes/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = GoogleBooksClient::new(&mock_server.uri(), None);

    let draft = client.fetch("B1hSG45JCX4C").await.expect("volume");
    assert_eq!(draft.title, "Dune");
    assert_eq!(draft.page_count, Some(412));

    assert!(matches!(
        client.fetch("unknown").await,
        Err(DomainError::NotFound)
    ));
    assert!(matches!(
        client.fetch("flaky").await,
        Err(DomainError::External(_))
    ));
}

#[tokio::test]
async fn test_fetch_sends_id_as_one_path_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/volumes/real"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "real",
            "volumeInfo": { "title": "Real" }
        })))
        .mount(&mock_server)
        .await;

    let client = GoogleBooksClient::new(&mock_server.uri(), None);

    assert_eq!(client.fetch("real").await.expect("volume").title, "Real");
    for id in ["real?x=1", "zzz/../real", "real#frag"] {
        assert!(
            matches!(client.fetch(id).await, Err(DomainError::NotFound)),
            "id {:?}",
            id
        );
    }
}
