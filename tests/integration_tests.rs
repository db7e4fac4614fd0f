//! Integration tests running against mockito servers standing in for the
//! DBLP endpoints, the mirror list and the CrossRef API.

use mockito::Matcher;
use paper_scout::config::DownloadConfig;
use paper_scout::models::SearchMode;
use paper_scout::resolver::MirrorResolver;
use paper_scout::retrieve::{FetchResult, Retriever};
use paper_scout::sources::{CrossRefClient, DblpClient, DblpEndpoints, SourceError};
use paper_scout::utils::HttpClient;

fn endpoints(base: &str) -> DblpEndpoints {
    DblpEndpoints {
        publication: format!("{}/search/publ/api", base),
        author: format!("{}/search/author/api", base),
        venue: format!("{}/search/venue/api", base),
    }
}

const DBLP_FIXTURE: &str = r#"{
    "result": {
        "hits": {
            "hit": [
                {"info": {
                    "title": "A Study of Triangulation",
                    "year": 2020,
                    "venue": "CHI",
                    "doi": "10.1145/1234567.1234568",
                    "authors": {"author": [{"text": "X"}, {"text": "Y"}]}
                }}
            ]
        }
    }
}"#;

#[tokio::test]
async fn search_routes_to_mode_specific_endpoint() {
    let mut server = mockito::Server::new_async().await;

    let publ = server
        .mock("GET", "/search/publ/api")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(DBLP_FIXTURE)
        .create_async()
        .await;
    let author = server
        .mock("GET", "/search/author/api")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"result": {"hits": {}}}"#)
        .create_async()
        .await;

    let client = DblpClient::new(HttpClient::new().unwrap(), endpoints(&server.url()));

    let papers = client
        .search(SearchMode::Publication, "triangulation", 10)
        .await
        .unwrap();
    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].title, "A Study of Triangulation");
    assert_eq!(papers[0].year, "2020");
    assert_eq!(papers[0].authors, vec!["X", "Y"]);
    publ.assert_async().await;

    let none = client
        .search(SearchMode::Author, "someone", 10)
        .await
        .unwrap();
    assert!(none.is_empty());
    author.assert_async().await;
}

#[tokio::test]
async fn search_query_parameters_are_substituted() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/search/publ/api")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "*deep learning".into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
            Matcher::UrlEncoded("h".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"result": {"hits": {}}}"#)
        .create_async()
        .await;

    let client = DblpClient::new(HttpClient::new().unwrap(), endpoints(&server.url()));
    client
        .search(SearchMode::Publication, "deep learning", 5)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn search_surfaces_remote_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search/publ/api")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = DblpClient::new(HttpClient::new().unwrap(), endpoints(&server.url()));
    let err = client
        .search(SearchMode::Publication, "anything", 10)
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Api(_)));
}

#[tokio::test]
async fn search_tolerates_string_result_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search/publ/api")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"result": "Could not parse query"}"#)
        .create_async()
        .await;

    let client = DblpClient::new(HttpClient::new().unwrap(), endpoints(&server.url()));
    let papers = client
        .search(SearchMode::Publication, "anything", 10)
        .await
        .unwrap();

    assert!(papers.is_empty());
}

#[tokio::test]
async fn resolver_falls_back_across_mirrors() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/m1/10.1/x")
        .with_status(503)
        .create_async()
        .await;
    server
        .mock("GET", "/m2/10.1/x")
        .with_status(200)
        .with_body(r#"<html><embed src="//example.com/a.pdf"></html>"#)
        .create_async()
        .await;

    let mirrors = vec![
        format!("{}/m1/", server.url()),
        format!("{}/m2/", server.url()),
    ];
    let resolver = MirrorResolver::new(HttpClient::new().unwrap(), mirrors);

    assert_eq!(
        resolver.resolve("10.1/x").await,
        Some("https://example.com/a.pdf".to_string())
    );
}

#[tokio::test]
async fn resolver_returns_none_when_all_mirrors_fail() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    // One mirror answers with an error status, the other does not exist.
    let mirrors = vec![
        format!("{}/down/", server.url()),
        "http://127.0.0.1:1/gone/".to_string(),
    ];
    let resolver = MirrorResolver::new(HttpClient::new().unwrap(), mirrors);

    assert_eq!(resolver.resolve("10.1/x").await, None);
}

#[tokio::test]
async fn crossref_lookup_returns_registered_title() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/works/10.1/x")
        .with_status(200)
        .with_body(r#"{"message": {"title": ["A Real Title"]}}"#)
        .create_async()
        .await;

    let crossref = CrossRefClient::with_base(HttpClient::new().unwrap(), server.url());
    assert_eq!(crossref.lookup_title("10.1/x").await, "A Real Title");
}

#[tokio::test]
async fn crossref_failure_falls_back_to_safe_doi() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/works/10.1/x")
        .with_status(404)
        .create_async()
        .await;

    let crossref = CrossRefClient::with_base(HttpClient::new().unwrap(), server.url());
    assert_eq!(crossref.lookup_title("10.1/x").await, "10.1_x");
}

/// Batch retrieval over three DOIs where the middle one cannot be
/// resolved: the other two must still be fetched, producing two
/// success-log lines and one failure-log line.
#[tokio::test]
async fn batch_continues_past_unresolvable_doi() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    for doi in ["10.1/a", "10.1/c"] {
        server
            .mock("GET", format!("/mirror/{}", doi).as_str())
            .with_status(200)
            .with_body(format!(
                r#"<html><iframe src="{}/pdf/{}.pdf"></iframe></html>"#,
                base,
                doi.replace('/', "_")
            ))
            .create_async()
            .await;
    }
    server
        .mock("GET", "/mirror/10.1/b")
        .with_status(404)
        .create_async()
        .await;

    server
        .mock("GET", "/works/10.1/a")
        .with_status(200)
        .with_body(r#"{"message": {"title": ["Paper A"]}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/works/10.1/c")
        .with_status(200)
        .with_body(r#"{"message": {"title": ["Paper C"]}}"#)
        .create_async()
        .await;

    server
        .mock("GET", Matcher::Regex(r"^/pdf/.*\.pdf$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body("%PDF-1.4 fake")
        .expect_at_least(2)
        .create_async()
        .await;

    let sandbox = tempfile::tempdir().unwrap();
    let downloads = DownloadConfig {
        dir: sandbox.path().join("papers"),
        success_log: sandbox.path().join("success.log"),
        failed_log: sandbox.path().join("failed.log"),
        delay_min_secs: 0.0,
        delay_max_secs: 0.0,
    };

    let client = HttpClient::new().unwrap();
    let resolver = MirrorResolver::new(client.clone(), vec![format!("{}/mirror/", base)]);
    let crossref = CrossRefClient::with_base(client.clone(), &base);
    let retriever = Retriever::new(resolver, crossref, client, downloads.clone());

    let dois = vec![
        "10.1/a".to_string(),
        "10.1/b".to_string(),
        "10.1/c".to_string(),
    ];
    let report = retriever.fetch_all(&dois).await;

    assert_eq!(report.saved, 2);
    assert_eq!(report.not_found, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.outcomes[1].result, FetchResult::NotFound);

    assert!(downloads.dir.join("Paper A.pdf").is_file());
    assert!(downloads.dir.join("Paper C.pdf").is_file());

    let success = std::fs::read_to_string(&downloads.success_log).unwrap();
    assert_eq!(success.lines().count(), 2);
    assert!(success.contains("10.1/a -> Paper A.pdf"));
    assert!(success.contains("10.1/c -> Paper C.pdf"));

    let failed = std::fs::read_to_string(&downloads.failed_log).unwrap();
    assert_eq!(failed.trim(), "10.1/b");
}

/// A resolved DOI whose download fails is recorded in the failure log and
/// does not stop the run.
#[tokio::test]
async fn batch_records_download_failure() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/mirror/10.1/a")
        .with_status(200)
        .with_body(format!(
            r#"<html><iframe src="{}/pdf/a.pdf"></iframe></html>"#,
            base
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/works/10.1/a")
        .with_status(200)
        .with_body(r#"{"message": {"title": ["Paper A"]}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/pdf/a.pdf")
        .with_status(500)
        .create_async()
        .await;

    let sandbox = tempfile::tempdir().unwrap();
    let downloads = DownloadConfig {
        dir: sandbox.path().join("papers"),
        success_log: sandbox.path().join("success.log"),
        failed_log: sandbox.path().join("failed.log"),
        delay_min_secs: 0.0,
        delay_max_secs: 0.0,
    };

    let client = HttpClient::new().unwrap();
    let resolver = MirrorResolver::new(client.clone(), vec![format!("{}/mirror/", base)]);
    let crossref = CrossRefClient::with_base(client.clone(), &base);
    let retriever = Retriever::new(resolver, crossref, client, downloads.clone());

    let report = retriever.fetch_all(&["10.1/a".to_string()]).await;

    assert_eq!(report.saved, 0);
    assert_eq!(report.failed, 1);
    assert!(matches!(
        report.outcomes[0].result,
        FetchResult::Failed(_)
    ));

    let failed = std::fs::read_to_string(&downloads.failed_log).unwrap();
    assert_eq!(failed.trim(), "10.1/a");
    assert!(!downloads.success_log.exists());
}
