use distmap_core::{mapping_url, DistributionApi, DistributionConfig, FetchError, HttpDistributionApi, MappingRequest};
use httpmock::prelude::*;

#[test]
fn builds_mapping_url_with_file_query() {
    let request = MappingRequest::new("abc123", ["strings.xml", "menu.xml"], "de");
    let url = mapping_url("https://cdn.example.com/", &request).unwrap();
    assert_eq!(url.path(), "/abc123/mapping/de");
    let files: Vec<_> = url
        .query_pairs()
        .filter(|(k, _)| k == "files[]")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(files, vec!["strings.xml", "menu.xml"]);
}

#[test]
fn keeps_base_path_prefix() {
    let request = MappingRequest::new("h", ["string.xml"], "en");
    let url = mapping_url("http://localhost:8080/dist", &request).unwrap();
    assert_eq!(url.path(), "/dist/h/mapping/en");
}

#[test]
fn rejects_non_http_base() {
    let request = MappingRequest::new("h", ["string.xml"], "en");
    let err = mapping_url("ftp://example.com", &request).unwrap_err();
    assert!(matches!(err, FetchError::UnsupportedScheme(_)));
}

#[tokio::test]
async fn get_mapping_file_success() {
    let server = MockServer::start_async().await;
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/hash/mapping/en")
            .query_param("files[]", "string.xml");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body(r#"<resources><string name="a">b</string></resources>"#);
    });

    let config = DistributionConfig::default().with_base_url(server.base_url());
    let api = HttpDistributionApi::new(&config).unwrap();
    let request = MappingRequest::new("hash", ["string.xml"], "en");
    let response = api.get_mapping_file(&request).await.unwrap();

    m.assert();
    assert_eq!(response.status, 200);
    assert!(String::from_utf8_lossy(&response.body).contains("<string name=\"a\">"));
}

#[tokio::test]
async fn error_status_is_not_a_transport_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/hash/mapping/en");
        then.status(403).body("forbidden");
    });

    let config = DistributionConfig::default().with_base_url(server.base_url());
    let api = HttpDistributionApi::new(&config).unwrap();
    let request = MappingRequest::new("hash", ["string.xml"], "en");
    let response = api.get_mapping_file(&request).await.unwrap();
    assert_eq!(response.status, 403);
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let config = DistributionConfig::default().with_base_url("http://127.0.0.1:9");
    let api = HttpDistributionApi::new(&config).unwrap();
    let request = MappingRequest::new("hash", ["string.xml"], "en");
    let err = api.get_mapping_file(&request).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}

#[test]
fn invalid_base_url_fails_construction() {
    let config = DistributionConfig::default().with_base_url("not a url");
    let err = HttpDistributionApi::new(&config).unwrap_err();
    assert!(matches!(err, FetchError::UrlParse(_)));
}
