use async_trait::async_trait;
use ln_core::{
    Credentials, Error, NewsSearch, Result, SearchErrorCode, SearchQuery, SearchResponse,
    SearchResultItem,
};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

/// Error body the search API sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NaverNewsClient {
    client: reqwest::Client,
    endpoint: Url,
    credentials: Credentials,
}

impl NaverNewsClient {
    pub fn new(client: reqwest::Client, endpoint: &str, credentials: Credentials) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("invalid search endpoint {}: {}", endpoint, e)))?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn get_news(&self, query: &SearchQuery) -> Result<SearchResponse> {
        debug!(
            query = query.query(),
            display = query.display(),
            start = query.start(),
            sort = query.sort().as_str(),
            "searching news"
        );

        let response = self
            .client
            .get(self.endpoint.clone())
            .header(CLIENT_ID_HEADER, &self.credentials.client_id)
            .header(CLIENT_SECRET_HEADER, &self.credentials.client_secret)
            .query(&query.to_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = upstream_error(status, &body);
            warn!(status = status.as_u16(), error = %err, "news search rejected");
            return Err(err);
        }

        let parsed: SearchResponse = response.json().await?;
        info!(
            query = query.query(),
            items = parsed.items.len(),
            total = parsed.total.unwrap_or_default(),
            "news search completed"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl NewsSearch for NaverNewsClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>> {
        Ok(self.get_news(query).await?.items)
    }
}

fn upstream_error(status: StatusCode, body: &str) -> Error {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|b| b.error_code.clone())
        .map(SearchErrorCode::from);
    let message = parsed
        .and_then(|b| b.error_message)
        .or_else(|| code.as_ref().map(|c| c.description().to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    Error::UpstreamSearch {
        status: status.as_u16(),
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn credentials() -> Credentials {
        Credentials {
            client_id: "test-id".to_string(),
            client_secret: "test-secret".to_string(),
        }
    }

    fn client_for(server: &MockServer) -> NaverNewsClient {
        NaverNewsClient::new(
            reqwest::Client::new(),
            &server.url("/v1/search/news.json"),
            credentials(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_credentials_and_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/search/news.json")
                    .header("x-naver-client-id", "test-id")
                    .header("x-naver-client-secret", "test-secret")
                    .query_param("query", "Samsung")
                    .query_param("display", "5")
                    .query_param("start", "1")
                    .query_param("sort", "date");
                then.status(200).json_body(json!({
                    "lastBuildDate": "Mon, 07 Oct 2024 10:00:00 +0900",
                    "total": 2,
                    "start": 1,
                    "display": 2,
                    "items": [
                        {"title": "<b>Samsung</b> one", "link": "https://news.example/1",
                         "originallink": "https://orig.example/1", "description": "", "pubDate": "Mon, 07 Oct 2024 09:00:00 +0900"},
                        {"title": "two", "link": "https://news.example/2"}
                    ]
                }));
            })
            .await;

        let client = client_for(&server);
        let items = client
            .search(&SearchQuery::recent("Samsung", 5).unwrap())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "<b>Samsung</b> one");
        assert_eq!(items[1].link, "https://news.example/2");
    }

    #[tokio::test]
    async fn test_error_code_is_surfaced() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/search/news.json");
                then.status(400).json_body(json!({
                    "errorMessage": "Invalid display value (부적절한 display 값입니다.)",
                    "errorCode": "SE02"
                }));
            })
            .await;

        let err = client_for(&server)
            .search(&SearchQuery::recent("Samsung", 5).unwrap())
            .await
            .unwrap_err();

        match err {
            Error::UpstreamSearch {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, Some(SearchErrorCode::InvalidDisplay));
                assert!(message.starts_with("Invalid display value"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_still_reports_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/search/news.json");
                then.status(500).body("<html>oops</html>");
            })
            .await;

        let err = client_for(&server)
            .search(&SearchQuery::recent("Samsung", 5).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::UpstreamSearch { status: 500, code: None, .. }
        ));
    }

    #[test]
    fn test_message_falls_back_to_code_description() {
        let err = upstream_error(StatusCode::NOT_FOUND, r#"{"errorCode": "SE05"}"#);
        match err {
            Error::UpstreamSearch { code, message, .. } => {
                assert_eq!(code, Some(SearchErrorCode::UnknownApi));
                assert_eq!(message, "search api does not exist");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let err = NaverNewsClient::new(reqwest::Client::new(), "not a url", credentials()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
