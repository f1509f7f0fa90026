use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::AppError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/last-news/:stock", get(handlers::last_news))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Serve the app on an already bound listener until the process stops.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> ln_core::Result<()> {
    let app = create_app(state);
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::AppState;
    pub use ln_core::{ArticleRecord, Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use ln_core::{
        ArticleFetcher, Error, NewsSearch, NoDelay, Result, SearchErrorCode, SearchQuery,
        SearchResultItem,
    };
    use ln_scrappers::NewsAggregator;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct FakeSearch {
        fail: bool,
        queries: Mutex<Vec<SearchQuery>>,
    }

    #[async_trait]
    impl NewsSearch for FakeSearch {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(Error::UpstreamSearch {
                    status: 400,
                    code: Some(SearchErrorCode::InvalidQuery),
                    message: "Incorrect query request".to_string(),
                });
            }
            Ok((1..=2)
                .map(|n| SearchResultItem {
                    title: format!("<b>{}</b> headline {}", query.query(), n),
                    link: format!("https://news.example/{}", n),
                    original_link: None,
                    description: None,
                    pub_date: None,
                })
                .collect())
        }
    }

    struct EchoFetcher;

    #[async_trait]
    impl ArticleFetcher for EchoFetcher {
        async fn fetch_and_clean(&self, url: &str) -> Result<String> {
            Ok(format!("body of {}", url))
        }
    }

    struct BrokenFetcher;

    #[async_trait]
    impl ArticleFetcher for BrokenFetcher {
        async fn fetch_and_clean(&self, url: &str) -> Result<String> {
            Err(Error::Fetch {
                url: url.to_string(),
                reason: "HTTP 502 Bad Gateway".to_string(),
            })
        }
    }

    fn app(search: Arc<FakeSearch>) -> Router {
        let aggregator = NewsAggregator::new(search, Arc::new(EchoFetcher), Arc::new(NoDelay));
        create_app(AppState {
            aggregator: Arc::new(aggregator),
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_last_news_returns_records() {
        let search = Arc::new(FakeSearch::default());
        let (status, body) = get(app(search.clone()), "/last-news/Samsung").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"title": "Samsung headline 1", "link": "https://news.example/1", "content": "body of https://news.example/1"},
                {"title": "Samsung headline 2", "link": "https://news.example/2", "content": "body of https://news.example/2"}
            ])
        );

        let queries = search.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].display(), 5);
    }

    #[tokio::test]
    async fn test_percent_encoded_stock_is_decoded() {
        let search = Arc::new(FakeSearch::default());
        let (status, _) = get(app(search.clone()), "/last-news/%EC%82%BC%EC%84%B1%EC%A0%84%EC%9E%90").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(search.queries.lock().unwrap()[0].query(), "삼성전자");
    }

    #[tokio::test]
    async fn test_failures_are_generic_server_errors() {
        let search = Arc::new(FakeSearch {
            fail: true,
            ..FakeSearch::default()
        });
        let (status, body) = get(app(search), "/last-news/Samsung").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"Internal Server Error");
    }

    #[tokio::test]
    async fn test_article_fetch_failure_is_generic_server_error() {
        let aggregator = NewsAggregator::new(
            Arc::new(FakeSearch::default()),
            Arc::new(BrokenFetcher),
            Arc::new(NoDelay),
        );
        let app = create_app(AppState {
            aggregator: Arc::new(aggregator),
        });
        let (status, body) = get(app, "/last-news/Samsung").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"Internal Server Error");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get(app(Arc::new(FakeSearch::default())), "/news/Samsung").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
