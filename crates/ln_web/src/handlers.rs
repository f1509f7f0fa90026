use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use ln_core::ArticleRecord;
use ln_scrappers::DEFAULT_RECENT_COUNT;

use crate::error::AppError;
use crate::AppState;

pub async fn last_news(
    State(state): State<Arc<AppState>>,
    Path(stock): Path<String>,
) -> Result<Json<Vec<ArticleRecord>>, AppError> {
    tracing::info!(%stock, "last news requested");
    let records = state
        .aggregator
        .recent_news(&stock, DEFAULT_RECENT_COUNT)
        .await?;
    Ok(Json(records))
}
