use std::sync::Arc;

use ln_scrappers::NewsAggregator;

pub struct AppState {
    pub aggregator: Arc<NewsAggregator>,
}
