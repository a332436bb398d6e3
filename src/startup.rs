use crate::config::Config;
use crate::db::{self, DbPool};
use crate::sse::{SseSender, create_sse_broadcaster};
use crate::tally::{PgTallySource, TallySource};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn TallySource>,
    pub sse_tx: SseSender,
}

impl AppState {
    pub fn new(source: Arc<dyn TallySource>) -> Self {
        AppState {
            source,
            sse_tx: create_sse_broadcaster(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let pool: DbPool = db::init_pool(config);
        info!(
            "vote store at {}:{}/{} (connected on first read)",
            config.db_host, config.db_port, config.db_name
        );
        Self::new(Arc::new(PgTallySource::new(pool)))
    }
}
