use parking_lot::Mutex;

use crate::config::AppConfig;
use crate::search::{RagEngine, SearchError};
use crate::store::Store;

/// Shared application state / 应用共享状态
pub struct AppState {
    pub config: AppConfig,
    /// Single writer: each store call, cascade included, runs under this lock / 单写者锁
    pub store: Mutex<Store>,
    pub rag: RagEngine,
}

impl AppState {
    /// Load the snapshots and build the search engine / 加载快照并创建检索引擎
    pub fn new(config: AppConfig) -> Result<Self, SearchError> {
        let store = Store::load(&config.storage);
        let rag = RagEngine::from_config(&config.search)?;
        Ok(Self {
            config,
            store: Mutex::new(store),
            rag,
        })
    }
}
