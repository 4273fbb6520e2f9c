//! 研究会话：一次研究查询的生命周期
//!
//! 会话独占其搜索累积状态（SessionSearchState），并提供 get/set 键值存储供工具写入进度与结果。
//! 搜索状态由 tokio Mutex 保护：同一会话上的并发搜索按顺序执行，保证轮数上限不被突破。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::search::SessionSearchState;

/// 会话键值存储中使用的键
pub mod keys {
    /// 搜索进度（total_searches / remaining_searches / status）
    pub const SEARCH_PROGRESS: &str = "search_progress";
    /// save_search_results 保存的完整检索结果
    pub const SEARCH_RESULTS: &str = "search_results";
}

/// 研究会话
#[derive(Debug)]
pub struct ResearchSession {
    id: String,
    started_at: DateTime<Utc>,
    search: Mutex<SessionSearchState>,
    values: RwLock<HashMap<String, Value>>,
}

impl ResearchSession {
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: Utc::now(),
            search: Mutex::new(SessionSearchState::default()),
            values: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 获取搜索状态的独占访问；持有期间其他调用方等待
    pub async fn search_state(&self) -> MutexGuard<'_, SessionSearchState> {
        self.search.lock().await
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.values.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: impl Into<String>, value: Value) {
        self.values.write().await.insert(key.into(), value);
    }

    pub async fn remove(&self, key: &str) -> Option<Value> {
        self.values.write().await.remove(key)
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for ResearchSession {
    fn default() -> Self {
        Self::new()
    }
}
