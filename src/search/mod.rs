//! 搜索：服务抽象（Tavily / Google / Mock）与有界多轮累积

pub mod accumulator;
pub mod google;
pub mod mock;
pub mod provider;
pub mod tavily;
pub mod types;

pub use accumulator::{SearchAccumulator, SearchOutcome, SessionSearchState};
pub use google::GoogleProvider;
pub use mock::MockProvider;
pub use provider::{provider_from_config, web_search_provider, SearchProvider};
pub use tavily::TavilyProvider;
pub use types::{SearchRequest, SearchResponse, SearchResultItem, SearchRound};
