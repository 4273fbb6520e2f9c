pub mod executor;
pub mod extract;
pub mod registry;
pub mod save_results;
pub mod schema;
pub mod search;
pub mod web_search;

use std::sync::Arc;

use crate::config::{AppConfig, Credentials};
use crate::extract::ContentExtractor;
use crate::search::{provider_from_config, web_search_provider, SearchAccumulator};

pub use executor::ToolExecutor;
pub use extract::{ExtractContentTool, ExtractContentsTool};
pub use registry::{Tool, ToolContext, ToolRegistry};
pub use save_results::SaveSearchResultsTool;
pub use search::{AccumulatingSearchTool, ClearSearchStateTool};
pub use web_search::WebSearchTool;

/// 参数解析失败的错误前缀（ToolExecutor 据此区分 InvalidArguments）
pub const INVALID_ARGS_PREFIX: &str = "Invalid arguments: ";

/// 按配置与凭证注册全部研究工具；凭证缺失的服务在此处一次性替换为 Mock
pub fn default_registry(cfg: &AppConfig, credentials: &Credentials) -> ToolRegistry {
    let extractor = Arc::new(ContentExtractor::new(&cfg.tools.extract));
    let accumulator = Arc::new(SearchAccumulator::new(
        provider_from_config(&cfg.tools.search, credentials),
        &cfg.tools.search,
    ));

    let mut tools = ToolRegistry::new();
    tools.register(ExtractContentTool::new(extractor.clone()));
    tools.register(ExtractContentsTool::new(extractor));
    tools.register(AccumulatingSearchTool::new(accumulator.clone()));
    tools.register(ClearSearchStateTool::new(accumulator));
    tools.register(WebSearchTool::new(web_search_provider(&cfg.tools.search, credentials)));
    tools.register(SaveSearchResultsTool);
    tools
}
