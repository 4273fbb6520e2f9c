//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `RESEARCHER__*` 覆盖（双下划线表示嵌套，如 `RESEARCHER__TOOLS__SEARCH__MAX_ROUNDS=5`）。
//! 搜索服务凭证不走配置文件，直接读取进程环境变量（见 [`Credentials::from_env`]）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub tools: ToolsSection,
}

/// [app] 段
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
}

/// [tools] 段：工具超时、正文提取、搜索
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// 单次工具调用超时（秒），由 ToolExecutor 施加
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
    #[serde(default)]
    pub extract: ExtractSection,
    #[serde(default)]
    pub search: SearchSection,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            tool_timeout_secs: default_tool_timeout_secs(),
            extract: ExtractSection::default(),
            search: SearchSection::default(),
        }
    }
}

fn default_tool_timeout_secs() -> u64 {
    30
}

/// [tools.extract] 段：抓取超时、正文最大字符数、User-Agent
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractSection {
    #[serde(default = "default_extract_timeout_secs")]
    pub timeout_secs: u64,
    /// 大于 12000 时按 12000 处理
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_extract_timeout_secs(),
            max_chars: default_max_chars(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_extract_timeout_secs() -> u64 {
    10
}

/// 约 1500-2000 词的文章
fn default_max_chars() -> usize {
    12_000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string()
}

/// 累积搜索使用的后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    #[default]
    Tavily,
    Google,
}

/// [tools.search] 段：后端、每会话轮数上限、每轮结果数、服务地址
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    #[serde(default)]
    pub provider: SearchProviderKind,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_include_raw_content")]
    pub include_raw_content: bool,
    #[serde(default = "default_tavily_base_url")]
    pub tavily_base_url: String,
    #[serde(default = "default_google_base_url")]
    pub google_base_url: String,
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            provider: SearchProviderKind::default(),
            max_rounds: default_max_rounds(),
            max_results: default_max_results(),
            include_raw_content: default_include_raw_content(),
            tavily_base_url: default_tavily_base_url(),
            google_base_url: default_google_base_url(),
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

fn default_max_rounds() -> usize {
    3
}

fn default_max_results() -> usize {
    2
}

fn default_include_raw_content() -> bool {
    true
}

fn default_tavily_base_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_google_base_url() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_search_timeout_secs() -> u64 {
    30
}

/// 搜索服务凭证；空字符串视为未配置（触发 Mock 模式，而非启动失败）
#[derive(Clone, Default)]
pub struct Credentials {
    pub tavily_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cx: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            tavily_api_key: non_empty_env("TAVILY_API_KEY"),
            google_api_key: non_empty_env("GOOGLE_API_KEY"),
            google_cx: non_empty_env("GOOGLE_CX"),
        }
    }

    /// Google 需要 key 与 cx 同时存在
    pub fn google(&self) -> Option<(String, String)> {
        match (&self.google_api_key, &self.google_cx) {
            (Some(key), Some(cx)) => Some((key.clone(), cx.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("tavily_api_key", &self.tavily_api_key.as_ref().map(|_| "***"))
            .field("google_api_key", &self.google_api_key.as_ref().map(|_| "***"))
            .field("google_cx", &self.google_cx)
            .finish()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 从 config 目录加载配置，环境变量 RESEARCHER__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 RESEARCHER__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("RESEARCHER")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
