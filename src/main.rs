//! Researcher - 研究助理工具集
//!
//! 入口：初始化日志、加载配置与凭证、注册工具，按子命令驱动工具调用：
//! - `researcher extract <url>...`：逐个提取网页正文
//! - `researcher search <query>...`：在同一会话中依次搜索，直至达到轮数上限
//! - `researcher tools`：输出已注册工具的 schema

use std::sync::Arc;

use anyhow::{bail, Context};
use researcher::{
    config::{load_config, Credentials},
    core::ResearchSession,
    observability,
    tools::{default_registry, ToolContext, ToolExecutor},
};
use serde_json::json;

const USAGE: &str = "usage: researcher <extract <url>... | search <query>... | tools>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().context(USAGE)?;
    let rest: Vec<String> = args.collect();

    let cfg = load_config(None).context("Failed to load config")?;
    let credentials = Credentials::from_env();
    tracing::debug!(?credentials, "credentials loaded");

    let registry = default_registry(&cfg, &credentials);
    let executor = ToolExecutor::new(registry, cfg.tools.tool_timeout_secs);
    let ctx = ToolContext::new(Arc::new(ResearchSession::new()));

    match command.as_str() {
        "extract" => {
            if rest.is_empty() {
                bail!(USAGE);
            }
            for url in &rest {
                match executor.execute("extract_content", json!({ "url": url }), &ctx).await {
                    Ok(text) => println!("== {}\n{}\n", url, text),
                    Err(e) => println!("== {}\n{}\n", url, e),
                }
            }
        }
        "search" => {
            if rest.is_empty() {
                bail!(USAGE);
            }
            executor
                .execute("clear_search_state", json!({}), &ctx)
                .await
                .context("Failed to reset search state")?;
            for query in &rest {
                let out = executor
                    .execute("tavily_search", json!({ "query": query }), &ctx)
                    .await;
                match out {
                    Ok(raw) => {
                        let v: serde_json::Value = serde_json::from_str(&raw)?;
                        println!("{}", serde_json::to_string_pretty(&v)?);
                        if v["status"] == "limit_reached" {
                            break;
                        }
                    }
                    Err(e) => println!("search '{}' failed: {}", query, e),
                }
            }
        }
        "tools" => println!("{}", executor.registry().to_schema_json()),
        other => bail!("unknown command '{}'; {}", other, USAGE),
    }

    Ok(())
}
