//! 网页正文提取
//!
//! ContentExtractor：校验 URL → 带超时 GET → 2xx 时解析 HTML 并选出正文 → 规范化空白、按字符截断。
//! 所有失败以 ToolError 返回（InvalidInput / Timeout / FetchFailed），调用方视为“无可用内容”继续处理。

pub mod select;
pub mod text;

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::config::ExtractSection;
use crate::core::{ErrorKind, ToolError};

pub use select::{extract_main_content, MainContent, Selected, Strategy, STRATEGIES};

/// 单个 URL 的提取结果：正文或带标签的错误
pub type ExtractionResult = Result<String, ToolError>;

/// 提取到的页面
#[derive(Debug, Clone, Serialize)]
pub struct PageContent {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// 批量提取中单个 URL 的输出形态：`{url, text}` 或 `{url, error, detail}`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExtractionReport {
    Text { url: String, text: String },
    Error { url: String, error: ErrorKind, detail: String },
}

impl ExtractionReport {
    pub fn new(url: &str, result: &ExtractionResult) -> Self {
        match result {
            Ok(text) => ExtractionReport::Text {
                url: url.to_string(),
                text: text.clone(),
            },
            Err(e) => ExtractionReport::Error {
                url: url.to_string(),
                error: e.kind(),
                detail: e.to_string(),
            },
        }
    }
}

/// 正文长度上限；配置只能调低
pub const MAX_CONTENT_CHARS: usize = 12_000;

/// 正文提取器：持有 HTTP 客户端、超时与最大字符数
pub struct ContentExtractor {
    client: Client,
    timeout: Duration,
    max_chars: usize,
}

impl ContentExtractor {
    pub fn new(config: &ExtractSection) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_default();
        Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            max_chars: config.max_chars.min(MAX_CONTENT_CHARS),
        }
    }

    /// 覆盖超时（测试中用毫秒级超时）
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// 提取正文文本
    pub async fn extract(&self, url: &str) -> ExtractionResult {
        self.extract_page(url).await.map(|page| page.text)
    }

    /// 提取正文与标题
    pub async fn extract_page(&self, url: &str) -> Result<PageContent, ToolError> {
        let parsed = parse_url(url)?;
        let html = self.fetch_html(&parsed).await?;
        let main = extract_main_content(&html, self.max_chars);
        tracing::info!(
            url = %parsed,
            selected = ?main.selected,
            chars = main.text.chars().count(),
            "content extracted"
        );
        Ok(PageContent {
            url: parsed.to_string(),
            title: main.title,
            text: main.text,
        })
    }

    /// 依次提取多个 URL；单个失败不影响其余，结果顺序与输入一致
    pub async fn extract_all(&self, urls: &[String]) -> Vec<(String, ExtractionResult)> {
        let mut out = Vec::with_capacity(urls.len());
        for url in urls {
            let result = self.extract(url).await;
            if let Err(ref e) = result {
                tracing::warn!(url = %url, error = %e, "extraction failed, continuing");
            }
            out.push((url.clone(), result));
        }
        out
    }

    /// 计时器与请求同时开始；计时器先到则丢弃请求 future（取消在途请求）并返回 Timeout。
    /// 读取响应体也计入同一截止时间。
    async fn fetch_html(&self, url: &Url) -> Result<String, ToolError> {
        tracing::debug!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "fetching page");
        let request = async {
            let resp = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| transport_error(url, e))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(ToolError::FetchFailed {
                    status: Some(status.as_u16()),
                    detail: format!("Failed to fetch {} ({})", url, status),
                });
            }
            resp.text().await.map_err(|e| transport_error(url, e))
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::Timeout {
                url: url.to_string(),
                elapsed: self.timeout,
            }),
        }
    }
}

fn transport_error(url: &Url, e: reqwest::Error) -> ToolError {
    ToolError::FetchFailed {
        status: e.status().map(|s| s.as_u16()),
        detail: format!("Error fetching {}: {}", url, e),
    }
}

/// 仅接受绝对 http/https URL
pub fn parse_url(raw: &str) -> Result<Url, ToolError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ToolError::InvalidInput("Missing url".to_string()));
    }
    let url = Url::parse(raw).map_err(|e| ToolError::InvalidInput(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ToolError::InvalidInput(format!(
            "Unsupported scheme '{}': {raw}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ToolError::InvalidInput(format!("Missing host: {raw}")));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_accepts_absolute_http() {
        assert!(parse_url("https://example.com/a?b=c").is_ok());
        assert!(parse_url("  http://example.com  ").is_ok());
    }

    #[test]
    fn test_parse_url_rejects_invalid() {
        for bad in ["", "not a url", "/relative/path", "example.com", "ftp://example.com/f", "mailto:a@b.c"] {
            let err = parse_url(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "input: {bad:?}");
        }
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_network() {
        // 不可达的超时也不会被触发：校验在请求之前返回
        let extractor = ContentExtractor::new(&ExtractSection::default())
            .with_timeout(Duration::from_millis(1));
        let err = extractor.extract("definitely not a url").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_max_chars_cannot_exceed_cap() {
        let raised = ExtractSection { max_chars: 50_000, ..ExtractSection::default() };
        assert_eq!(ContentExtractor::new(&raised).max_chars(), MAX_CONTENT_CHARS);

        let lowered = ExtractSection { max_chars: 500, ..ExtractSection::default() };
        assert_eq!(ContentExtractor::new(&lowered).max_chars(), 500);
    }

    #[test]
    fn test_report_shapes() {
        let ok = ExtractionReport::new("https://a.test", &Ok("hello".to_string()));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"url": "https://a.test", "text": "hello"})
        );

        let err = ExtractionReport::new(
            "https://a.test",
            &Err(ToolError::Timeout { url: "https://a.test".into(), elapsed: Duration::from_secs(10) }),
        );
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v["error"], "timeout");
        assert!(v["detail"].as_str().unwrap().contains("Timed out"));
    }
}
