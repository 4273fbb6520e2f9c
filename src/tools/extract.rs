//! 正文提取工具：extract_content（单个 URL）与 extract_contents（多个 URL，单个失败不影响其余）

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::extract::{ContentExtractor, ExtractionReport};
use crate::tools::schema::{parse_args, schema_of, ExtractArgs, ExtractManyArgs};
use crate::tools::{Tool, ToolContext};

pub struct ExtractContentTool {
    extractor: Arc<ContentExtractor>,
}

impl ExtractContentTool {
    pub fn new(extractor: Arc<ContentExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Tool for ExtractContentTool {
    fn name(&self) -> &str {
        "extract_content"
    }

    fn description(&self) -> &str {
        "Fetches webpage HTML and extracts the readable text content (max 12000 chars). Args: {\"url\": \"https://...\"}"
    }

    fn parameters_schema(&self) -> Value {
        schema_of::<ExtractArgs>()
    }

    async fn execute(&self, args: Value, _ctx: &ToolContext) -> Result<String, String> {
        let args: ExtractArgs = parse_args(args)?;
        tracing::info!(url = %args.url, "extract_content");
        self.extractor
            .extract(&args.url)
            .await
            .map_err(|e| format!("Error: {}", e))
    }
}

pub struct ExtractContentsTool {
    extractor: Arc<ContentExtractor>,
}

impl ExtractContentsTool {
    pub fn new(extractor: Arc<ContentExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Tool for ExtractContentsTool {
    fn name(&self) -> &str {
        "extract_contents"
    }

    fn description(&self) -> &str {
        "Extracts readable text from several webpages in order; failures are reported per URL. Args: {\"urls\": [\"https://...\"]}"
    }

    fn parameters_schema(&self) -> Value {
        schema_of::<ExtractManyArgs>()
    }

    async fn execute(&self, args: Value, _ctx: &ToolContext) -> Result<String, String> {
        let args: ExtractManyArgs = parse_args(args)?;
        let reports: Vec<ExtractionReport> = self
            .extractor
            .extract_all(&args.urls)
            .await
            .iter()
            .map(|(url, result)| ExtractionReport::new(url, result))
            .collect();
        serde_json::to_string(&reports).map_err(|e| e.to_string())
    }
}
