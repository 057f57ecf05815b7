//! Web search tool.
//!
//! Issues a keyword query against the DuckDuckGo HTML endpoint (no API key
//! required) and returns the combined title/snippet text of the top results.
//! Used for anything time-sensitive or past the model's knowledge cutoff.

use async_trait::async_trait;
use rummage_core::error::ToolError;
use rummage_core::tool::Tool;
use tracing::debug;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; rummage/0.1)";

pub struct WebSearchTool {
    max_results: usize,
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(max_results: usize) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            max_results,
            client,
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for current events, recent news, company updates, and anything \
         time-sensitive. Returns result titles with snippets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    fn source_label(&self) -> &str {
        "Web Search (DuckDuckGo)"
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let url = format!("{SEARCH_URL}?q={}", urlencoding::encode(query));
        debug!(%query, "Searching the web");

        let response = self.client.get(&url).send().await.map_err(|e| {
            ToolError::SearchFailed {
                tool_name: "web_search".into(),
                reason: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(ToolError::SearchFailed {
                tool_name: "web_search".into(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let html = response.text().await.map_err(|e| ToolError::MalformedResponse {
            tool_name: "web_search".into(),
            reason: e.to_string(),
        })?;

        let results = extract_results(&html, self.max_results);
        if results.is_empty() {
            return Ok(format!("No web results found for: {query}"));
        }

        Ok(results.join("\n\n"))
    }
}

/// Extract `title — snippet` entries from the DuckDuckGo HTML markup.
///
/// String splitting instead of a full HTML parser: the result blocks are
/// flat `result__body` divs and the fields we need sit directly between the
/// class markers.
pub(crate) fn extract_results(html: &str, max_results: usize) -> Vec<String> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if results.len() >= max_results {
            break;
        }

        let title = chunk
            .split("class=\"result__a\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .map(str::trim)
            .unwrap_or("");

        let snippet = chunk
            .split("class=\"result__snippet\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .map(str::trim)
            .unwrap_or("");

        if title.is_empty() {
            continue;
        }

        if snippet.is_empty() {
            results.push(html_decode(title));
        } else {
            results.push(format!("{}: {}", html_decode(title), html_decode(snippet)));
        }
    }

    results
}

/// Decode the handful of HTML entities DuckDuckGo emits in snippets.
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}
