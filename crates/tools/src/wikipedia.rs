//! Wikipedia lookup tool.
//!
//! Queries the MediaWiki API: one `generator=search` request that returns
//! the matching articles with their intro extracts. At most `top_k` articles
//! are kept, each truncated to `max_chars` characters, formatted as
//! `Page: <title>` / `Summary: <extract>` blocks.

use async_trait::async_trait;
use rummage_core::error::ToolError;
use rummage_core::tool::Tool;
use serde::Deserialize;
use tracing::debug;

const API_URL: &str = "https://en.wikipedia.org/w/api.php";
const USER_AGENT: &str = "rummage/0.1 (research agent; https://github.com/rummage-sh/rummage)";

pub struct WikipediaTool {
    top_k: usize,
    max_chars: usize,
    client: reqwest::Client,
}

impl WikipediaTool {
    pub fn new(top_k: usize, max_chars: usize) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            top_k,
            max_chars,
            client,
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, ToolError> {
        let url = format!(
            "{API_URL}?format=json&formatversion=2&action=query\
             &generator=search&gsrsearch={}&gsrlimit={}\
             &prop=extracts&explaintext=1&exintro=1&redirects=1",
            urlencoding::encode(query),
            self.top_k,
        );

        debug!(%query, "Searching Wikipedia");

        let response = self.client.get(&url).send().await.map_err(|e| {
            ToolError::SearchFailed {
                tool_name: "wikipedia".into(),
                reason: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(ToolError::SearchFailed {
                tool_name: "wikipedia".into(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body: ApiResponse = response.json().await.map_err(|e| {
            ToolError::MalformedResponse {
                tool_name: "wikipedia".into(),
                reason: e.to_string(),
            }
        })?;

        let mut articles = body
            .query
            .map(|q| q.pages)
            .unwrap_or_default();

        // The search generator returns pages unordered; `index` is the rank.
        articles.sort_by_key(|a| a.index.unwrap_or(i64::MAX));
        articles.truncate(self.top_k);
        Ok(articles)
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "Search Wikipedia for encyclopedic information: definitions, historical facts, \
         scientific concepts, biographies. Returns the matching articles' summaries."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The topic to look up"
                }
            },
            "required": ["query"]
        })
    }

    fn source_label(&self) -> &str {
        "Wikipedia"
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let articles = self.search(query).await?;
        if articles.is_empty() {
            return Ok(format!("No Wikipedia articles found for: {query}"));
        }

        Ok(format_articles(&articles, self.max_chars))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Article {
    pub title: String,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    index: Option<i64>,
}

#[derive(Deserialize)]
struct ApiResponse {
    query: Option<QueryBlock>,
}

#[derive(Deserialize)]
struct QueryBlock {
    #[serde(default)]
    pages: Vec<Article>,
}

/// Format articles into the `Page:`/`Summary:` layout, truncating each
/// extract to `max_chars` on a char boundary.
pub(crate) fn format_articles(articles: &[Article], max_chars: usize) -> String {
    articles
        .iter()
        .map(|a| {
            let extract = a.extract.as_deref().unwrap_or("(no summary available)");
            format!("Page: {}\nSummary: {}", a.title, truncate_chars(extract, max_chars))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rummage_core::tool::Tool;

    fn article(title: &str, extract: &str) -> Article {
        Article {
            title: title.into(),
            extract: Some(extract.into()),
            index: None,
        }
    }

    #[test]
    fn formats_page_summary_blocks() {
        let articles = vec![
            article("Quantum computing", "A quantum computer exploits superposition."),
            article("Qubit", "The basic unit of quantum information."),
        ];
        let out = format_articles(&articles, 1000);
        assert!(out.starts_with("Page: Quantum computing\nSummary: A quantum computer"));
        assert!(out.contains("\n\nPage: Qubit\n"));
    }

    #[test]
    fn truncation_respects_max_chars() {
        let long = "x".repeat(5000);
        let articles = vec![article("A", &long), article("B", &long), article("C", &long)];
        let out = format_articles(&articles, 1000);

        // Never longer than top_k * max_chars plus formatting overhead.
        let overhead: usize = articles
            .iter()
            .map(|a| format!("Page: {}\nSummary: \n\n", a.title).len())
            .sum();
        assert!(out.len() <= 3 * 1000 + overhead);
    }

    #[test]
    fn truncation_is_char_boundary_safe() {
        let articles = vec![article("Schrödinger", "éééééééééé")];
        let out = format_articles(&articles, 5);
        assert!(out.ends_with("ééééé"));
    }

    #[test]
    fn missing_extract_is_handled() {
        let articles = vec![Article {
            title: "Stub".into(),
            extract: None,
            index: None,
        }];
        let out = format_articles(&articles, 100);
        assert!(out.contains("(no summary available)"));
    }

    #[test]
    fn parses_api_payload_and_ranks_by_index() {
        let raw = serde_json::json!({
            "query": {
                "pages": [
                    { "title": "Second", "extract": "b", "index": 2 },
                    { "title": "First", "extract": "a", "index": 1 }
                ]
            }
        });
        let body: ApiResponse = serde_json::from_value(raw).unwrap();
        let mut pages = body.query.unwrap().pages;
        pages.sort_by_key(|a| a.index.unwrap_or(i64::MAX));
        assert_eq!(pages[0].title, "First");
    }

    #[test]
    fn tool_definition() {
        let tool = WikipediaTool::new(3, 1000);
        let def = tool.to_definition();
        assert_eq!(def.name, "wikipedia");
        assert_eq!(tool.source_label(), "Wikipedia");
        assert!(def.parameters["required"][0] == "query");
    }

    #[tokio::test]
    async fn missing_query_returns_error() {
        let tool = WikipediaTool::new(3, 1000);
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
