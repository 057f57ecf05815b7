//! Search tool implementations for rummage.
//!
//! Two lookup tools give the agent its research capability:
//! - `wikipedia` for encyclopedic information
//! - `web_search` for current events and anything past the knowledge cutoff
//!
//! Which tool to use for a given question is the model's decision, guided by
//! the system prompt; nothing here second-guesses it.

pub mod web_search;
pub mod wikipedia;

pub use web_search::WebSearchTool;
pub use wikipedia::WikipediaTool;

use rummage_config::AppConfig;
use rummage_core::tool::ToolRegistry;

/// Create the default tool registry with both lookup tools, configured from
/// the application config.
pub fn default_registry(config: &AppConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WikipediaTool::new(
        config.wikipedia.top_k,
        config.wikipedia.max_chars,
    )));
    registry.register(Box::new(WebSearchTool::new(config.web_search.max_results)));
    registry
}
