//! The system instruction sent at the start of every turn.
//!
//! The tool-selection policy lives here as advisory text for the model; the
//! router never enforces it. Whatever tool the model picks is the tool that
//! runs.

/// Build the research-assistant system prompt.
///
/// `knowledge_cutoff` is the year after which the model should prefer the
/// web search tool over its own training data.
pub fn system_prompt(knowledge_cutoff: &str) -> String {
    format!(
        "You are a research assistant with access to search tools.\n\
         \n\
         Available tools:\n\
         - wikipedia: use for encyclopedic information, definitions, historical facts, \
         scientific concepts, and biographies.\n\
         - web_search: use for current events, recent news, company updates, and anything \
         time-sensitive.\n\
         \n\
         ALWAYS use the appropriate search tool when asked about:\n\
         - Current events or recent news\n\
         - Company updates or developments\n\
         - Recent developments in technology\n\
         - What happened in specific years (especially {knowledge_cutoff} and later)\n\
         - Any factual information you are not certain about\n\
         \n\
         Choose the most appropriate tool based on the question type, then answer \
         using the material it returns."
    )
}
