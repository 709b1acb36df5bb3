// * Lenient Response Parser
// * Recovers a JSON array from free-form model output. Strategies run in order and
// * the first match wins; finding nothing is a normal outcome.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// * Non-greedy bracket match spanning newlines
static ARRAY_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*?\]").expect("Invalid array candidate regex"));

/// One way of pulling an array out of a model response
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the recovered array, or `None` when this strategy finds nothing
    fn extract(&self, response: &str) -> Option<Vec<Value>>;
}

/// Scans every `[...]` substring and keeps the first non-empty array holding an object
#[derive(Debug, Default, Clone, Copy)]
pub struct BracketScan;

impl ExtractionStrategy for BracketScan {
    fn name(&self) -> &'static str {
        "bracket_scan"
    }

    fn extract(&self, response: &str) -> Option<Vec<Value>> {
        ARRAY_CANDIDATE.find_iter(response).find_map(|m| {
            match serde_json::from_str::<Value>(m.as_str().trim()) {
                Ok(Value::Array(items)) if items.iter().any(Value::is_object) => Some(items),
                _ => None,
            }
        })
    }
}

/// Parses the whole trimmed response; any array (even empty) is accepted
#[derive(Debug, Default, Clone, Copy)]
pub struct WholeResponse;

impl ExtractionStrategy for WholeResponse {
    fn name(&self) -> &'static str {
        "whole_response"
    }

    fn extract(&self, response: &str) -> Option<Vec<Value>> {
        match serde_json::from_str::<Value>(response.trim()) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        }
    }
}

/// Ordered list of extraction strategies
pub struct ResponseParser {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ResponseParser {
    /// Bracket scan first, then whole-response parse
    pub fn new() -> Self {
        Self::with_strategies(vec![Box::new(BracketScan), Box::new(WholeResponse)])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Returns the first array any strategy recovers
    pub fn parse(&self, response: &str) -> Option<Vec<Value>> {
        self.strategies.iter().find_map(|strategy| {
            let items = strategy.extract(response)?;
            tracing::trace!(strategy = strategy.name(), items = items.len(), "Recovered JSON array");
            Some(items)
        })
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper using the default strategies
pub fn parse_response(response: &str) -> Option<Vec<Value>> {
    ResponseParser::new().parse(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_embedded_in_prose() {
        let response = "Here are the results:\n[{\"name\":\"Acme\",\"description\":\"d\",\"country\":\"US\",\"category\":\"AI\"}]\nHope this helps!";

        let items = parse_response(response).unwrap();

        assert_eq!(
            items,
            vec![json!({"name":"Acme","description":"d","country":"US","category":"AI"})]
        );
    }

    #[test]
    fn test_no_json_yields_nothing() {
        assert!(parse_response("I could not find any startups.").is_none());
    }

    #[test]
    fn test_multiline_array() {
        let response = "```json\n[\n  {\"name\": \"Beta\"},\n  {\"name\": \"Gamma\"}\n]\n```";

        let items = parse_response(response).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["name"], "Gamma");
    }

    #[test]
    fn test_skips_malformed_and_scalar_candidates() {
        let response = "See [1] and [broken {json]. Result: [{\"name\":\"Delta\"}]";

        let items = parse_response(response).unwrap();

        assert_eq!(items, vec![json!({"name":"Delta"})]);
    }

    #[test]
    fn test_empty_array_response() {
        let items = parse_response("  []  ").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_bracket_scan_ignores_empty_arrays() {
        assert!(BracketScan.extract("nothing here: []").is_none());
        assert_eq!(WholeResponse.extract("nothing here: []"), None);
    }

    #[test]
    fn test_custom_strategy_order() {
        let parser = ResponseParser::with_strategies(vec![Box::new(WholeResponse)]);
        assert!(parser.parse("prefix [{\"name\":\"x\"}]").is_none());
    }
}
