//! Flattening of one or many provider responses into one ordered list.

use serde::Deserialize;
use serde_json::Value;

use crate::error::SearchError;
use crate::types::{SearchResponse, SearchResult};

/// Input accepted by [`normalize`]: a single response, or a sequence of
/// batches from several providers.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceInput {
    Response(SearchResponse),
    Batches(Vec<SourceBatch>),
}

/// One element of a multi-provider input.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceBatch {
    /// A provider response wrapping its results.
    Response(SearchResponse),
    /// Results that are already flat.
    Results(Vec<SearchResult>),
}

impl From<SearchResponse> for SourceInput {
    fn from(response: SearchResponse) -> Self {
        Self::Response(response)
    }
}

impl From<Vec<SearchResponse>> for SourceInput {
    fn from(responses: Vec<SearchResponse>) -> Self {
        Self::Batches(responses.into_iter().map(SourceBatch::Response).collect())
    }
}

impl From<Vec<SourceBatch>> for SourceInput {
    fn from(batches: Vec<SourceBatch>) -> Self {
        Self::Batches(batches)
    }
}

impl From<Vec<SearchResult>> for SourceInput {
    fn from(results: Vec<SearchResult>) -> Self {
        Self::Batches(vec![SourceBatch::Results(results)])
    }
}

impl From<SearchResponse> for SourceBatch {
    fn from(response: SearchResponse) -> Self {
        Self::Response(response)
    }
}

impl From<Vec<SearchResult>> for SourceBatch {
    fn from(results: Vec<SearchResult>) -> Self {
        Self::Results(results)
    }
}

impl TryFrom<&Value> for SourceInput {
    type Error = SearchError;

    /// Classify an untyped JSON value.
    ///
    /// - an object with `results` is a single response
    /// - an array is a sequence whose elements are responses (objects with
    ///   `results`), flat results (objects without `results`), or arrays of
    ///   flat results
    ///
    /// Anything else is [`SearchError::InvalidInputKind`]; result objects
    /// missing required fields are [`SearchError::Parse`].
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) if map.contains_key("results") => {
                Ok(Self::Response(parse_response(value)?))
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| parse_batch(index, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Batches),
            other => Err(SearchError::InvalidInputKind(format!(
                "expected an object with `results` or an array of search results, got {}",
                describe(other)
            ))),
        }
    }
}

/// Flatten `input` into one sequence, preserving first-seen order.
pub fn normalize(input: impl Into<SourceInput>) -> Vec<SearchResult> {
    match input.into() {
        SourceInput::Response(response) => response.results,
        SourceInput::Batches(batches) => batches
            .into_iter()
            .flat_map(|batch| match batch {
                SourceBatch::Response(response) => response.results,
                SourceBatch::Results(results) => results,
            })
            .collect(),
    }
}

/// Flatten an untyped JSON value. See [`SourceInput`]'s `TryFrom<&Value>`
/// for the accepted shapes.
///
/// # Errors
///
/// Returns [`SearchError::InvalidInputKind`] for a wrong-shape input and
/// [`SearchError::Parse`] for malformed result objects.
pub fn normalize_value(value: &Value) -> Result<Vec<SearchResult>, SearchError> {
    SourceInput::try_from(value).map(normalize)
}

fn parse_batch(index: usize, item: &Value) -> Result<SourceBatch, SearchError> {
    match item {
        Value::Object(map) if map.contains_key("results") => {
            Ok(SourceBatch::Response(parse_response(item)?))
        }
        Value::Object(_) => Ok(SourceBatch::Results(vec![parse_result(item)?])),
        Value::Array(results) => results
            .iter()
            .map(parse_result)
            .collect::<Result<Vec<_>, _>>()
            .map(SourceBatch::Results),
        other => Err(SearchError::InvalidInputKind(format!(
            "element {index} must be a response or search result, got {}",
            describe(other)
        ))),
    }
}

fn parse_response(value: &Value) -> Result<SearchResponse, SearchError> {
    SearchResponse::deserialize(value)
        .map_err(|e| SearchError::Parse(format!("invalid search response: {e}")))
}

fn parse_result(value: &Value) -> Result<SearchResult, SearchError> {
    SearchResult::deserialize(value)
        .map_err(|e| SearchError::Parse(format!("invalid search result: {e}")))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without `results`",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(title: &str, url: &str) -> SearchResult {
        SearchResult::new(title, url, format!("content of {title}"))
    }

    #[test]
    fn single_response_passes_through() {
        let response = SearchResponse::new(vec![result("A", "u1"), result("B", "u2")]);
        let flat = normalize(response.clone());
        assert_eq!(flat, response.results);
    }

    #[test]
    fn batches_concatenate_in_order() {
        let input = vec![
            SourceBatch::from(SearchResponse::new(vec![result("A", "u1")])),
            SourceBatch::from(vec![result("B", "u2"), result("C", "u3")]),
        ];
        let urls: Vec<_> = normalize(input).into_iter().map(|r| r.url).collect();
        assert_eq!(urls, ["u1", "u2", "u3"]);
    }

    #[test]
    fn empty_batches_yield_nothing() {
        assert!(normalize(Vec::<SearchResponse>::new()).is_empty());
    }

    #[test]
    fn json_single_response() {
        let value = json!({"results": [{"title": "A", "url": "u1", "content": "c1"}]});
        let flat = normalize_value(&value).expect("normalize");
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].title, "A");
    }

    #[test]
    fn json_mixed_sequence() {
        let value = json!([
            {"results": [{"title": "A", "url": "u1", "content": "c1"}]},
            {"title": "B", "url": "u2", "content": "c2", "raw_content": "full"},
            [{"title": "C", "url": "u3", "content": "c3"}]
        ]);
        let flat = normalize_value(&value).expect("normalize");
        let urls: Vec<_> = flat.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["u1", "u2", "u3"]);
        assert_eq!(flat[1].raw_content.as_deref(), Some("full"));
    }

    #[test]
    fn json_string_is_invalid_input_kind() {
        let err = normalize_value(&json!("not a dict or list")).unwrap_err();
        assert!(matches!(err, SearchError::InvalidInputKind(_)));
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn json_object_without_results_is_invalid_input_kind() {
        let err = normalize_value(&json!({"items": []})).unwrap_err();
        assert!(matches!(err, SearchError::InvalidInputKind(_)));
    }

    #[test]
    fn json_scalar_element_is_invalid_input_kind() {
        let err = normalize_value(&json!([{"results": []}, 42])).unwrap_err();
        assert!(matches!(err, SearchError::InvalidInputKind(_)));
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn json_result_missing_url_is_parse_error() {
        let err = normalize_value(&json!({"results": [{"title": "A", "content": "c"}]}))
            .unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }
}
