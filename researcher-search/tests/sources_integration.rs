//! Integration tests for the normalize → deduplicate → format pipeline.
//!
//! Everything here runs on synthetic responses; no network access.

use researcher_search::sources::{
    deduplicate, deduplicate_and_format_sources, deduplicate_and_format_value, normalize,
    normalize_value, SourceBatch, SourceFormatter, SOURCES_HEADER, TRUNCATION_MARKER,
};
use researcher_search::{bullet_format, SearchError, SearchResponse, SearchResult};
use serde_json::json;

fn make_result(title: &str, url: &str, content: &str) -> SearchResult {
    SearchResult::new(title, url, content)
}

fn multi_provider_input() -> Vec<SearchResponse> {
    vec![
        SearchResponse::new(vec![make_result("A", "u1", "c1")]),
        SearchResponse::new(vec![
            make_result("A2", "u1", "c2"),
            make_result("B", "u2", "c3"),
        ]),
    ]
}

#[test]
fn first_occurrence_wins_across_providers() {
    let unique = deduplicate(normalize(multi_provider_input()));

    assert_eq!(unique.len(), 2);
    assert_eq!(unique["u1"].title, "A");
    assert_eq!(unique["u1"].content, "c1");
    assert_eq!(unique["u2"].title, "B");
    assert_eq!(unique["u2"].content, "c3");
    let order: Vec<_> = unique.keys().map(String::as_str).collect();
    assert_eq!(order, ["u1", "u2"]);
}

#[test]
fn same_scenario_from_json() {
    let value = json!([
        {"results": [{"title": "A", "url": "u1", "content": "c1"}]},
        {"results": [
            {"title": "A2", "url": "u1", "content": "c2"},
            {"title": "B", "url": "u2", "content": "c3"}
        ]}
    ]);
    let unique = deduplicate(normalize_value(&value).expect("normalize"));
    assert_eq!(unique.len(), 2);
    assert_eq!(unique["u1"].title, "A");
}

#[test]
fn dedup_never_grows_and_is_lossless_for_distinct_urls() {
    let cases: Vec<Vec<SearchResult>> = vec![
        vec![],
        vec![make_result("A", "u1", "c")],
        vec![make_result("A", "u1", "c"), make_result("B", "u2", "c")],
        vec![
            make_result("A", "u1", "c"),
            make_result("B", "u1", "c"),
            make_result("C", "u1", "c"),
        ],
        vec![
            make_result("A", "u1", "c"),
            make_result("B", "u2", "c"),
            make_result("C", "u1", "c"),
            make_result("D", "u3", "c"),
        ],
    ];

    for results in cases {
        let mut distinct: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        distinct.sort_unstable();
        distinct.dedup();
        let all_distinct = distinct.len() == results.len();

        let input_len = results.len();
        let unique = deduplicate(results.clone());
        assert!(unique.len() <= input_len);
        assert_eq!(unique.len() == input_len, all_distinct);

        for (url, kept) in &unique {
            let first = results
                .iter()
                .find(|r| &r.url == url)
                .expect("url came from input");
            assert_eq!(kept, first);
        }
    }
}

#[test]
fn formatted_output_has_header_and_one_block_per_url() {
    let text =
        deduplicate_and_format_sources(multi_provider_input(), 100, true).expect("format");
    assert!(text.starts_with(SOURCES_HEADER));
    assert_eq!(text.matches("\nURL: ").count(), 2);
    assert_eq!(text.matches("Source A:").count(), 1);
    assert!(!text.contains("Source A2:"));
}

#[test]
fn token_budget_truncates_raw_content() {
    let response =
        SearchResponse::new(vec![make_result("A", "u1", "c1").with_raw_content("a".repeat(30))]);
    let text = deduplicate_and_format_sources(response, 5, true).expect("format");
    let excerpt = text
        .split("Full source content limited to 5 tokens: ")
        .nth(1)
        .expect("raw section present");
    assert_eq!(excerpt, format!("{}{TRUNCATION_MARKER}", "a".repeat(20)));
}

#[test]
fn raw_content_flag_off_hides_raw_section() {
    let response =
        SearchResponse::new(vec![make_result("A", "u1", "c1").with_raw_content("a".repeat(30))]);
    let text = deduplicate_and_format_sources(response, 5, false).expect("format");
    assert!(!text.contains("Full source content"));
    assert!(!text.contains("aaaa"));
}

#[test]
fn missing_raw_content_is_substituted_and_recorded() {
    let formatter = SourceFormatter::new(5, true).expect("formatter");
    let unique = deduplicate(normalize(SearchResponse::new(vec![make_result(
        "A", "u1", "c1",
    )])));

    let formatted = formatter.format_with_report(&unique);

    assert_eq!(formatted.missing_raw_content, ["u1"]);
    assert!(formatted
        .text
        .ends_with("Full source content limited to 5 tokens:"));
}

#[test]
fn malformed_input_is_invalid_input_kind() {
    let err = deduplicate_and_format_value(&json!("not a dict or list"), 5, true).unwrap_err();
    assert!(matches!(err, SearchError::InvalidInputKind(_)));
}

#[test]
fn flat_result_batches_are_accepted() {
    let input = vec![
        SourceBatch::Results(vec![make_result("A", "u1", "c1")]),
        SourceBatch::Response(SearchResponse::new(vec![make_result("B", "u2", "c2")])),
    ];
    let text = deduplicate_and_format_sources(input, 10, false).expect("format");
    assert!(text.contains("Source A:"));
    assert!(text.contains("Source B:"));
}

#[test]
fn bullet_format_lists_sources_without_dedup() {
    let response = SearchResponse::new(vec![
        make_result("A", "u1", "c1"),
        make_result("A2", "u1", "c2"),
    ]);
    assert_eq!(bullet_format(&response), "* A : u1\n* A2 : u1");
}
