//! Locate and parse the JSON array embedded in a model answer.
//!
//! Models wrap their JSON in prose or code fences. Top-level `[` spans are tried
//! in order; each one's balanced closing `]` is found while skipping brackets
//! inside string literals, and the first span that deserializes into the
//! requested type wins. Arrays nested inside a rejected span are never tried on
//! their own, and an array that never closes ends the search.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No JSON array found in response")]
    NotFound,
}

/// Parse the first well-formed top-level JSON array of `T` in `text`
pub fn extract_json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ExtractError> {
    let mut cursor = 0;
    while let Some(found) = text[cursor..].find('[') {
        let start = cursor + found;
        // Everything after an unclosed `[` is nested inside it
        let end = balanced_array_end(text, start).ok_or(ExtractError::NotFound)?;
        if let Ok(items) = serde_json::from_str::<Vec<T>>(&text[start..=end]) {
            return Ok(items);
        }
        cursor = end + 1;
    }
    Err(ExtractError::NotFound)
}

/// Byte index of the `]` closing the `[` at `start`, if the array closes
fn balanced_array_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        title: String,
    }

    #[test]
    fn extracts_array_from_prose() {
        let text = r#"Sure! Here are picks:
[{"title": "Amélie"}, {"title": "Paddington 2"}]
Enjoy the show."#;
        let items: Vec<Item> = extract_json_array(text).unwrap();
        assert_eq!(
            items,
            vec![
                Item { title: "Amélie".into() },
                Item { title: "Paddington 2".into() }
            ]
        );
    }

    #[test]
    fn extracts_array_from_code_fence() {
        let text = "```json\n[{\"title\": \"Heat\"}]\n```";
        let items: Vec<Item> = extract_json_array(text).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn no_brackets_is_not_found() {
        let result = extract_json_array::<Item>("I couldn't think of anything, sorry.");
        assert_eq!(result.unwrap_err(), ExtractError::NotFound);
    }

    #[test]
    fn brackets_inside_strings_do_not_close_the_array() {
        let text = r#"[{"title": "The [Redacted] Affair]"}] and a stray ] here"#;
        let items: Vec<Item> = extract_json_array(text).unwrap();
        assert_eq!(items[0].title, "The [Redacted] Affair]");
    }

    #[test]
    fn escaped_quotes_stay_inside_strings() {
        let text = r#"[{"title": "Say \"[hi]\""}]"#;
        let items: Vec<Item> = extract_json_array(text).unwrap();
        assert_eq!(items[0].title, r#"Say "[hi]""#);
    }

    #[test]
    fn skips_bracketed_prose_before_the_array() {
        let text = r#"[Note: runtimes are approximate] [{"title": "Up"}]"#;
        let items: Vec<Item> = extract_json_array(text).unwrap();
        assert_eq!(items, vec![Item { title: "Up".into() }]);
    }

    #[test]
    fn does_not_span_two_arrays() {
        let text = r#"[{"title": "A"}] then later [{"title": "B"}]"#;
        let items: Vec<Item> = extract_json_array(text).unwrap();
        assert_eq!(items, vec![Item { title: "A".into() }]);
    }

    #[test]
    fn unterminated_array_is_not_found() {
        let text = r#"[{"title": "Cut off"#;
        assert_eq!(
            extract_json_array::<Item>(text).unwrap_err(),
            ExtractError::NotFound
        );
    }

    #[test]
    fn truncated_answer_does_not_fall_back_to_a_nested_array() {
        // Cut off mid second item; the first item holds an empty list
        let text = r#"```json
[{"title": "Heat", "tags": []}, {"title": "Ron"#;
        assert_eq!(
            extract_json_array::<Item>(text).unwrap_err(),
            ExtractError::NotFound
        );
    }

    #[test]
    fn nested_empty_array_in_a_rejected_span_is_not_a_result() {
        // Second item is malformed, so the outer span fails as a whole
        let text = r#"[{"title": "Heat", "tags": []}, {"name": 3}]"#;
        assert_eq!(
            extract_json_array::<Item>(text).unwrap_err(),
            ExtractError::NotFound
        );
    }

    #[test]
    fn one_malformed_item_rejects_the_array() {
        let text = r#"[{"title": "Heat"}, {"title": 42}]"#;
        assert_eq!(
            extract_json_array::<Item>(text).unwrap_err(),
            ExtractError::NotFound
        );
    }

    #[test]
    fn later_array_is_found_after_a_rejected_one() {
        let text = r#"Tags: ["a", ["b"]] and the picks: [{"title": "Up"}]"#;
        let items: Vec<Item> = extract_json_array(text).unwrap();
        assert_eq!(items, vec![Item { title: "Up".into() }]);
    }

    #[test]
    fn recommendations_missing_optional_fields_still_parse() {
        use movie_flow::MovieRecommendation;

        let text = r#"[
  {"title": "Heat", "year": 1995, "runtime": 170, "streamingPlatforms": [],
   "rating": 8.3, "genres": ["Crime"], "whyItFits": "Tense.", "plot": "Cops and robbers.",
   "imdbId": "tt0113277"},
  {"title": "Paddington 2", "year": 2017, "runtime": 103}
]"#;
        let items: Vec<MovieRecommendation> = extract_json_array(text).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[1].streaming_platforms.is_empty());
        assert!(items[1].imdb_id.is_empty());
        assert!(!items[1].has_imdb_id());
    }

    #[test]
    fn empty_array_is_found() {
        let items: Vec<Item> = extract_json_array("nothing fits: []").unwrap();
        assert!(items.is_empty());
    }
}
