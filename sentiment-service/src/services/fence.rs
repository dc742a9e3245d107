//! Code-fence removal for model output.
//!
//! Models often wrap JSON in a Markdown fence. Removal is two literal passes
//! over the text: every "```json" (with one optional trailing newline), then
//! every remaining "```" (same), then a whitespace trim. Fences in the middle
//! of the text are removed too; nothing else is interpreted.

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

pub fn strip_code_fences(text: &str) -> String {
    let without_tagged = remove_marker(text, JSON_FENCE);
    remove_marker(&without_tagged, FENCE).trim().to_string()
}

/// Remove non-overlapping occurrences of `marker`, each with at most one
/// directly following '\n'.
fn remove_marker(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(marker) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + marker.len()..];
        rest = rest.strip_prefix('\n').unwrap_or(rest);
    }
    out.push_str(rest);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tagged_fence() {
        let raw = "```json\n{\"overall_sentiment\":\"positive\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"overall_sentiment\":\"positive\"}");
    }

    #[test]
    fn strips_untagged_fence_and_outer_whitespace() {
        let raw = "  ```\n{\"a\": 1}\n```\n  ";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn leaves_bare_json_alone() {
        assert_eq!(strip_code_fences("{\"a\": [1, 2]}"), "{\"a\": [1, 2]}");
    }

    #[test]
    fn only_one_newline_is_consumed_per_marker() {
        assert_eq!(remove_marker("```json\n\nX", JSON_FENCE), "\nX");
    }

    #[test]
    fn other_language_tags_survive() {
        // Only the backticks go; the tag becomes part of the payload.
        assert_eq!(strip_code_fences("```javascript\n{}\n```"), "javascript\n{}");
    }

    #[test]
    fn fences_inside_text_are_removed_too() {
        assert_eq!(strip_code_fences("a```b```json\nc"), "abc");
    }
}
