use std::collections::BTreeMap;

pub const FAIL_PREFIX: &str = "---";
pub const FAIL_TAG: &str = "FAIL:";
pub const EXAMPLE_PREFIX: &str = "Example";
pub const GOT_MARKER: &str = "got:";
pub const WANT_MARKER: &str = "want:";

/// Example identifier -> captured output, lines joined by `\n`.
pub type ActualOutputMap = BTreeMap<String, String>;

pub fn parse_transcript(text: &str) -> ActualOutputMap {
    let lines = text.split('\n').collect::<Vec<_>>();
    parse_lines(&lines)
}

/// Single forward pass. A marker not followed directly by `got:` is dropped
/// together with the line after it, and a block cut off before `want:` is
/// discarded along with everything after it.
pub fn parse_lines(lines: &[&str]) -> ActualOutputMap {
    let mut outputs = ActualOutputMap::new();
    let mut block: Vec<&str> = Vec::new();
    let mut i = 0;

    'scan: while i < lines.len() {
        let Some(id) = failure_marker(lines[i]) else {
            i += 1;
            continue;
        };

        i += 1;
        if i == lines.len() {
            break;
        }
        if lines[i] != GOT_MARKER {
            i += 1;
            continue;
        }

        block.clear();
        loop {
            i += 1;
            if i == lines.len() {
                break 'scan;
            }
            if lines[i] == WANT_MARKER {
                outputs.insert(id.to_string(), block.join("\n"));
                i += 1;
                continue 'scan;
            }
            block.push(lines[i]);
        }
    }

    outputs
}

/// Returns the example identifier when `line` reads `--- FAIL: Example...`.
pub fn failure_marker(line: &str) -> Option<&str> {
    let mut fields = line.split(' ');
    let (Some(prefix), Some(tag), Some(id)) = (fields.next(), fields.next(), fields.next())
    else {
        return None;
    };
    if prefix != FAIL_PREFIX || tag != FAIL_TAG || !id.starts_with(EXAMPLE_PREFIX) {
        return None;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_lines_between_got_and_want() {
        let text = "--- FAIL: ExampleFoo (0.00s)\ngot:\nhello\nworld\nwant:\nold\nFAIL\n";
        let outputs = parse_transcript(text);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs["ExampleFoo"], "hello\nworld");
    }

    #[test]
    fn later_block_for_same_example_wins() {
        let text = "--- FAIL: ExampleFoo\ngot:\nfirst\nwant:\n--- FAIL: ExampleFoo\ngot:\nsecond\nwant:";
        let outputs = parse_transcript(text);
        assert_eq!(outputs["ExampleFoo"], "second");
    }

    #[test]
    fn truncated_block_is_discarded_but_earlier_entries_survive() {
        let text = "--- FAIL: ExampleA\ngot:\na\nwant:\n--- FAIL: ExampleB\ngot:\nb\nb2";
        let outputs = parse_transcript(text);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs["ExampleA"], "a");
        assert!(!outputs.contains_key("ExampleB"));
    }

    #[test]
    fn back_to_back_markers_skip_the_second() {
        let text = "--- FAIL: ExampleA\n--- FAIL: ExampleB\ngot:\nb\nwant:\n";
        assert!(parse_transcript(text).is_empty());
    }

    #[test]
    fn marker_after_skipped_line_is_still_seen() {
        let text = "--- FAIL: ExampleA\nnoise\n--- FAIL: ExampleB\ngot:\nb\nwant:\n";
        let outputs = parse_transcript(text);
        assert_eq!(outputs.keys().collect::<Vec<_>>(), vec!["ExampleB"]);
    }

    #[test]
    fn block_content_is_taken_verbatim() {
        let text = "--- FAIL: ExampleX\ngot:\n--- FAIL: ExampleY\n\n  indented\ngot:\nwant:";
        let outputs = parse_transcript(text);
        assert_eq!(outputs["ExampleX"], "--- FAIL: ExampleY\n\n  indented\ngot:");
        assert!(!outputs.contains_key("ExampleY"));
    }

    #[test]
    fn empty_block_maps_to_empty_string() {
        let outputs = parse_transcript("--- FAIL: ExampleEmpty\ngot:\nwant:\n");
        assert_eq!(outputs["ExampleEmpty"], "");
    }

    #[test]
    fn marker_detection_is_space_delimited() {
        assert_eq!(failure_marker("--- FAIL: ExampleFoo (0.01s)"), Some("ExampleFoo"));
        assert_eq!(failure_marker("--- FAIL: TestFoo (0.01s)"), None);
        assert_eq!(failure_marker("    --- FAIL: ExampleFoo"), None);
        assert_eq!(failure_marker("---\tFAIL:\tExampleFoo"), None);
        assert_eq!(failure_marker("--- FAIL:"), None);
        assert_eq!(failure_marker("--- PASS: ExampleFoo"), None);
    }

    #[test]
    fn marker_on_last_line_ends_parsing() {
        assert!(parse_transcript("ok\n--- FAIL: ExampleEnd").is_empty());
    }

    #[test]
    fn carriage_returns_are_not_stripped() {
        let outputs = parse_transcript("--- FAIL: ExampleCr\r\ngot:\r\nx\r\nwant:\r\n");
        assert!(outputs.is_empty());
    }
}
