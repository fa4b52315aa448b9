//! RFC 6350 §3.2 line folding and unfolding.
//!
//! Folding splits long physical lines so no line exceeds 75 octets;
//! continuation lines are marked by a leading space or tab. Unfolding is
//! the inverse: every `CRLF`/`LF` immediately followed by a single space
//! or tab is a continuation marker, not a line break, and is removed.

use aho_corasick::AhoCorasick;
use unicode_segmentation::UnicodeSegmentation;

const FOLD_LIMIT: usize = 75;

/// Normalize line endings to `LF` and remove folding whitespace,
/// producing one string per logical (unfolded) line.
///
/// `CRLF` is normalized to `LF` first so a single scan of the soft-break
/// patterns below (`\n `, `\n\t`) is sufficient regardless of which line
/// ending the producer used.
pub fn unfold(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n");

    // Locate every soft-break occurrence (`\n` followed by exactly one
    // space or tab) in a single pass; both the newline and the following
    // whitespace byte are dropped.
    let patterns = ["\n ", "\n\t"];
    let ac = AhoCorasick::new(patterns).expect("static pattern set");

    let mut out = String::with_capacity(normalized.len());
    let mut last = 0;
    for mat in ac.find_iter(&normalized) {
        out.push_str(&normalized[last..mat.start()]);
        last = mat.end();
    }
    out.push_str(&normalized[last..]);
    out
}

/// Split `input` into logical lines on bare `LF`, after [`unfold`].
pub fn unfold_lines(input: &str) -> Vec<String> {
    unfold(input)
        .split('\n')
        .map(|s| s.trim_end_matches('\r').to_string())
        .collect()
}

/// Fold `line` (a single logical content line, no embedded newline) into
/// `CRLF`-joined physical lines of at most [`FOLD_LIMIT`] octets, each
/// continuation prefixed with a single space.
///
/// Grapheme cluster boundaries (from `unicode-segmentation`) stand in for
/// the RFC's "valid start-of-codepoint" rule: never splitting inside a
/// grapheme also never splits inside the UTF-8 byte sequence that
/// encodes it.
pub fn fold(line: &str) -> String {
    let mut length = 0;
    let mut folded = String::with_capacity(line.len() + line.len() / FOLD_LIMIT * 3);
    for grapheme in line.graphemes(true) {
        length += grapheme.len();
        if length > FOLD_LIMIT {
            folded.push_str("\r\n ");
            length = 1 + grapheme.len();
        }
        folded.push_str(grapheme);
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfold_space_continuation() {
        let input = "BEGIN:VCARD\r\nFN:Mr. \r\n John\r\nEND:VCARD";
        assert_eq!(unfold(input), "BEGIN:VCARD\nFN:Mr. John\nEND:VCARD");
    }

    #[test]
    fn unfold_tab_continuation() {
        let input = "FN:Mr. \n\tJohn";
        assert_eq!(unfold(input), "FN:Mr. John");
    }

    #[test]
    fn unfold_mixed_line_endings() {
        let input = "A:1\r\nB:2\nC:3";
        assert_eq!(unfold(input), "A:1\nB:2\nC:3");
    }

    #[test]
    fn fold_short_line_unchanged() {
        assert_eq!(fold("FN:John Doe"), "FN:John Doe");
    }

    #[test]
    fn fold_long_line_wraps_at_limit() {
        let value = "X".repeat(100);
        let line = format!("NOTE:{value}");
        let folded = fold(&line);
        for physical in folded.split("\r\n") {
            assert!(physical.len() <= FOLD_LIMIT);
        }
        assert_eq!(unfold(&folded), line);
    }

    #[test]
    fn fold_never_splits_multibyte_codepoints() {
        let value = "\u{1F600}".repeat(30); // 4-byte emoji
        let line = format!("NOTE:{value}");
        let folded = fold(&line);
        for physical in folded.split("\r\n") {
            assert!(physical.is_char_boundary(0));
            assert!(std::str::from_utf8(physical.trim_start_matches(' ').as_bytes()).is_ok());
        }
    }

    #[test]
    fn roundtrip_fold_unfold() {
        let value = "a".repeat(200);
        let line = format!("NOTE:{value}");
        let folded = fold(&line);
        let wrapped = format!("BEGIN:VCARD\r\n{folded}\r\nEND:VCARD");
        assert_eq!(
            unfold(&wrapped),
            format!("BEGIN:VCARD\n{line}\nEND:VCARD")
        );
    }
}
