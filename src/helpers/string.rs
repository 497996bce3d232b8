//! Text normalization for labels read out of hand-edited sheets.

/// Non-breaking space, common in cells pasted from web exports
const NO_BREAK_SPACE: char = '\u{a0}';

/// Removes every non-breaking space, then trims surrounding whitespace.
/// Interior ordinary spaces are kept.
pub(crate) fn strip_spaces(text: &str) -> String {
    text.replace(NO_BREAK_SPACE, "").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_no_break_spaces_everywhere() {
        assert_eq!(strip_spaces("\u{a0}아침\u{a0}식사 "), "아침식사");
        assert_eq!(strip_spaces("  1 bowl\t"), "1 bowl");
        assert_eq!(strip_spaces("\u{a0} \u{a0}"), "");
    }
}
