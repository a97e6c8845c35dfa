// Output formatting: terminal display for verdicts and registry records.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..."
/// when something was cut. Counts characters, not bytes, so multi-byte
/// input never panics mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefgh", 5), "abcde...");
        // Four emoji are four characters even at four bytes each.
        assert_eq!(truncate_chars("🔑🔑🔑🔑", 4), "🔑🔑🔑🔑");
        assert_eq!(truncate_chars("🔑🔑🔑🔑", 3), "🔑🔑🔑...");
    }
}
