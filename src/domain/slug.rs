//! Slug derivation for post titles.
//!
//! Slugs are built from ASCII letters only: the title is lowercased, every
//! other character becomes a word break, and the surviving words are joined
//! with `-`. Uniqueness is the backend's concern, so duplicates are possible.

/// Derive the URL slug for a post title.
///
/// Returns an empty string when the title contains no ASCII letters.
pub fn derive_slug(title: &str) -> String {
    let spaced: String = title
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_ascii_alphabetic() { ch } else { ' ' })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_digits_and_punctuation() {
        assert_eq!(derive_slug("Hello, World! 2024"), "hello-world");
    }

    #[test]
    fn collapses_runs_of_separators() {
        assert_eq!(derive_slug("  Rust --- async   traits  "), "rust-async-traits");
    }

    #[test]
    fn non_ascii_letters_break_words() {
        assert_eq!(derive_slug("Café au lait"), "caf-au-lait");
        assert_eq!(derive_slug("基线对齐"), "");
    }

    #[test]
    fn lowercasing_happens_before_filtering() {
        // KELVIN SIGN lowercases to an ASCII `k`.
        assert_eq!(derive_slug("\u{212A}ilo Watt"), "kilo-watt");
    }

    #[test]
    fn duplicate_titles_share_a_slug() {
        assert_eq!(derive_slug("Same Title"), derive_slug("same title!"));
    }
}
