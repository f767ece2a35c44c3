//! Accumulated world lore, kept for narrative and visual consistency.
//!
//! Lore is stored as one string of fragments joined by `"; "`. Fragments are
//! trimmed, never empty, and unique by exact (case-sensitive) comparison.

/// Separator between serialized fragments.
pub const LORE_SEPARATOR: &str = "; ";

/// Splits serialized lore into its distinct fragments, in first-seen order.
#[must_use]
pub fn lore_fragments(lore: &str) -> Vec<&str> {
    let mut fragments: Vec<&str> = Vec::new();
    for fragment in split_fragments(lore) {
        if !fragments.contains(&fragment) {
            fragments.push(fragment);
        }
    }
    fragments
}

/// Merges `updates` into `existing` lore.
///
/// Existing fragments keep their order; unseen update fragments are appended
/// in the order given. An update containing `;` contributes each of its parts,
/// so re-merging the serialized result is always a no-op.
#[must_use]
pub fn merge_lore<S: AsRef<str>>(existing: &str, updates: &[S]) -> String {
    let mut fragments = lore_fragments(existing);
    for fragment in updates.iter().flat_map(|u| split_fragments(u.as_ref())) {
        if !fragments.contains(&fragment) {
            fragments.push(fragment);
        }
    }
    fragments.join(LORE_SEPARATOR)
}

fn split_fragments(text: &str) -> impl Iterator<Item = &str> {
    text.split(';').map(str::trim).filter(|f| !f.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_into_empty_lore() {
        assert_eq!(
            merge_lore("", &["A ruined tower", "  Crimson moon "]),
            "A ruined tower; Crimson moon"
        );
    }

    #[test]
    fn test_merge_keeps_existing_order_and_skips_duplicates() {
        let merged = merge_lore("Crimson moon; A ruined tower", &["A ruined tower", "Ash rain"]);
        assert_eq!(merged, "Crimson moon; A ruined tower; Ash rain");
    }

    #[test]
    fn test_merge_uses_exact_case_sensitive_equality() {
        let first = merge_lore("", &["A Dragon"]);
        let second = merge_lore(&first, &["a dragon", "New Temple"]);
        assert_eq!(second, "A Dragon; a dragon; New Temple");
    }

    #[test]
    fn test_merge_discards_blank_updates() {
        assert_eq!(merge_lore("Ash rain", &["", "   ", ";"]), "Ash rain");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let cases: [(&str, Vec<&str>); 4] = [
            ("", vec!["a", "b"]),
            ("x; y", vec!["y", "z", "z"]),
            ("x;;  y ;", vec!["w; x", " v "]),
            ("", vec![]),
        ];
        for (lore, updates) in cases {
            let once = merge_lore(lore, &updates);
            let twice = merge_lore(&once, &updates);
            assert_eq!(once, twice, "lore {lore:?} updates {updates:?}");
        }
    }

    #[test]
    fn test_merged_lore_never_contains_empty_fragments() {
        let merged = merge_lore(" ; a;; ", &["", "b ;", " ; "]);
        assert_eq!(merged, "a; b");
        assert!(merged.split(LORE_SEPARATOR).all(|f| !f.trim().is_empty()));
    }

    #[test]
    fn test_fragments_of_serialized_lore() {
        assert_eq!(lore_fragments("a; b; a"), vec!["a", "b"]);
        assert!(lore_fragments("").is_empty());
    }
}
