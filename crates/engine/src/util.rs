//! Internal helpers shared by the registry and the ledger.
//!
//! These utilities are **not** part of the public API.

use unicode_normalization::UnicodeNormalization;

/// Key used for case-insensitive category name comparison.
///
/// Applies NFKC so composed and decomposed accents compare equal, lowercases,
/// and collapses runs of whitespace.
pub(crate) fn category_name_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for token in name.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for ch in token.nfkc() {
            out.extend(ch.to_lowercase());
        }
    }
    out
}
