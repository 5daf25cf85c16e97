//! Headword repair for lexicon entries.

use crate::unicode::katakana_run;

/// Joins a kanji fragment to a word whose katakana core lives in the reading,
/// e.g. `紙‐袋` read `かみパックぶくろ`. Not the ASCII hyphen.
pub const MIXED_SCRIPT_SEPARATOR: char = '‐';

const ELLIPSIS: char = '…';
const LEADING_DASH: char = '－';

/// Rebuild a headword split by [`MIXED_SCRIPT_SEPARATOR`].
///
/// The text before the first separator and after the last one are kept and
/// the first katakana run of `reading` goes between them. When the headword
/// has no separator, both fragments are empty, or the reading has no katakana,
/// the headword is returned unchanged.
pub fn reconcile_mixed_script(headword: &str, reading: &str) -> String {
    try_reconcile(headword, reading).unwrap_or_else(|| headword.to_string())
}

fn try_reconcile(headword: &str, reading: &str) -> Option<String> {
    let first = headword.find(MIXED_SCRIPT_SEPARATOR)?;
    let last = headword.rfind(MIXED_SCRIPT_SEPARATOR)?;
    let leading = &headword[..first];
    let trailing = &headword[last + MIXED_SCRIPT_SEPARATOR.len_utf8()..];
    if leading.is_empty() && trailing.is_empty() {
        return None;
    }
    let core = katakana_run(reading)?;
    Some(format!("{leading}{core}{trailing}"))
}

/// Remove every `…` and a single leading `－`. Tabs and line breaks become
/// spaces so the headword fits on one interchange line.
pub fn cleanup_headword(headword: &str) -> String {
    let stripped: String = headword
        .chars()
        .filter(|&c| c != ELLIPSIS)
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect();
    match stripped.strip_prefix(LEADING_DASH) {
        Some(rest) => rest.to_string(),
        None => stripped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_inserts_katakana_core() {
        assert_eq!(reconcile_mixed_script("紙‐袋", "かみパックぶくろ"), "紙パック袋");
    }

    #[test]
    fn reconcile_spans_multiple_separators() {
        assert_eq!(
            reconcile_mixed_script("日本‐‐会", "にほんペンかい"),
            "日本ペン会"
        );
        assert_eq!(reconcile_mixed_script("日‐x‐会", "にパンかい"), "日パン会");
    }

    #[test]
    fn reconcile_with_one_sided_fragment() {
        assert_eq!(reconcile_mixed_script("‐語", "ラテンご"), "ラテン語");
        assert_eq!(reconcile_mixed_script("生‐", "なまビール"), "生ビール");
    }

    #[test]
    fn reconcile_falls_back_unchanged() {
        // no separator
        assert_eq!(reconcile_mixed_script("国", "くに"), "国");
        // ASCII hyphen is not the separator
        assert_eq!(reconcile_mixed_script("紙-袋", "かみパック"), "紙-袋");
        // no katakana in the reading
        assert_eq!(reconcile_mixed_script("紙‐袋", "かみぶくろ"), "紙‐袋");
        // only a prolonged sound mark
        assert_eq!(reconcile_mixed_script("拉‐麺", "らーめん"), "拉‐麺");
        // nothing around the separator
        assert_eq!(reconcile_mixed_script("‐", "パン"), "‐");
        // empty reading
        assert_eq!(reconcile_mixed_script("紙‐袋", ""), "紙‐袋");
    }

    #[test]
    fn cleanup_strips_ellipsis_and_leading_dash() {
        assert_eq!(cleanup_headword("…的"), "的");
        assert_eq!(cleanup_headword("見…る…"), "見る");
        assert_eq!(cleanup_headword("－性"), "性");
        assert_eq!(cleanup_headword("－－性"), "－性");
        assert_eq!(cleanup_headword("性－"), "性－");
        assert_eq!(cleanup_headword("…－性"), "性");
        assert_eq!(cleanup_headword(""), "");
    }

    #[test]
    fn cleanup_flattens_separators() {
        assert_eq!(cleanup_headword("a\tb"), "a b");
        assert_eq!(cleanup_headword("x\r\ny"), "x  y");
    }
}
