//! Character-level Unicode classification for Japanese text.

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Katakana that carry a sound, i.e. not the prolonged sound mark ー or the
/// middle dot ・.
fn is_katakana_letter(c: char) -> bool {
    is_katakana(c) && c != 'ー' && c != '・'
}

/// Fold katakana ァ..ヶ to the matching hiragana. Other characters pass through.
pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{30A1}'..='\u{30F6}').contains(&c) {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// First contiguous katakana run in `s` that contains at least one letter.
///
/// Runs made only of ー or ・ are ignored, so "らーめん" has no run.
pub fn katakana_run(s: &str) -> Option<&str> {
    let mut start: Option<usize> = None;
    for (i, c) in s.char_indices() {
        match (start, is_katakana(c)) {
            (None, true) => start = Some(i),
            (Some(begin), false) => {
                let run = &s[begin..i];
                if run.chars().any(is_katakana_letter) {
                    return Some(run);
                }
                start = None;
            }
            _ => {}
        }
    }
    let run = &s[start?..];
    run.chars().any(is_katakana_letter).then_some(run)
}
