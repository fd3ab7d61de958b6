//! Canonical text form used for every fuzzy comparison in the engine.
//!
//! Source exports spell the same manager, region or point in many ways: Latin
//! letters typed instead of their Cyrillic twins, a digit `3` instead of `З`,
//! stray punctuation, doubled spaces, `ё` versus `е`. [`normalize`] maps all of
//! these onto a single representative string.
//!
//! Steps, in order:
//!
//! 1. Confusable fold (case-sensitive, so it runs before lowercasing).
//! 2. Lowercase.
//! 3. Drop every character that is not a letter, digit, underscore or
//!    whitespace. Combining marks go too, so a stress accent never splits a
//!    name from its plain spelling.
//! 4. Collapse whitespace runs to one space and trim.
//! 5. NFC composition.
//!
//! The pipeline is repeated until the output stops changing, which makes the
//! function idempotent even when composition produces a foldable character.
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::sheet::CellValue;

/// Upper bound on fixed-point iterations. Real inputs settle after one pass.
const MAX_PASSES: usize = 4;

/// Matches any character that is not a letter, digit, underscore or
/// whitespace. Unicode `\w` would keep combining marks.
static PUNCTUATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{N}_\s]").unwrap_or_else(|_| {
        // Never reached: the pattern above is always valid.
        Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

/// Matches a run of one or more whitespace characters.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").unwrap_or_else(|_| {
        Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

/// Returns the normalized form of `text`.
///
/// `normalize("3АМЕР") == normalize("ЗАМЕР") == "замер"`.
pub fn normalize(text: &str) -> String {
    let mut current = normalize_pass(text);
    for _ in 1..MAX_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Normalizes a sheet cell. Only text cells carry a name; every other kind of
/// cell normalizes to the empty string.
pub fn normalize_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => normalize(s),
        CellValue::Empty | CellValue::Number(_) | CellValue::Bool(_) => String::new(),
    }
}

/// Replaces a character with its canonical look-alike, if it has one.
///
/// Digits that resemble Cyrillic capitals and Latin letters that resemble
/// Cyrillic letters map onto the Cyrillic letter; `ё`/`Ё` fold onto `е`/`Е`.
pub fn fold_confusable(c: char) -> char {
    match c {
        '3' => 'З',
        '0' => 'О',
        '6' => 'б',
        'a' => 'а',
        'A' => 'А',
        'e' => 'е',
        'E' => 'Е',
        'o' => 'о',
        'O' => 'О',
        'p' => 'р',
        'P' => 'Р',
        'c' => 'с',
        'C' => 'С',
        'y' => 'у',
        'Y' => 'У',
        'x' => 'х',
        'X' => 'Х',
        'k' => 'к',
        'K' => 'К',
        't' => 'т',
        'T' => 'Т',
        'm' => 'м',
        'M' => 'М',
        'h' => 'н',
        'H' => 'Н',
        'ё' => 'е',
        'Ё' => 'Е',
        other => other,
    }
}

fn normalize_pass(text: &str) -> String {
    let folded: String = text.chars().map(fold_confusable).collect();
    let lowered = folded.to_lowercase();
    let stripped = PUNCTUATION_RE.replace_all(&lowered, "");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    collapsed.trim().nfc().collect()
}
