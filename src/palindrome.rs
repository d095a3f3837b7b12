// Palindrome detection
// Unicode-aware normalization plus a two-pointer symmetry check

use unicode_general_category::{get_general_category, GeneralCategory};

/// Reduce text to its lowercase letters and digits, in original order.
///
/// Works on Unicode scalar values, so multi-byte characters are kept whole.
/// Punctuation, whitespace, symbols and emoji are dropped rather than replaced.
/// Never fails: text with no letters or digits yields an empty vector.
pub fn normalize(text: &str) -> Vec<char> {
    // Fold before filtering: lowercasing can expand one char into several ('İ' -> 'i' + U+0307)
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| is_letter_or_digit(*c))
        .collect()
}

/// Letters (L*) and decimal digits (Nd) only. Circled letters, Roman numerals
/// and fractions are symbols or other numbers and do not count.
fn is_letter_or_digit(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

/// Check whether a sequence reads the same forwards and backwards.
/// An empty or single-element sequence is symmetric.
pub fn is_symmetric(chars: &[char]) -> bool {
    if chars.is_empty() {
        return true;
    }

    let mut left = 0;
    let mut right = chars.len() - 1;

    while left < right {
        if chars[left] != chars[right] {
            return false;
        }
        left += 1;
        right -= 1;
    }

    true
}

/// Derive the `is_palindrome` flag for a message's content.
pub fn is_palindrome(text: &str) -> bool {
    is_symmetric(&normalize(text))
}
