use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

/// The bucket a single token falls into.
///
/// Categories are mutually exclusive: every token maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    /// Non-empty and made only of decimal digits (`Nd`, any script)
    Number,
    /// Non-empty and made only of letters (`L*`), any case
    Alphabet,
    /// Anything else, including the empty string
    Symbol,
}

impl TokenCategory {
    /// Name of the response field holding tokens of this category
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Number => "numbers",
            Self::Alphabet => "alphabets",
            Self::Symbol => "symbols",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || c.general_category() == GeneralCategory::DecimalNumber
}

// Letter-numbers such as roman numerals carry the Alphabetic property but are not letters.
fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c.general_category_group() == GeneralCategoryGroup::Letter
}

/// Assigns a token to its category. First matching rule wins.
///
/// ```
/// use tokenclass::{categorize, TokenCategory};
///
/// assert_eq!(categorize("42"), TokenCategory::Number);
/// assert_eq!(categorize("١٢"), TokenCategory::Number);
/// assert_eq!(categorize("Ab"), TokenCategory::Alphabet);
/// assert_eq!(categorize("12a"), TokenCategory::Symbol);
/// assert_eq!(categorize(""), TokenCategory::Symbol);
/// ```
pub fn categorize(token: &str) -> TokenCategory {
    if token.is_empty() {
        TokenCategory::Symbol
    } else if token.chars().all(is_decimal_digit) {
        TokenCategory::Number
    } else if token.chars().all(is_letter) {
        TokenCategory::Alphabet
    } else {
        TokenCategory::Symbol
    }
}

/// Returns the token's character when it is exactly one `a`-`z` letter.
pub(crate) fn single_lowercase(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Some(c),
        _ => None,
    }
}
