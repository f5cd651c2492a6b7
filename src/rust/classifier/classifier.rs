use serde::{Deserialize, Serialize};

use super::category::{categorize, single_lowercase, TokenCategory};

/// The categorization of one input sequence.
///
/// Each category keeps tokens in input order. `highest_lowercase_alphabet`
/// is empty when no single-character `a`-`z` token was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub numbers: Vec<String>,
    pub alphabets: Vec<String>,
    pub symbols: Vec<String>,
    pub highest_lowercase_alphabet: String,
}

impl ClassificationResult {
    /// Total number of classified tokens across all categories
    pub fn len(&self) -> usize {
        self.numbers.len() + self.alphabets.len() + self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tokens of a single category, in input order
    pub fn category(&self, category: TokenCategory) -> &[String] {
        match category {
            TokenCategory::Number => &self.numbers,
            TokenCategory::Alphabet => &self.alphabets,
            TokenCategory::Symbol => &self.symbols,
        }
    }

    fn push(&mut self, token: &str) {
        match categorize(token) {
            TokenCategory::Number => self.numbers.push(token.to_owned()),
            TokenCategory::Alphabet => self.alphabets.push(token.to_owned()),
            TokenCategory::Symbol => self.symbols.push(token.to_owned()),
        }
    }
}

/// Partitions `tokens` into numbers, alphabets and symbols and picks the
/// highest single-character lowercase letter.
///
/// Never fails and has no side effects.
///
/// # Example
/// ```rust
/// use tokenclass::classify;
///
/// let result = classify(["1", "2", "a", "$", "AB", "3"]);
/// assert_eq!(result.numbers, vec!["1", "2", "3"]);
/// assert_eq!(result.alphabets, vec!["a", "AB"]);
/// assert_eq!(result.symbols, vec!["$"]);
/// assert_eq!(result.highest_lowercase_alphabet, "a");
/// ```
pub fn classify<I, S>(tokens: I) -> ClassificationResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = ClassificationResult::default();
    for token in tokens {
        result.push(token.as_ref());
    }

    // Multi-character alphabetic tokens never compete for the maximum
    result.highest_lowercase_alphabet = result
        .alphabets
        .iter()
        .filter_map(|token| single_lowercase(token))
        .max()
        .map(String::from)
        .unwrap_or_default();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let result = classify(Vec::<String>::new());
        assert_eq!(result, ClassificationResult::default());
        assert!(result.is_empty());
        assert_eq!(result.highest_lowercase_alphabet, "");
    }

    #[test]
    fn test_all_alphabets() {
        let result = classify(["A", "C", "Z", "c", "i"]);
        assert_eq!(result.alphabets, vec!["A", "C", "Z", "c", "i"]);
        assert!(result.numbers.is_empty());
        assert!(result.symbols.is_empty());
        assert_eq!(result.highest_lowercase_alphabet, "i");
    }

    #[test]
    fn test_mixed_input() {
        let result = classify(["1", "2", "a", "$", "AB", "3"]);
        assert_eq!(result.numbers, vec!["1", "2", "3"]);
        assert_eq!(result.alphabets, vec!["a", "AB"]);
        assert_eq!(result.symbols, vec!["$"]);
        assert_eq!(result.highest_lowercase_alphabet, "a");
    }

    #[test]
    fn test_symbols_only() {
        let result = classify(["$", "%", "", "12a"]);
        assert_eq!(result.symbols, vec!["$", "%", "", "12a"]);
        assert!(result.numbers.is_empty());
        assert!(result.alphabets.is_empty());
        assert_eq!(result.highest_lowercase_alphabet, "");
    }

    #[test]
    fn test_multi_char_lowercase_excluded_from_max() {
        let result = classify(["zz", "b", "abc"]);
        assert_eq!(result.alphabets, vec!["zz", "b", "abc"]);
        assert_eq!(result.highest_lowercase_alphabet, "b");
    }

    #[test]
    fn test_only_uppercase_has_no_highest() {
        let result = classify(["A", "Z", "QQ"]);
        assert_eq!(result.highest_lowercase_alphabet, "");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let result = classify(["a", "a", "1", "1"]);
        assert_eq!(result.alphabets, vec!["a", "a"]);
        assert_eq!(result.numbers, vec!["1", "1"]);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_accepts_owned_and_borrowed_tokens() {
        let owned = vec!["x".to_string(), "9".to_string()];
        assert_eq!(classify(&owned), classify(["x", "9"]));
    }

    #[test]
    fn test_category_accessor() {
        let result = classify(["7", "q", "?"]);
        assert_eq!(result.category(TokenCategory::Number), ["7"]);
        assert_eq!(result.category(TokenCategory::Alphabet), ["q"]);
        assert_eq!(result.category(TokenCategory::Symbol), ["?"]);
    }

    #[test]
    fn test_serializes_with_wire_field_names() {
        let value = serde_json::to_value(classify(["m", "5"])).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "numbers": ["5"],
                "alphabets": ["m"],
                "symbols": [],
                "highest_lowercase_alphabet": "m"
            })
        );
    }
}
