use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use tokenclass::{categorize, classify, ClassificationResult, TokenCategory};

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,4}",
        "[a-zA-Z]{1,4}",
        "[a-z]",
        "[!-/:-@ ]{0,3}",
        "[0-9a-z$]{0,5}",
        any::<String>(),
    ]
}

proptest! {
    #[test]
    fn categories_partition_the_input(tokens in prop::collection::vec(token_strategy(), 0..32)) {
        let result = classify(&tokens);
        prop_assert_eq!(result.len(), tokens.len());

        // Walking the input and consuming from the matching category rebuilds every list exactly
        let mut cursors = [0usize; 3];
        for token in &tokens {
            let category = categorize(token);
            let index = category as usize;
            let bucket = result.category(category);
            prop_assert_eq!(&bucket[cursors[index]], token);
            cursors[index] += 1;
        }
        prop_assert_eq!(cursors, [result.numbers.len(), result.alphabets.len(), result.symbols.len()]);
    }

    #[test]
    fn classification_is_idempotent(tokens in prop::collection::vec(token_strategy(), 0..32)) {
        prop_assert_eq!(classify(&tokens), classify(&tokens));
    }

    #[test]
    fn highest_is_max_single_lowercase(tokens in prop::collection::vec(token_strategy(), 0..32)) {
        let result = classify(&tokens);
        let expected = tokens
            .iter()
            .filter(|t| t.len() == 1 && t.chars().all(|c| c.is_ascii_lowercase()))
            .max()
            .cloned()
            .unwrap_or_default();
        prop_assert_eq!(result.highest_lowercase_alphabet, expected);
    }

    #[test]
    fn reclassifying_a_category_keeps_it_whole(tokens in prop::collection::vec(token_strategy(), 0..32)) {
        let result = classify(&tokens);
        prop_assert_eq!(classify(&result.numbers).numbers, result.numbers.clone());
        prop_assert_eq!(classify(&result.alphabets).alphabets, result.alphabets.clone());
        prop_assert_eq!(classify(&result.symbols).symbols, result.symbols.clone());
    }
}

#[test]
fn test_empty_sequence() {
    assert_eq!(
        classify(Vec::<&str>::new()),
        ClassificationResult {
            numbers: vec![],
            alphabets: vec![],
            symbols: vec![],
            highest_lowercase_alphabet: String::new(),
        }
    );
}

#[test]
fn test_documented_examples() {
    let result = classify(["A", "C", "Z", "c", "i"]);
    assert_eq!(result.alphabets, vec!["A", "C", "Z", "c", "i"]);
    assert_eq!(result.highest_lowercase_alphabet, "i");

    let result = classify(["1", "2", "a", "$", "AB", "3"]);
    assert_eq!(result.numbers, vec!["1", "2", "3"]);
    assert_eq!(result.alphabets, vec!["a", "AB"]);
    assert_eq!(result.symbols, vec!["$"]);
    assert_eq!(result.highest_lowercase_alphabet, "a");

    let result = classify(["$", "%", "", "12a"]);
    assert_eq!(result.symbols, vec!["$", "%", "", "12a"]);
    assert!(result.numbers.is_empty());
    assert!(result.alphabets.is_empty());
    assert_eq!(result.highest_lowercase_alphabet, "");
}

#[test]
fn test_unicode_digits_and_letters() {
    let result = classify(["١٢", "٣", "²", "Ⅷ", "ß", "a"]);
    assert_eq!(result.numbers, vec!["١٢", "٣"]);
    assert_eq!(result.alphabets, vec!["ß", "a"]);
    assert_eq!(result.symbols, vec!["²", "Ⅷ"]);
    assert_eq!(result.highest_lowercase_alphabet, "a");
}

#[test]
fn test_whitespace_tokens_are_symbols() {
    let result = classify([" ", "\n", " a", "1 "]);
    assert_eq!(result.symbols.len(), 4);
    assert_eq!(categorize(" a"), TokenCategory::Symbol);
}

#[test]
fn test_thread_safety() {
    let tokens = Arc::new(vec!["x".to_string(), "9".to_string(), "#".to_string()]);
    let expected = classify(tokens.iter());
    let mut handles = vec![];

    for _ in 0..4 {
        let tokens = Arc::clone(&tokens);
        handles.push(thread::spawn(move || classify(tokens.iter())));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
