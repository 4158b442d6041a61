//! Identifier helpers
//!
//! Relation keys are inferred by convention (`<target>Id`, `<source>Id`,
//! `<target>Ids`), which needs the same word splitting for `ShoppingCart`,
//! `shopping_cart` and `HTTPRequest` alike.

use regex::Regex;
use std::sync::OnceLock;

/// Split an identifier into lowercase words.
///
/// Boundaries are separators (`_`, `-`, space, anything non-alphanumeric),
/// lower-to-upper transitions and the end of an acronym (`HTTPRequest` ->
/// `http`, `request`).
pub fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map(|n| n.is_ascii_lowercase()).unwrap_or(false);
            if prev.is_ascii_lowercase() || prev.is_ascii_digit() || (prev.is_ascii_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c.to_ascii_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert string to camelCase
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, word) in split_words(s).iter().enumerate() {
        if i == 0 {
            result.push_str(word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                result.push(first.to_ascii_uppercase());
                result.push_str(chars.as_str());
            }
        }
    }
    result
}

/// Conventional foreign key name pointing at `model`: `Category` -> `categoryId`
pub fn foreign_key_for(model: &str) -> String {
    to_camel_case(&format!("{}_id", model))
}

/// Conventional key holding many ids of `model`: `Tag` -> `tagIds`
pub fn foreign_keys_for(model: &str) -> String {
    to_camel_case(&format!("{}_ids", model))
}

/// Conventional polymorphic discriminator for `model`: `Delivery` -> `deliveryType`
pub fn discriminator_for(model: &str) -> String {
    to_camel_case(&format!("{}_type", model))
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
    })
}

/// Check if a string is usable as a model name
pub fn is_valid_identifier(s: &str) -> bool {
    identifier_pattern().is_match(s)
}
