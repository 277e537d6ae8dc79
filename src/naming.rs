//! Name normalization used by renderers. The model itself keeps raw names.
use once_cell::sync::Lazy;
use regex::Regex;

static NOT_NAME_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N} ]").unwrap());
static NOT_SLUG_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}-]").unwrap());

/// Lowercase, keeping only letters, digits and spaces.
pub fn test_identifier(description: &str) -> String {
    NOT_NAME_CHAR.replace_all(&description.to_lowercase(), "").into_owned()
}

/// `reverse-string` → `ReverseString`
pub fn class_name(slug: &str) -> String {
    NOT_SLUG_CHAR
        .replace_all(&slug.to_lowercase(), "")
        .split('-')
        .map(capitalize)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_drop_punctuation() {
        assert_eq!(test_identifier("Say Hi!"), "say hi");
        assert_eq!(test_identifier("a palindrome, \"racecar\""), "a palindrome racecar");
        assert_eq!(test_identifier("wide characters: 子猫"), "wide characters 子猫");
    }

    #[test]
    fn class_names() {
        assert_eq!(class_name("hello-world"), "HelloWorld");
        assert_eq!(class_name("two-fer"), "TwoFer");
        assert_eq!(class_name("saddle-points"), "SaddlePoints");
        assert_eq!(class_name("rotational_cipher"), "Rotationalcipher");
        assert_eq!(class_name(""), "");
    }
}
