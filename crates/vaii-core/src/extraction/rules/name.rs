//! Applicant name extraction.

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::NAME_LABELED;

/// Labeled name extractor. Values are returned in title case.
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        NAME_LABELED
            .captures_iter(text)
            .filter_map(|caps| {
                let value = title_case(caps.get(1)?.as_str());
                if value.is_empty() {
                    return None;
                }
                let full_match = caps.get(0)?;
                Some(
                    ExtractionMatch::new(value, 0.9, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Extract the labeled name from text.
pub fn extract_name(text: &str) -> Option<String> {
    NameExtractor::new().extract(text).map(|m| m.value)
}

/// Capitalise the first letter of each word and lowercase the rest.
/// Runs of whitespace collapse to a single space.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_name_title_cased() {
        let text = "REPÚBLICA FEDERATIVA DO BRASIL\nNOME: MARIA DA SILVA\nFILIAÇÃO: ...";
        assert_eq!(extract_name(text), Some("Maria Da Silva".to_string()));
    }

    #[test]
    fn test_extract_name_accents() {
        let text = "nome: joão conceição";
        assert_eq!(extract_name(text), Some("João Conceição".to_string()));
    }

    #[test]
    fn test_extract_name_english_label() {
        assert_eq!(
            extract_name("Name:  ana   souza\n"),
            Some("Ana Souza".to_string())
        );
    }

    #[test]
    fn test_extract_name_missing() {
        assert_eq!(extract_name("CPF: 529.982.247-25"), None);
        assert_eq!(extract_name("Nome: 12345"), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("mARIA  sILVA"), "Maria Silva");
        assert_eq!(title_case(""), "");
    }
}
