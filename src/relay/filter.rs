use super::BRAND;

/// Replaced in this order.
pub const RESTRICTED_TERMS: [&str; 2] = ["Google", "Gemini"];

/// Replaces every case-sensitive occurrence of a restricted term with the brand name.
pub fn filter_restricted_terms(text: &str) -> String {
    RESTRICTED_TERMS
        .iter()
        .fold(text.to_string(), |acc, term| acc.replace(term, BRAND))
}
