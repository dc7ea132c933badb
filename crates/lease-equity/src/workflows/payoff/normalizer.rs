/// Case, punctuation, and whitespace insensitive lender key.
pub(crate) fn normalize_lender(value: &str) -> String {
    let cleaned: String = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_bom() {
        assert_eq!(
            normalize_lender("\u{feff}Toyota  Financial-Services, Inc."),
            "toyota financial services inc"
        );
        assert_eq!(normalize_lender("  "), "");
    }
}
