// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization for the call flow.

/// Reduce a raw number to dial digits.
///
/// Strips every non-digit character; bare 10-digit numbers get the US
/// country code prepended. Longer or shorter digit strings pass through
/// untouched (the page is the authority on what it will dial). Returns
/// `None` when the input contains no digits at all.
pub fn normalize_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.len() == 10 {
        return Some(format!("1{digits}"));
    }
    Some(digits)
}

/// Build the dialer navigation target with the number embedded.
///
/// The `+` prefix must be percent-encoded or the page decodes it as a
/// space.
pub fn call_url(base_url: &str, digits: &str) -> String {
    format!("{}/calls?phoneNo=%2B{digits}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_us_number_normalizes_with_country_code() {
        assert_eq!(
            normalize_number("(555) 123-4567").as_deref(),
            Some("15551234567")
        );
    }

    #[test]
    fn eleven_digit_number_passes_through() {
        assert_eq!(
            normalize_number("+1 555 123 4567").as_deref(),
            Some("15551234567")
        );
    }

    #[test]
    fn international_number_passes_through() {
        assert_eq!(
            normalize_number("+44 20 7946 0958").as_deref(),
            Some("442079460958")
        );
    }

    #[test]
    fn short_code_passes_through() {
        assert_eq!(normalize_number("611").as_deref(), Some("611"));
    }

    #[test]
    fn no_digits_is_none() {
        assert_eq!(normalize_number("abc"), None);
        assert_eq!(normalize_number(""), None);
        assert_eq!(normalize_number("+-() "), None);
    }

    #[test]
    fn call_url_percent_encodes_the_plus() {
        assert_eq!(
            call_url("https://voice.google.com", "15551234567"),
            "https://voice.google.com/calls?phoneNo=%2B15551234567"
        );
    }

    #[test]
    fn call_url_trims_trailing_slash() {
        assert_eq!(
            call_url("https://voice.google.com/", "611"),
            "https://voice.google.com/calls?phoneNo=%2B611"
        );
    }
}
