// src/extract.rs
//! Price extraction: first regex match in rendered page text, digits only.

use regex::Regex;

/// First pattern hit in a page, with the integer it encodes (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceMatch {
    /// Raw matched substring, e.g. `"NT$ 3,500"` or `"12,000円"`.
    pub raw: String,
    /// Digits of `raw` read as base 10. `None` when `raw` has no digits
    /// or the digit run does not fit in `u64`.
    pub price: Option<u64>,
}

/// Find the first substring of `text` matching `pattern`.
pub fn find_price(text: &str, pattern: &Regex) -> Option<PriceMatch> {
    let m = pattern.find(text)?;
    let raw = m.as_str().to_string();
    let price = digits_to_int(&raw);
    Some(PriceMatch { raw, price })
}

/// Integer price of the first match, or `None` on miss / digit-less match.
pub fn extract(text: &str, pattern: &Regex) -> Option<u64> {
    find_price(text, pattern).and_then(|m| m.price)
}

/// Strip every non-digit and parse the rest. Empty or overflowing -> `None`.
pub fn digits_to_int(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twd() -> Regex {
        Regex::new(r"NT\$?\s?[\d,]+").unwrap()
    }

    fn yen() -> Regex {
        Regex::new(r"[\d,]+円").unwrap()
    }

    #[test]
    fn no_match_is_none() {
        assert_eq!(extract("sold out", &twd()), None);
        assert_eq!(find_price("", &yen()), None);
    }

    #[test]
    fn digits_are_concatenated_in_order() {
        assert_eq!(extract("from NT$ 3,500 per night", &twd()), Some(3500));
        assert_eq!(extract("一泊 12,000円 税込", &yen()), Some(12000));
    }

    #[test]
    fn first_match_wins() {
        let m = find_price("NT$2,100 ... NT$1,900", &twd()).unwrap();
        assert_eq!(m.raw, "NT$2,100");
        assert_eq!(m.price, Some(2100));
    }

    #[test]
    fn digitless_match_is_none() {
        let degenerate = Regex::new(r"NT\$[\d,]*").unwrap();
        let m = find_price("price: NT$,,", &degenerate).unwrap();
        assert_eq!(m.raw, "NT$,,");
        assert_eq!(m.price, None);
        assert_eq!(extract("price: NT$,,", &degenerate), None);
    }

    #[test]
    fn overflow_does_not_panic() {
        assert_eq!(digits_to_int("99999999999999999999999"), None);
    }
}
