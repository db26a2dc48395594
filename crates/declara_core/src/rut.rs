//! Chilean RUT helpers.
//!
//! Used to sanity-check the taxpayer identifier in a run's company context.

/// Strips dots, dashes and whitespace and uppercases the check digit.
pub fn clean_rut(rut: &str) -> String {
    rut.chars()
        .filter(|c| !matches!(c, '.' | '-') && !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Computes the modulo-11 check digit for a RUT body.
pub fn check_digit(body: &str) -> Option<char> {
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut sum = 0u32;
    let mut factor = 2u32;
    for digit in body.chars().rev() {
        sum += digit.to_digit(10)? * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    Some(match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        n => char::from_digit(n, 10)?,
    })
}

/// Validates a full RUT (body plus check digit), separators optional.
pub fn is_valid_rut(rut: &str) -> bool {
    let clean = clean_rut(rut);
    if clean.len() < 2 {
        return false;
    }
    let (body, dv) = clean.split_at(clean.len() - 1);
    check_digit(body).is_some_and(|expected| dv.chars().next() == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_separators() {
        assert_eq!(clean_rut("12.345.678-5"), "123456785");
        assert_eq!(clean_rut(" 9.999.999-k "), "9999999K");
    }

    #[test]
    fn computes_known_digits() {
        assert_eq!(check_digit("12345678"), Some('5'));
        assert_eq!(check_digit("76123456"), Some('0'));
        assert_eq!(check_digit(""), None);
        assert_eq!(check_digit("12a4"), None);
    }

    #[test]
    fn validates_full_ruts() {
        assert!(is_valid_rut("12.345.678-5"));
        assert!(!is_valid_rut("12.345.678-9"));
        assert!(!is_valid_rut("5"));
    }
}
