//! National identifier normalization and checksum validation.

/// Number of digits in a national identifier.
pub const NATIONAL_ID_LEN: usize = 11;

/// Normalizes a textual national identifier.
///
/// Trims whitespace, strips a float artifact (`"10000000146.0"` or
/// `"1.0000000146E10"`), and left-pads with zeros to 11 characters. The
/// result is not validated; pass it to [`is_valid_national_id`].
///
/// # Example
///
/// ```
/// use grade_engine::validation::normalize_national_id;
///
/// assert_eq!(normalize_national_id(" 10000000146.0 "), "10000000146");
/// assert_eq!(normalize_national_id("1"), "00000000001");
/// ```
pub fn normalize_national_id(raw: &str) -> String {
    let trimmed = raw.trim();
    zero_pad(strip_float_artifact(trimmed).as_deref().unwrap_or(trimmed))
}

fn strip_float_artifact(text: &str) -> Option<String> {
    if let Some((integer, fraction)) = text.split_once('.') {
        let plain_decimal = !integer.is_empty()
            && integer.bytes().all(|b| b.is_ascii_digit())
            && fraction.bytes().all(|b| b == b'0');
        if plain_decimal {
            return Some(integer.to_string());
        }
    }

    if text.contains(['e', 'E']) {
        let value: f64 = text.parse().ok()?;
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
            return Some(format!("{}", value as u64));
        }
    }

    None
}

fn zero_pad(text: &str) -> String {
    let len = text.chars().count();
    if len >= NATIONAL_ID_LEN {
        return text.to_string();
    }
    let mut padded = "0".repeat(NATIONAL_ID_LEN - len);
    padded.push_str(text);
    padded
}

/// Validates a canonical national identifier.
///
/// Rules:
/// 1. exactly 11 ASCII digits
/// 2. first digit is not `0`
/// 3. digit 10 = (sum of digits 1,3,5,7,9 × 7 − sum of digits 2,4,6,8) mod 10
/// 4. digit 11 = (sum of the first 10 digits) mod 10
///
/// # Example
///
/// ```
/// use grade_engine::validation::is_valid_national_id;
///
/// assert!(is_valid_national_id("10000000146"));
/// assert!(!is_valid_national_id("10000000145"));
/// ```
pub fn is_valid_national_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() != NATIONAL_ID_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    if bytes[0] == b'0' {
        return false;
    }

    let digits: Vec<i32> = bytes.iter().map(|b| i32::from(b - b'0')).collect();

    let odd_sum: i32 = digits[0..9].iter().step_by(2).sum();
    let even_sum: i32 = digits[1..8].iter().step_by(2).sum();
    if (odd_sum * 7 - even_sum).rem_euclid(10) != digits[9] {
        return false;
    }

    digits[..10].iter().sum::<i32>() % 10 == digits[10]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Appends both check digits to a 9-digit prefix.
    fn with_check_digits(prefix: &[i32; 9]) -> String {
        let odd: i32 = prefix.iter().step_by(2).sum();
        let even: i32 = prefix[1..].iter().step_by(2).sum();
        let d10 = (odd * 7 - even).rem_euclid(10);
        let d11 = (prefix.iter().sum::<i32>() + d10) % 10;
        let mut id: String = prefix.iter().map(|d| d.to_string()).collect();
        id.push_str(&d10.to_string());
        id.push_str(&d11.to_string());
        id
    }

    #[test]
    fn test_known_valid_ids() {
        assert!(is_valid_national_id("10000000146"));
        assert!(is_valid_national_id("10000000078"));
        assert!(is_valid_national_id("10000050028"));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(!is_valid_national_id("1234567890"));
        assert!(!is_valid_national_id("123456789012"));
        assert!(!is_valid_national_id(""));
    }

    #[test]
    fn test_leading_zero_is_rejected() {
        assert!(!is_valid_national_id("01234567890"));
        assert!(!is_valid_national_id("00000000000"));
    }

    #[test]
    fn test_non_digits_are_rejected() {
        assert!(!is_valid_national_id("1234567890A"));
        assert!(!is_valid_national_id("1234 567890"));
        assert!(!is_valid_national_id("١٠٠٠٠٠٠٠١٤٦"));
    }

    #[test]
    fn test_wrong_check_digits_are_rejected() {
        assert!(!is_valid_national_id("10000000137"));
        assert!(!is_valid_national_id("10000000145"));
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(normalize_national_id(" 10000000146 "), "10000000146");
    }

    #[test]
    fn test_normalize_strips_trailing_zero_fraction() {
        assert_eq!(normalize_national_id("10000000146.0"), "10000000146");
        assert_eq!(normalize_national_id("10000000146.000"), "10000000146");
    }

    #[test]
    fn test_normalize_keeps_real_fractions() {
        assert_eq!(normalize_national_id("10000000146.5"), "10000000146.5");
    }

    #[test]
    fn test_normalize_expands_scientific_notation() {
        assert_eq!(normalize_national_id("1.0000000146E10"), "10000000146");
    }

    #[test]
    fn test_normalize_pads_short_numbers() {
        assert_eq!(normalize_national_id("1"), "00000000001");
        assert!(!is_valid_national_id(&normalize_national_id("0")));
    }

    proptest! {
        #[test]
        fn prop_generated_ids_are_valid(
            first in 1i32..=9,
            rest in proptest::array::uniform8(0i32..=9),
        ) {
            let mut prefix = [0i32; 9];
            prefix[0] = first;
            prefix[1..].copy_from_slice(&rest);
            let id = with_check_digits(&prefix);
            prop_assert!(is_valid_national_id(&id));
        }

        #[test]
        fn prop_corrupting_a_check_digit_invalidates(
            first in 1i32..=9,
            rest in proptest::array::uniform8(0i32..=9),
            position in 9usize..=10,
            delta in 1u8..=9,
        ) {
            let mut prefix = [0i32; 9];
            prefix[0] = first;
            prefix[1..].copy_from_slice(&rest);
            let mut bytes = with_check_digits(&prefix).into_bytes();
            bytes[position] = b'0' + (bytes[position] - b'0' + delta) % 10;
            let corrupted = String::from_utf8(bytes).unwrap();
            prop_assert!(!is_valid_national_id(&corrupted));
        }

        #[test]
        fn prop_non_eleven_lengths_are_invalid(digits in "[1-9][0-9]{0,20}") {
            prop_assume!(digits.len() != NATIONAL_ID_LEN);
            prop_assert!(!is_valid_national_id(&digits));
        }
    }
}
