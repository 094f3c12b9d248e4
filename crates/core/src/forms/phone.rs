//! Live formatting for phone and WhatsApp inputs.

/// Longest digit run a phone field accepts while typing.
pub const MAX_PHONE_DIGITS: usize = 15;

/// Digits before the first separator (country code).
const COUNTRY_CODE_DIGITS: usize = 2;

/// Digits before the second separator.
const FIRST_GROUP_END: usize = 7;

/// Reformat raw phone input as the user types.
///
/// Strips everything but ASCII digits, caps at [`MAX_PHONE_DIGITS`], then
/// renders `+CC NNNNN NNNN...`: a leading `+`, a space after digit 2 and a
/// space after digit 7.
///
/// ```
/// use cadenza_core::forms::phone::format_phone_input;
///
/// assert_eq!(format_phone_input("919876543210"), "+91 98765 43210");
/// assert_eq!(format_phone_input("+91 98765 43210"), "+91 98765 43210");
/// assert_eq!(format_phone_input(""), "");
/// ```
pub fn format_phone_input(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_PHONE_DIGITS)
        .collect();

    if digits.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(digits.len() + 3);
    out.push('+');
    for (i, ch) in digits.chars().enumerate() {
        if i == COUNTRY_CODE_DIGITS || i == FIRST_GROUP_END {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_two_five_five() {
        assert_eq!(format_phone_input("919876543210"), "+91 98765 43210");
    }

    #[test]
    fn partial_input_formats_progressively() {
        assert_eq!(format_phone_input("9"), "+9");
        assert_eq!(format_phone_input("91"), "+91");
        assert_eq!(format_phone_input("919"), "+91 9");
        assert_eq!(format_phone_input("9198765"), "+91 98765");
        assert_eq!(format_phone_input("91987654"), "+91 98765 4");
    }

    #[test]
    fn strips_non_digits() {
        assert_eq!(format_phone_input("(91) 98765-43210"), "+91 98765 43210");
        assert_eq!(format_phone_input("abc"), "");
    }

    #[test]
    fn caps_digit_count() {
        let formatted = format_phone_input("1234567890123456789");
        let digits = formatted.chars().filter(char::is_ascii_digit).count();
        assert_eq!(digits, MAX_PHONE_DIGITS);
        assert_eq!(formatted, "+12 34567 89012345");
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = format_phone_input("447911123456");
        assert_eq!(format_phone_input(&once), once);
    }
}
