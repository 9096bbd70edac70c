//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - running instance index of the model
//! - `{uuid}` - random UUID v4
//! - `{rand:N}` - random N-digit number (N at most [`MAX_RAND_DIGITS`])

use fill_core::{FieldValue, ValueError};
use rand::Rng;
use uuid::Uuid;

/// Upper bound on N in `{rand:N}`.
pub const MAX_RAND_DIGITS: usize = 64;

/// Generate a string based on a pattern with placeholders.
///
/// Malformed `{rand:...}` placeholders are left in place.
pub fn generate_pattern<R: Rng>(
    pattern: &str,
    rng: &mut R,
    index: u64,
) -> Result<FieldValue, ValueError> {
    let mut result = pattern.replace("{index}", &index.to_string());

    while result.contains("{uuid}") {
        result = result.replacen("{uuid}", &Uuid::new_v4().to_string(), 1);
    }

    let mut search_from = 0;
    while let Some((start, end, digits)) = next_rand_placeholder(&result, search_from) {
        match digits {
            Some(digits) => {
                check_digits(digits)?;
                let random_num = generate_random_digits(rng, digits);
                result = format!("{}{}{}", &result[..start], random_num, &result[end + 1..]);
                search_from = start + random_num.len();
            }
            None => search_from = end + 1,
        }
    }

    Ok(FieldValue::String(result))
}

/// Reject `{rand:N}` placeholders with too many digits.
pub fn check_pattern(pattern: &str) -> Result<(), ValueError> {
    let mut search_from = 0;
    while let Some((_, end, digits)) = next_rand_placeholder(pattern, search_from) {
        if let Some(digits) = digits {
            check_digits(digits)?;
        }
        search_from = end + 1;
    }
    Ok(())
}

/// Byte range of the next `{rand:...}` placeholder at or after `from`, and
/// its digit count when it parses.
fn next_rand_placeholder(text: &str, from: usize) -> Option<(usize, usize, Option<usize>)> {
    let start = from + text[from..].find("{rand:")?;
    let end = start + text[start..].find('}')?;
    let digits = text[start + 6..end].parse::<usize>().ok();
    Some((start, end, digits))
}

fn check_digits(digits: usize) -> Result<(), ValueError> {
    if digits > MAX_RAND_DIGITS {
        return Err(ValueError::InvalidArgument {
            name: "pattern".to_string(),
            reason: format!("{{rand:{digits}}} exceeds {MAX_RAND_DIGITS} digits"),
        });
    }
    Ok(())
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    let mut result = String::with_capacity(digits);
    for position in 0..digits {
        // No leading zero
        let low = if position == 0 { 1 } else { 0 };
        let digit: u8 = rng.gen_range(low..10);
        result.push(char::from(b'0' + digit));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn text(value: FieldValue) -> String {
        match value {
            FieldValue::String(s) => s,
            other => panic!("Expected String value, got {other:?}"),
        }
    }

    fn render(pattern: &str, index: u64) -> String {
        let mut rng = StdRng::seed_from_u64(42);
        text(generate_pattern(pattern, &mut rng, index).unwrap())
    }

    #[test]
    fn test_generate_pattern_index() {
        assert_eq!(render("user_{index}@example.com", 123), "user_123@example.com");
    }

    #[test]
    fn test_generate_pattern_uuid() {
        let first = render("id-{uuid}", 0);
        let second = render("id-{uuid}", 0);

        assert!(first.starts_with("id-"));
        assert_eq!(first.len(), 3 + 36);
        assert!(Uuid::parse_str(&first[3..]).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn test_generate_pattern_random_digits() {
        let s = render("code-{rand:6}", 0);

        assert!(s.starts_with("code-"));
        assert_eq!(s.len(), 5 + 6);
        assert!(s[5..].chars().all(|c| c.is_ascii_digit()));
        assert_ne!(&s[5..6], "0");
    }

    #[test]
    fn test_generate_pattern_multiple_placeholders() {
        let s = render("user_{index}_code_{rand:4}", 42);

        assert!(s.starts_with("user_42_code_"));
        assert_eq!(s.len(), 13 + 4);
    }

    #[test]
    fn test_generate_pattern_keeps_malformed_placeholder() {
        let s = render("{rand:x}-{rand:2}", 0);

        assert!(s.starts_with("{rand:x}-"));
        assert_eq!(s.len(), 9 + 2);
    }

    #[test]
    fn test_digit_count_is_bounded() {
        assert_eq!(render("{rand:64}", 0).len(), 64);

        let mut rng = StdRng::seed_from_u64(42);
        let err = generate_pattern("n-{rand:99999999999}", &mut rng, 0).unwrap_err();
        assert!(matches!(err, ValueError::InvalidArgument { ref name, .. } if name == "pattern"));

        assert!(check_pattern("{rand:65}").is_err());
        assert!(check_pattern("{rand:x}-{rand:8}-{index}").is_ok());
    }
}
