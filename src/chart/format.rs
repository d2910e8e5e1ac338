use std::fmt;

/// Every finite `f64` has at most this many fractional decimal digits.
const EXACT_DIGITS: usize = 1074;

/// Fixed-precision number format, the d3-format `.<precision>f` specifier.
///
/// The chart carries the specifier string for the renderer; [`format`]
/// reproduces what the tooltip will show.  Like `Number.prototype.toFixed`,
/// ties round away from zero on the exact binary value, and a result that
/// rounds to zero carries no sign.
///
/// [`format`]: NumberFormat::format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    precision: usize,
}

impl NumberFormat {
    pub fn fixed(precision: usize) -> Self {
        Self { precision }
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let p = self.precision;

        // Exact expansion; the digit after position `p` decides the rounding.
        let exact = format!("{:.*}", p.max(EXACT_DIGITS) + 1, value.abs());
        let (int, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
        let mut digits: Vec<u8> = int.bytes().chain(frac.bytes().take(p)).collect();

        if frac.as_bytes().get(p).is_some_and(|&d| d >= b'5') {
            let mut carry = true;
            for d in digits.iter_mut().rev() {
                if *d == b'9' {
                    *d = b'0';
                } else {
                    *d += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                digits.insert(0, b'1');
            }
        }

        let int_len = digits.len() - p;
        let mut out = String::with_capacity(digits.len() + 2);
        if value < 0.0 && digits.iter().any(|&d| d != b'0') {
            out.push('-');
        }
        out.extend(digits[..int_len].iter().map(|&d| d as char));
        if p > 0 {
            out.push('.');
            out.extend(digits[int_len..].iter().map(|&d| d as char));
        }
        out
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}f", self.precision)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(4, 1.23456789, "1.2346")]
    #[test_case(1, 3.14159, "3.1")]
    #[test_case(1, 0.0, "0.0")]
    #[test_case(1, 0.25, "0.3"; "tie rounds up")]
    #[test_case(2, 0.125, "0.13"; "exact tie rounds up")]
    #[test_case(1, -0.25, "-0.3"; "negative tie rounds away from zero")]
    #[test_case(2, 1.005, "1.00"; "below tie in binary")]
    #[test_case(1, -0.01, "0.0"; "negative rounding to zero is unsigned")]
    #[test_case(1, -0.0, "0.0"; "negative zero")]
    #[test_case(1, 9.96, "10.0"; "carry into integer part")]
    #[test_case(0, 2.5, "3"; "no fraction")]
    #[test_case(3, -12.0, "-12.000"; "negative integer")]
    fn fixed(precision: usize, value: f64, want: &str) {
        assert_eq!(NumberFormat::fixed(precision).format(value), want);
    }

    #[test]
    fn non_finite() {
        assert_eq!(NumberFormat::fixed(2).format(f64::NAN), "NaN");
    }

    #[test_case(4, ".4f")]
    #[test_case(1, ".1f")]
    #[test_case(0, ".0f")]
    fn specifier(precision: usize, want: &str) {
        assert_eq!(NumberFormat::fixed(precision).to_string(), want);
    }
}
