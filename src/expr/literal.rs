//! Complex number literals: `2.5`, `-3i`, `i`, `{1,0.5i}`.

use std::fmt;

use num_complex::Complex64;

/// Components closer to zero than this are dropped when formatting.
const EPS: f64 = 1e-12;

const IMAGINARY_UNIT: char = 'i';
const SEPARATOR: char = ',';
const PAIR_START: char = '{';
const PAIR_END: char = '}';

/// A string that is none of the three literal forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub input: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a complex literal: \"{}\"", self.input)
    }
}

impl std::error::Error for LiteralError {}

/// Parse a complex literal. Forms are tried in order: real, imaginary, pair.
pub fn parse(text: &str) -> Result<Complex64, LiteralError> {
    if let Some(re) = parse_real(text) {
        return Ok(Complex64::new(re, 0.0));
    }
    if let Some(im) = parse_imaginary(text) {
        return Ok(Complex64::new(0.0, im));
    }
    parse_pair(text).ok_or_else(|| LiteralError {
        input: text.to_string(),
    })
}

/// Shortest literal that parses back to `c`.
pub fn format(c: Complex64) -> String {
    if c.im.abs() < EPS {
        return format!("{}", c.re);
    }
    if c.re.abs() < EPS {
        return if (c.im - 1.0).abs() < EPS {
            IMAGINARY_UNIT.to_string()
        } else {
            format!("{}{IMAGINARY_UNIT}", c.im)
        };
    }
    format!("{PAIR_START}{}{SEPARATOR}{}{IMAGINARY_UNIT}{PAIR_END}", c.re, c.im)
}

/// Finite decimal number. `f64::from_str` also accepts `inf` and `NaN`,
/// which are not literals here.
fn parse_real(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_imaginary(text: &str) -> Option<f64> {
    match text.strip_suffix(IMAGINARY_UNIT)? {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        coefficient => parse_real(coefficient),
    }
}

fn parse_pair(text: &str) -> Option<Complex64> {
    let inner = text.strip_prefix(PAIR_START)?.strip_suffix(PAIR_END)?;
    let (re, im) = inner.split_once(SEPARATOR)?;
    let re = parse_real(re.trim())?;
    let im = parse_imaginary(im.trim())?;
    Some(Complex64::new(re, im))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn real_forms() {
        assert_eq!(parse("2").unwrap(), Complex64::new(2.0, 0.0));
        assert_eq!(parse("-0.25").unwrap(), Complex64::new(-0.25, 0.0));
        assert_eq!(parse("1E-5").unwrap(), Complex64::new(1e-5, 0.0));
    }

    #[test]
    fn imaginary_forms() {
        assert_eq!(parse("i").unwrap(), Complex64::new(0.0, 1.0));
        assert_eq!(parse("2i").unwrap(), Complex64::new(0.0, 2.0));
        assert_eq!(parse("-1.5i").unwrap(), Complex64::new(0.0, -1.5));
    }

    #[test]
    fn pair_form() {
        assert_eq!(parse("{3,0.5i}").unwrap(), Complex64::new(3.0, 0.5));
        assert_eq!(parse("{-1, -i}").unwrap(), Complex64::new(-1.0, -1.0));
    }

    #[test]
    fn pair_requires_imaginary_second_part() {
        assert!(parse("{3,0.5}").is_err());
        assert!(parse("{3}").is_err());
        assert!(parse("{3,1i").is_err());
    }

    #[test]
    fn rejects_garbage() {
        for text in ["", "z", "ii", "2j", "inf", "NaN", "1e", "{,i}"] {
            let err = parse(text).unwrap_err();
            assert_eq!(err.input, text);
        }
    }

    #[test]
    fn formats_shortest_form() {
        assert_eq!(format(Complex64::new(2.0, 0.0)), "2");
        assert_eq!(format(Complex64::new(2.0, 1e-13)), "2");
        assert_eq!(format(Complex64::new(0.0, 1.0)), "i");
        assert_eq!(format(Complex64::new(0.0, -2.5)), "-2.5i");
        assert_eq!(format(Complex64::new(3.0, 0.5)), "{3,0.5i}");
    }

    #[test]
    fn round_trip() {
        let values = [
            Complex64::new(1.0, 1.0),
            Complex64::new(-3.25, 0.0),
            Complex64::new(0.0, 7.5),
            Complex64::new(1e-3, -2e5),
            Complex64::new(std::f64::consts::PI, -std::f64::consts::E),
        ];
        for v in values {
            assert!(close(parse(&format(v)).unwrap(), v), "{v}");
        }
    }
}
