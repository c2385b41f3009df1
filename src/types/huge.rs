//! Arbitrary-precision numbers carried as text on the wire.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::error::UbjsonError;

/// A UBJSON huge number: an arbitrary-precision integer, or a decimal when the
/// text has a fractional part or exponent.
#[derive(Debug, Clone, PartialEq)]
pub enum HugeNumber {
    Integer(BigInt),
    Decimal(BigDecimal),
}

impl HugeNumber {
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Self::Integer(i) => Some(i),
            Self::Decimal(_) => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Self::Decimal(d) => Some(d),
            Self::Integer(_) => None,
        }
    }
}

/// Integer parse wins; decimal is the fallback. Digit separators (`1_000`)
/// are not numeric text.
impl FromStr for HugeNumber {
    type Err = UbjsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || UbjsonError::MalformedHugeNumber(s.to_owned());
        if s.contains('_') {
            return Err(malformed());
        }
        if let Ok(i) = BigInt::from_str(s) {
            return Ok(Self::Integer(i));
        }
        BigDecimal::from_str(s)
            .map(Self::Decimal)
            .map_err(|_| malformed())
    }
}

/// Canonical text. A decimal with no fractional digits keeps a trailing `.0`
/// so that parsing the text yields a decimal again.
impl fmt::Display for HugeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => {
                let text = d.to_string();
                if text.contains(['.', 'e', 'E']) {
                    f.write_str(&text)
                } else {
                    write!(f, "{text}.0")
                }
            }
        }
    }
}

impl From<BigInt> for HugeNumber {
    fn from(i: BigInt) -> Self {
        Self::Integer(i)
    }
}

impl From<BigDecimal> for HugeNumber {
    fn from(d: BigDecimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<i64> for HugeNumber {
    fn from(i: i64) -> Self {
        Self::Integer(BigInt::from(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_first() {
        let n: HugeNumber = "123456789012345678901234567890".parse().unwrap();
        let expected = BigInt::from_str("123456789012345678901234567890").unwrap();
        assert_eq!(n, HugeNumber::Integer(expected));
    }

    #[test]
    fn negative_integer() {
        let n: HugeNumber = "-42".parse().unwrap();
        assert_eq!(n, HugeNumber::from(-42i64));
    }

    #[test]
    fn falls_back_to_decimal() {
        let n: HugeNumber = "3.25".parse().unwrap();
        assert_eq!(n, HugeNumber::Decimal(BigDecimal::from_str("3.25").unwrap()));
        assert!(n.as_integer().is_none());
    }

    #[test]
    fn rejects_garbage() {
        let err = "12abc".parse::<HugeNumber>().unwrap_err();
        assert!(matches!(err, UbjsonError::MalformedHugeNumber(ref s) if s == "12abc"));
        assert!("".parse::<HugeNumber>().is_err());
    }

    #[test]
    fn integral_decimal_text_stays_decimal() {
        let d = HugeNumber::Decimal(BigDecimal::from_str("10").unwrap());
        let text = d.to_string();
        assert!(text.contains('.'), "{text}");
        assert_eq!(text.parse::<HugeNumber>().unwrap(), d);
    }

    #[test]
    fn integer_text_round_trips() {
        let n = HugeNumber::from(i64::MIN);
        assert_eq!(n.to_string(), i64::MIN.to_string());
        assert_eq!(n.to_string().parse::<HugeNumber>().unwrap(), n);
    }

    #[test]
    fn rejects_digit_separators() {
        for text in ["1_000", "1_000.5", "_1"] {
            let err = text.parse::<HugeNumber>().unwrap_err();
            assert!(matches!(err, UbjsonError::MalformedHugeNumber(ref s) if s == text));
        }
    }

    #[test]
    fn large_exponent_decimal() {
        let n: HugeNumber = "1e130".parse().unwrap();
        let expected = BigDecimal::from_str("1e130").unwrap();
        assert_eq!(n.as_decimal(), Some(&expected));
        assert_eq!(n.to_string().parse::<HugeNumber>().unwrap(), n);
    }

    #[test]
    fn long_fraction_keeps_every_digit() {
        let text = "0.1234567890123456789012345678901234567891";
        let n: HugeNumber = text.parse().unwrap();
        let (digits, scale) = n.as_decimal().unwrap().as_bigint_and_exponent();
        let expected = BigInt::from_str("1234567890123456789012345678901234567891").unwrap();
        assert_eq!(digits, expected);
        assert_eq!(scale, 40);

        let back: HugeNumber = n.to_string().parse().unwrap();
        assert_eq!(back.as_decimal().unwrap().as_bigint_and_exponent(), (expected, 40));
    }
}
