use num_traits::Float;

use crate::error::{Result, StabilityError};

/// An externally supplied seed, in whatever form the caller holds it.
///
/// Every representation is reduced to the same 64-bit value by taking the
/// seed's integer value modulo 2^64 (two's complement for negative values).
/// The reduction only depends on the numeric value, so `Seed::Integer(5)`,
/// `Seed::Words(vec![0, 5])`, `Seed::Digits("5".into())` and `Seed::Float(5.0)`
/// all normalize to `5` on every platform.
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    Integer(i128),
    /// 32-bit words, most significant word first.
    Words(Vec<u32>),
    /// Decimal digits of arbitrary length, with an optional sign.
    Digits(String),
    /// Must be finite and integral.
    Float(f64),
}

impl Seed {
    /// Reduce the seed to the 64 bits used to initialize a generator.
    ///
    /// # Returns
    ///
    /// The seed value modulo 2^64, or `InvalidSeed` if the value is not numeric
    /// (empty word vector, a non-digit string, a NaN/infinite/fractional float).
    pub fn normalize(&self) -> Result<u64> {
        match self {
            Seed::Integer(value) => Ok(*value as u64),
            Seed::Words(words) => fold_words(words).ok_or_else(|| self.invalid()),
            Seed::Digits(digits) => fold_digits(digits).ok_or_else(|| self.invalid()),
            Seed::Float(value) => fold_float(*value).ok_or_else(|| self.invalid()),
        }
    }

    fn invalid(&self) -> StabilityError {
        let value = match self {
            Seed::Integer(value) => value.to_string(),
            Seed::Words(words) => format!("{:?}", words),
            Seed::Digits(digits) => digits.clone(),
            Seed::Float(value) => value.to_string(),
        };
        StabilityError::InvalidSeed { value }
    }
}

/// Normalize any seed-like value into 64 bits.
pub fn normalize_seed(seed: impl Into<Seed>) -> Result<u64> {
    seed.into().normalize()
}

fn fold_words(words: &[u32]) -> Option<u64> {
    if words.is_empty() {
        return None;
    }
    // Shifting out the high words keeps the value modulo 2^64
    Some(
        words
            .iter()
            .fold(0u64, |acc, &word| (acc << 32) | u64::from(word)),
    )
}

fn fold_digits(text: &str) -> Option<u64> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let magnitude = digits.bytes().fold(0u64, |acc, b| {
        acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0'))
    });

    Some(if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    })
}

fn fold_float<F: Float>(value: F) -> Option<u64> {
    if !value.is_finite() || value.fract() != F::zero() {
        return None;
    }
    // Integral floats beyond the i128 range still reduce exactly, since such
    // values are multiples of 2^64.
    match value.to_i128() {
        Some(integer) => Some(integer as u64),
        None => Some(0),
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Seed::Integer(i128::from(value))
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Seed::Integer(i128::from(value))
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed::Integer(i128::from(value))
    }
}

impl From<i32> for Seed {
    fn from(value: i32) -> Self {
        Seed::Integer(i128::from(value))
    }
}

impl From<i128> for Seed {
    fn from(value: i128) -> Self {
        Seed::Integer(value)
    }
}

impl From<u128> for Seed {
    fn from(value: u128) -> Self {
        // Only the low 64 bits survive normalization anyway
        Seed::Integer(i128::from(value as u64))
    }
}

impl From<Vec<u32>> for Seed {
    fn from(words: Vec<u32>) -> Self {
        Seed::Words(words)
    }
}

impl From<&[u32]> for Seed {
    fn from(words: &[u32]) -> Self {
        Seed::Words(words.to_vec())
    }
}

impl From<&str> for Seed {
    fn from(digits: &str) -> Self {
        Seed::Digits(digits.to_string())
    }
}

impl From<String> for Seed {
    fn from(digits: String) -> Self {
        Seed::Digits(digits)
    }
}

impl From<f64> for Seed {
    fn from(value: f64) -> Self {
        Seed::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_value_same_seed_across_representations() {
        let expected = 123_456_789u64;
        assert_eq!(normalize_seed(123_456_789u64).unwrap(), expected);
        assert_eq!(normalize_seed(123_456_789i32).unwrap(), expected);
        assert_eq!(normalize_seed("123456789").unwrap(), expected);
        assert_eq!(normalize_seed(vec![0u32, 123_456_789]).unwrap(), expected);
        assert_eq!(normalize_seed(123_456_789.0f64).unwrap(), expected);
    }

    #[test]
    fn test_wide_values_keep_low_bits() {
        let wide: u128 = (7u128 << 64) | 42;
        assert_eq!(normalize_seed(wide).unwrap(), 42);

        // 2^64 + 42
        assert_eq!(normalize_seed("18446744073709551658").unwrap(), 42);

        // Three words: the most significant one is shifted out
        assert_eq!(normalize_seed(vec![9u32, 1, 2]).unwrap(), (1u64 << 32) | 2);
    }

    #[test]
    fn test_negative_values_wrap() {
        assert_eq!(normalize_seed(-1i64).unwrap(), u64::MAX);
        assert_eq!(normalize_seed("-1").unwrap(), u64::MAX);
        assert_eq!(normalize_seed(-2.0f64).unwrap(), u64::MAX - 1);
    }

    #[test]
    fn test_invalid_seeds() {
        assert!(matches!(
            normalize_seed("12a4"),
            Err(StabilityError::InvalidSeed { .. })
        ));
        assert!(normalize_seed("").is_err());
        assert!(normalize_seed("-").is_err());
        assert!(normalize_seed(Vec::<u32>::new()).is_err());
        assert!(normalize_seed(f64::NAN).is_err());
        assert!(normalize_seed(f64::INFINITY).is_err());
        assert!(normalize_seed(1.5f64).is_err());
    }

    #[test]
    fn test_invalid_seed_names_value() {
        let err = normalize_seed("not-a-seed").unwrap_err();
        assert!(err.to_string().contains("not-a-seed"));
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let seed = Seed::Digits("98765432109876543210".to_string());
        assert_eq!(seed.normalize().unwrap(), seed.normalize().unwrap());
    }
}
