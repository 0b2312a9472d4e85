// crates/tessera-economics/src/token.rs
//
// $TES token amount type and unit constants.
//
// The smallest unit of $TES is the "grain". 1 TES = 10^18 grains, the same
// 18-decimal scale as common fungible tokens. All internal accounting uses
// grains in u128 so reward arithmetic never touches floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use tessera_core::error::TesseraError;

/// Number of decimal places between TES and grains.
pub const DECIMALS: u32 = 18;

/// Number of grains in one TES. 1 TES = 10^18 grains.
pub const GRAIN_PER_TES: u128 = 1_000_000_000_000_000_000;

/// Type alias for grains, the smallest unit of $TES.
pub type Grain = u128;

/// A $TES amount.
///
/// Wraps an amount in grains (the smallest denomination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tes {
    /// Amount in grains (1 TES = 10^18 grains).
    pub grains: u128,
}

impl Tes {
    /// Create an amount from a whole number of TES.
    ///
    /// # Example
    /// ```
    /// use tessera_economics::token::Tes;
    /// let amount = Tes::from_whole(3);
    /// assert_eq!(amount.grains, 3_000_000_000_000_000_000);
    /// ```
    pub fn from_whole(tes: u128) -> Self {
        Self {
            grains: tes.saturating_mul(GRAIN_PER_TES),
        }
    }

    /// Create an amount from a grain value.
    pub fn from_grains(grains: u128) -> Self {
        Self { grains }
    }

    /// Convert to TES as a floating-point value. Display only; never used in accounting.
    pub fn to_tes_f64(&self) -> f64 {
        self.grains as f64 / GRAIN_PER_TES as f64
    }

    /// Returns zero TES.
    pub fn zero() -> Self {
        Self { grains: 0 }
    }
}

impl FromStr for Tes {
    type Err = TesseraError;

    /// Parse a decimal TES string such as `"1000"` or `"1.25"` exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || TesseraError::InvalidAmount(format!("'{}' is not a TES amount", s));

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > DECIMALS as usize {
            return Err(TesseraError::InvalidAmount(format!(
                "'{}' has more than {} decimal places",
                s, DECIMALS
            )));
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_grains: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = DECIMALS as usize);
            padded.parse().map_err(|_| invalid())?
        };

        whole
            .checked_mul(GRAIN_PER_TES)
            .and_then(|g| g.checked_add(frac_grains))
            .map(Tes::from_grains)
            .ok_or_else(|| TesseraError::Arithmetic(format!("'{}' overflows u128 grains", s)))
    }
}

impl Add for Tes {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            grains: self.grains + rhs.grains,
        }
    }
}

impl Sub for Tes {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            grains: self.grains.saturating_sub(rhs.grains),
        }
    }
}

impl fmt::Display for Tes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.grains / GRAIN_PER_TES;
        let frac = self.grains % GRAIN_PER_TES;
        if frac == 0 {
            write!(f, "{} TES", whole)
        } else {
            // Display up to 18 decimal places, trimming trailing zeros
            let frac_str = format!("{:018}", frac);
            let trimmed = frac_str.trim_end_matches('0');
            write!(f, "{}.{} TES", whole, trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grain_per_tes() {
        assert_eq!(GRAIN_PER_TES, 10u128.pow(DECIMALS));
    }

    #[test]
    fn test_from_whole() {
        assert_eq!(Tes::from_whole(1).grains, GRAIN_PER_TES);
        assert_eq!(Tes::from_whole(1_000_000).grains, 1_000_000 * GRAIN_PER_TES);
    }

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!("1000".parse::<Tes>().unwrap(), Tes::from_whole(1000));
        assert_eq!(
            "1.5".parse::<Tes>().unwrap().grains,
            1_500_000_000_000_000_000
        );
        assert_eq!(".25".parse::<Tes>().unwrap().grains, GRAIN_PER_TES / 4);
        assert_eq!("0.000000000000000001".parse::<Tes>().unwrap().grains, 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Tes>().is_err());
        assert!(".".parse::<Tes>().is_err());
        assert!("-1".parse::<Tes>().is_err());
        assert!("1e6".parse::<Tes>().is_err());
        assert!("0.0000000000000000001".parse::<Tes>().is_err());
    }

    #[test]
    fn test_sub_saturating() {
        let a = Tes::from_whole(1);
        let b = Tes::from_whole(2);
        assert_eq!((a - b).grains, 0);
        assert_eq!((b - a).grains, GRAIN_PER_TES);
        assert_eq!((a + b).grains, 3 * GRAIN_PER_TES);
    }

    #[test]
    fn test_display_whole() {
        assert_eq!(format!("{}", Tes::from_whole(42)), "42 TES");
        assert_eq!(format!("{}", Tes::zero()), "0 TES");
    }

    #[test]
    fn test_display_fractional() {
        let amount = Tes::from_grains(1_500_000_000_000_000_000);
        assert_eq!(format!("{}", amount), "1.5 TES");
        assert_eq!(format!("{}", Tes::from_grains(1)), "0.000000000000000001 TES");
    }

    #[test]
    fn test_to_tes_f64() {
        let amount = Tes::from_grains(2_500_000_000_000_000_000);
        assert!((amount.to_tes_f64() - 2.5).abs() < f64::EPSILON);
    }
}
