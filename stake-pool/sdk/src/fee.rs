//! Fee fractions and the arithmetic applied with them

use std::fmt;

/// Fee rate as a ratio
///
/// If either the numerator or the denominator is 0, the fee is considered to
/// be 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fee {
    /// Denominator of the fee ratio
    pub denominator: u64,
    /// Numerator of the fee ratio
    pub numerator: u64,
}

impl Fee {
    /// True when the fee takes nothing
    pub fn is_zero(&self) -> bool {
        self.numerator == 0 || self.denominator == 0
    }

    /// Applies the Fee's rates to a given amount, `amt`
    /// returning the amount to be subtracted from it as fees
    /// (0 if denominator is 0 or amt is 0),
    /// or None if overflow occurs
    #[inline]
    pub fn apply(&self, amt: u64) -> Option<u128> {
        if self.denominator == 0 {
            return Some(0);
        }
        let numerator = (amt as u128).checked_mul(self.numerator as u128)?;
        let denominator = self.denominator as u128;
        numerator
            .checked_add(denominator)?
            .checked_sub(1)?
            .checked_div(denominator)
    }

    /// The share left over after this fee, `(denominator - numerator) /
    /// denominator`.
    ///
    /// A fee above 100% leaves nothing, so the numerator bottoms out at 0.
    pub fn inverse(&self) -> Fee {
        Fee {
            denominator: self.denominator,
            numerator: self.denominator.saturating_sub(self.numerator),
        }
    }

    /// Divides `amount` by this ratio, multiplying before dividing.
    ///
    /// Used with [`Fee::inverse`] to find the gross amount that nets `amount`
    /// once the fee is taken out. A zero numerator leaves `amount` untouched
    /// rather than dividing by zero.
    pub fn apply_inverse(&self, amount: u128) -> Option<u128> {
        if self.numerator == 0 {
            return Some(amount);
        }
        amount
            .checked_mul(self.denominator as u128)?
            .checked_div(self.numerator as u128)
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.numerator > 0 && self.denominator > 0 {
            write!(f, "{}/{}", self.numerator, self.denominator)
        } else {
            write!(f, "none")
        }
    }
}

/// Fee update that "counts down" epochs before taking effect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FutureEpochFee {
    /// Nothing is set
    #[default]
    None,
    /// Value is ready after the next epoch boundary
    One(Fee),
    /// Value is ready after two epoch boundaries
    Two(Fee),
}

impl FutureEpochFee {
    /// Get the value if it's ready, which is only at `One` epoch remaining
    pub fn get(&self) -> Option<&Fee> {
        match self {
            Self::None | Self::Two(_) => None,
            Self::One(fee) => Some(fee),
        }
    }
}

impl From<FutureEpochFee> for Option<Fee> {
    fn from(value: FutureEpochFee) -> Option<Fee> {
        match value {
            FutureEpochFee::None => None,
            FutureEpochFee::One(fee) | FutureEpochFee::Two(fee) => Some(fee),
        }
    }
}
