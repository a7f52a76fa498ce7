use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeNumber(pub i64);

impl fmt::Display for EnvelopeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currency amount held as whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Converts a JSON dollar figure, rounding to the nearest cent.
    pub fn from_dollars(dollars: f64) -> Result<Self, DomainError> {
        if !dollars.is_finite() || dollars < 0.0 {
            return Err(DomainError::InvalidAmount(dollars));
        }
        let cents = (dollars * 100.0).round();
        if cents > i64::MAX as f64 {
            return Err(DomainError::InvalidAmount(dollars));
        }
        Ok(Self {
            cents: cents as i64,
        })
    }

    pub fn cents(self) -> i64 {
        self.cents
    }

    /// `50` for whole dollars, `12.50` otherwise.
    pub fn dollars_text(self) -> String {
        let whole = self.cents / 100;
        let frac = self.cents % 100;
        if frac == 0 {
            whole.to_string()
        } else {
            format!("{whole}.{frac:02}")
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.dollars_text())
    }
}

/// A sponsorship envelope as served by the catalog endpoint. Read-only on the
/// client; selection state lives elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Envelope {
    pub number: EnvelopeNumber,
    pub amount: Amount,
}

impl Envelope {
    pub fn new(number: i64, amount: Amount) -> Self {
        Self {
            number: EnvelopeNumber(number),
            amount,
        }
    }
}
