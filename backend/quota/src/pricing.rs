//! # Pricing
//!
//! Pure derivations from the selection size. Nothing here validates, it only
//! formats what [`crate::selection::SelectionEngine::validate`] decided.
//!
//! Money is kept as integer centavos so totals never drift.
use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

use crate::{error::RecordError, universe::PurchaseConstraints};

/// Every 5 quotas bought come with 1 ebook.
pub const QUOTAS_PER_EBOOK: NonZeroU32 = NonZeroU32::new(5).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Cents(pub u64);

impl Cents {
    pub fn from_reais(reais: f64) -> Result<Self, RecordError> {
        if !reais.is_finite() || reais < 0.0 {
            return Err(RecordError::InvalidPrice(reais));
        }

        Ok(Self((reais * 100.0).round() as u64))
    }

    pub fn reais(&self) -> u64 {
        self.0 / 100
    }

    pub fn centavos(&self) -> u64 {
        self.0 % 100
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.reais().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        write!(f, "R$ {},{:02}", grouped, self.centavos())
    }
}

pub fn total_price(count: u32, unit_price: Cents) -> Cents {
    Cents(unit_price.0.saturating_mul(u64::from(count)))
}

/// Ebooks owed for `count` quotas. A partial group still earns a full ebook.
pub fn ebooks_for(count: u32, ratio: NonZeroU32) -> u32 {
    count.div_ceil(ratio.get())
}

pub fn ebook_hint(count: u32, ratio: NonZeroU32) -> String {
    let rule = format!("Every {} quotas = 1 ebook", ratio);

    if count == 0 {
        return format!("{rule}.");
    }

    format!(
        "{rule} • For {count} quotas: {} ebook(s).",
        ebooks_for(count, ratio)
    )
}

/// Display-only view of the purchase limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintSummary {
    pub min: u32,
    pub max: Option<u32>,
}

impl ConstraintSummary {
    pub fn new(constraints: &PurchaseConstraints, available: u32) -> Self {
        Self {
            min: constraints.min(),
            max: constraints
                .max()
                .map(|_| constraints.effective_max(available)),
        }
    }
}

impl fmt::Display for ConstraintSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "Min: {} • Max: {}", self.min, max),
            None => write!(f, "Min: {} • Max: —", self.min),
        }
    }
}
