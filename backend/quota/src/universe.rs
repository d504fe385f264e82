//! # Universe
//!
//! The numbered quotas of one raffle and the numbers nobody else can take.
//!
//! - Quota numbers live in `1..=total`
//! - The sold set holds every number already sold **or** reserved by someone
//! - Both are replaced wholesale whenever the raffle record is reloaded, never merged
use std::{collections::BTreeSet, ops::RangeInclusive};

use crate::error::RecordError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuotaUniverse {
    total: u32,
}

impl QuotaUniverse {
    pub fn new(total: u32) -> Self {
        Self { total }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn contains(&self, number: u32) -> bool {
        (1..=self.total).contains(&number)
    }

    pub fn numbers(&self) -> RangeInclusive<u32> {
        1..=self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoldSet {
    numbers: BTreeSet<u32>,
}

impl SoldSet {
    /// Builds the sold set for `universe`, refusing numbers outside of it.
    pub fn new<I>(universe: QuotaUniverse, numbers: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut sold = BTreeSet::new();

        for number in numbers {
            if !universe.contains(number) {
                return Err(RecordError::QuotaOutOfRange {
                    number,
                    total: universe.total(),
                });
            }

            sold.insert(number);
        }

        Ok(Self { numbers: sold })
    }

    pub fn contains(&self, number: u32) -> bool {
        self.numbers.contains(&number)
    }

    pub fn count(&self) -> u32 {
        // bounded by the universe total, which is a u32
        self.numbers.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.numbers.iter().copied()
    }
}

/// Quotas still open to new buyers.
pub fn available_count(universe: QuotaUniverse, sold: &SoldSet) -> u32 {
    universe.total().saturating_sub(sold.count())
}

/// Purchase limits of a raffle. `max` of `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseConstraints {
    min: u32,
    max: Option<u32>,
}

impl Default for PurchaseConstraints {
    fn default() -> Self {
        Self { min: 1, max: None }
    }
}

impl PurchaseConstraints {
    /// Normalizes external limits: the minimum is at least 1 and a finite
    /// maximum is never below the minimum.
    pub fn new(min: u32, max: Option<u32>) -> Self {
        let min = min.max(1);
        let max = max.map(|max| max.max(min));

        Self { min, max }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> Option<u32> {
        self.max
    }

    pub fn effective_max(&self, available: u32) -> u32 {
        match self.max {
            Some(max) => max.min(available),
            None => available,
        }
    }

    /// Bounds for a typed quantity, always a non-empty range.
    pub fn input_bounds(&self, universe: QuotaUniverse, available: u32) -> QuantityBounds {
        let min = self.min.min(available.max(1)).max(1);
        let max = universe
            .total()
            .min(self.effective_max(available).max(1))
            .max(1);

        QuantityBounds { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    pub min: u32,
    pub max: u32,
}

impl QuantityBounds {
    pub fn clamp_quantity(&self, value: u32) -> u32 {
        value.max(self.min).min(self.max)
    }
}
