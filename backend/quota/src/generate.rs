//! # Generators
//!
//! Bulk ways of filling a selection.
//!
//! ## Random
//! Rejection sampling over `1..=total`, skipping sold numbers and repeats.
//! Gives up after `total * 10` draws. All or nothing: a short result is an error,
//! never a smaller selection.
//!
//! ## Interval
//! Every open number between two endpoints. Partial ranges are expected, so the
//! result is a preview the buyer confirms once it passes the purchase limits.
//!
//! ## Package
//! A fixed quantity picked from the storefront catalog, then drawn at random.
use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::SelectionError,
    pricing::{Cents, total_price},
    universe::{PurchaseConstraints, QuotaUniverse, SoldSet, available_count},
};

pub const DRAWS_PER_QUOTA: u64 = 10;

/// Source of uniformly drawn quota numbers.
pub trait QuotaDraw {
    /// Returns a number in `1..=upper`. `upper` is never zero.
    fn draw(&mut self, upper: u32) -> u32;
}

/// Adapts any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngDraw<R>(pub R);

impl RngDraw<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> QuotaDraw for RngDraw<R> {
    fn draw(&mut self, upper: u32) -> u32 {
        self.0.gen_range(1..=upper)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Random { count: u32 },
    Interval { from: u32, to: u32 },
    Package { quantity: u32, package_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// The selection was replaced with this many numbers.
    Applied(u32),
    /// Nothing changed yet; the caller confirms or discards.
    Preview(IntervalPreview),
}

pub fn random<D>(
    universe: QuotaUniverse,
    sold: &SoldSet,
    constraints: &PurchaseConstraints,
    count: u32,
    draw: &mut D,
) -> Result<BTreeSet<u32>, SelectionError>
where
    D: QuotaDraw + ?Sized,
{
    let available = available_count(universe, sold);

    if available == 0 {
        return Err(SelectionError::NoQuotasAvailable);
    }
    if count == 0 || count < constraints.min() {
        return Err(SelectionError::BelowMinimum(constraints.min()));
    }
    if let Some(max) = constraints.max() {
        if count > max {
            return Err(SelectionError::AboveMaximum(max));
        }
    }
    if count > available {
        return Err(SelectionError::InsufficientAvailableQuotas);
    }

    let total = universe.total();
    let max_draws = u64::from(total) * DRAWS_PER_QUOTA;
    let mut picked = BTreeSet::new();
    let mut draws = 0;

    while picked.len() < count as usize && draws < max_draws {
        let number = draw.draw(total);
        draws += 1;

        if !universe.contains(number) || sold.contains(number) {
            #[cfg(feature = "verbose")]
            tracing::trace!(number, "Draw rejected");

            continue;
        }

        picked.insert(number);
    }

    if picked.len() != count as usize {
        warn!(
            requested = count,
            drawn = picked.len(),
            draws,
            "Random draw ran out of attempts"
        );

        return Err(SelectionError::InsufficientAvailableQuotas);
    }

    debug!(count, draws, "Random draw complete");

    Ok(picked)
}

/// Open numbers between two endpoints, in either order.
pub fn interval(
    universe: QuotaUniverse,
    sold: &SoldSet,
    constraints: &PurchaseConstraints,
    from: u32,
    to: u32,
) -> IntervalPreview {
    let low = from.min(to).max(1);
    let high = from.max(to).min(universe.total());

    scan(sold, constraints, low, high)
}

/// Draws `quantity` numbers for a catalog bundle. Same rules as [`random`].
pub fn package<D>(
    universe: QuotaUniverse,
    sold: &SoldSet,
    constraints: &PurchaseConstraints,
    quantity: u32,
    package_id: &str,
    draw: &mut D,
) -> Result<BTreeSet<u32>, SelectionError>
where
    D: QuotaDraw + ?Sized,
{
    debug!(package_id, quantity, "Drawing package");

    random(universe, sold, constraints, quantity, draw)
}

fn scan(sold: &SoldSet, constraints: &PurchaseConstraints, low: u32, high: u32) -> IntervalPreview {
    let candidates: BTreeSet<u32> = if low > high {
        BTreeSet::new()
    } else {
        (low..=high).filter(|number| !sold.contains(*number)).collect()
    };

    let verdict = check_interval(candidates.len() as u32, constraints);

    IntervalPreview {
        from: low,
        to: high,
        candidates,
        verdict,
    }
}

fn check_interval(count: u32, constraints: &PurchaseConstraints) -> Result<(), SelectionError> {
    if count == 0 {
        return Err(SelectionError::NoQuotasAvailable);
    }
    if count < constraints.min() {
        return Err(SelectionError::BelowMinimum(constraints.min()));
    }
    match constraints.max() {
        Some(max) if count > max => Err(SelectionError::AboveMaximum(max)),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalPreview {
    from: u32,
    to: u32,
    candidates: BTreeSet<u32>,
    verdict: Result<(), SelectionError>,
}

impl IntervalPreview {
    /// Canonical range actually scanned.
    pub fn range(&self) -> (u32, u32) {
        (self.from, self.to)
    }

    pub fn candidates(&self) -> &BTreeSet<u32> {
        &self.candidates
    }

    pub fn count(&self) -> u32 {
        self.candidates.len() as u32
    }

    pub fn verdict(&self) -> Result<(), SelectionError> {
        self.verdict
    }

    pub fn into_candidates(self) -> BTreeSet<u32> {
        self.candidates
    }

    /// Scans the same range again against a newer sold set and limits.
    pub fn recheck(&self, sold: &SoldSet, constraints: &PurchaseConstraints) -> Self {
        scan(sold, constraints, self.from, self.to)
    }
}

/// A storefront bundle. Only `quantity` matters to the draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub quantity: u32,
    pub title: String,
    pub tag: Option<String>,
    pub highlight: String,
    pub description: String,
    pub old_price: Option<Cents>,
}

impl Package {
    pub fn price(&self, unit_price: Cents) -> Cents {
        total_price(self.quantity, unit_price)
    }

    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::Package {
            quantity: self.quantity,
            package_id: self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    packages: Vec<Package>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::storefront()
    }
}

impl Catalog {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// Bundles offered on the raffle page.
    pub fn storefront() -> Self {
        Self::new(vec![
            Package {
                id: "p5".to_string(),
                quantity: 5,
                title: "BASIC".to_string(),
                tag: None,
                highlight: "5 numbers for the draw".to_string(),
                description: "1 ebook for only:".to_string(),
                old_price: Some(Cents(1_000)),
            },
            Package {
                id: "p10".to_string(),
                quantity: 10,
                title: "PLUS".to_string(),
                tag: Some("POPULAR".to_string()),
                highlight: "10 numbers for the draw".to_string(),
                description: "2 ebooks for only:".to_string(),
                old_price: Some(Cents(5_000)),
            },
            Package {
                id: "p50".to_string(),
                quantity: 50,
                title: "NITRO 2x".to_string(),
                tag: Some("BEST VALUE".to_string()),
                highlight: "50 numbers for the draw".to_string(),
                description: "10 ebooks for only:".to_string(),
                old_price: Some(Cents(10_000)),
            },
        ])
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|package| package.id == id)
    }

    pub fn request(&self, id: &str) -> Option<GenerationRequest> {
        self.get(id).map(Package::request)
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[cfg(test)]
pub(crate) struct ScriptedDraw {
    numbers: Vec<u32>,
    next: usize,
}

#[cfg(test)]
impl ScriptedDraw {
    pub(crate) fn new(numbers: Vec<u32>) -> Self {
        Self { numbers, next: 0 }
    }
}

#[cfg(test)]
impl QuotaDraw for ScriptedDraw {
    fn draw(&mut self, _upper: u32) -> u32 {
        let number = self.numbers[self.next % self.numbers.len()];
        self.next += 1;

        number
    }
}
