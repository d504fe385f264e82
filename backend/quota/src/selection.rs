//! # Selection
//!
//! The quotas a buyer has picked for one raffle view.
//!
//! ## Invariants
//! - Never holds a sold or reserved number
//! - Never holds a number outside `1..=total`
//! - Adding stops at the effective maximum, removing is always allowed
//!
//! An under-sized selection is flagged by [`SelectionEngine::validate`] rather
//! than blocked, so deselecting never traps the buyer.
use std::{collections::BTreeSet, num::NonZeroU32};

use tracing::{debug, info};

use crate::{
    error::{RecordError, SelectionError},
    generate::{GenerationRequest, Generated, IntervalPreview, QuotaDraw, interval, package, random},
    pricing::{Cents, ConstraintSummary, ebooks_for, total_price},
    record::{Buyer, Reservation},
    universe::{PurchaseConstraints, QuotaUniverse, SoldSet, available_count},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Sold, reserved or out of range. Silently ignored.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid,
    NothingSelected,
    Invalid(SelectionError),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    /// Inline message to render, if any. An empty selection has none.
    pub fn message(&self) -> Option<String> {
        match self {
            Validation::Invalid(error) => Some(error.to_string()),
            Validation::Valid | Validation::NothingSelected => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub count: u32,
    pub available: u32,
    pub total_price: Cents,
    pub ebooks: u32,
    pub constraints: ConstraintSummary,
    pub validation: Validation,
}

#[derive(Debug, Clone)]
pub struct SelectionEngine {
    universe: QuotaUniverse,
    sold: SoldSet,
    constraints: PurchaseConstraints,
    selection: BTreeSet<u32>,
    pending: Option<SelectionError>,
}

impl SelectionEngine {
    pub fn new(universe: QuotaUniverse, sold: SoldSet, constraints: PurchaseConstraints) -> Self {
        Self {
            universe,
            sold,
            constraints,
            selection: BTreeSet::new(),
            pending: None,
        }
    }

    pub fn universe(&self) -> QuotaUniverse {
        self.universe
    }

    pub fn sold(&self) -> &SoldSet {
        &self.sold
    }

    pub fn constraints(&self) -> &PurchaseConstraints {
        &self.constraints
    }

    pub fn selection(&self) -> &BTreeSet<u32> {
        &self.selection
    }

    pub fn len(&self) -> u32 {
        self.selection.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn available(&self) -> u32 {
        available_count(self.universe, &self.sold)
    }

    pub fn effective_max(&self) -> u32 {
        self.constraints.effective_max(self.available())
    }

    /// Last rejected mutation, until the next clear or replace.
    pub fn pending(&self) -> Option<SelectionError> {
        self.pending
    }

    pub fn is_selectable(&self, number: u32) -> bool {
        self.universe.contains(number) && !self.sold.contains(number)
    }

    pub fn toggle(&mut self, number: u32) -> Result<ToggleOutcome, SelectionError> {
        if !self.is_selectable(number) {
            return Ok(ToggleOutcome::Unavailable);
        }

        if self.selection.remove(&number) {
            self.pending = None;
            return Ok(ToggleOutcome::Removed);
        }

        let max = self.effective_max();
        if self.len() + 1 > max {
            let error = SelectionError::AboveMaximum(max);
            self.pending = Some(error);

            return Err(error);
        }

        self.selection.insert(number);
        self.pending = None;

        Ok(ToggleOutcome::Added)
    }

    /// Swaps the whole selection. Limits are not enforced here, only
    /// reported by [`Self::validate`]. Unavailable numbers are dropped.
    pub fn replace<I>(&mut self, numbers: I) -> u32
    where
        I: IntoIterator<Item = u32>,
    {
        let (kept, dropped): (BTreeSet<u32>, BTreeSet<u32>) = numbers
            .into_iter()
            .partition(|number| self.is_selectable(*number));

        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "Unavailable quotas left out of selection");
        }

        self.selection = kept;
        self.pending = None;

        self.len()
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.pending = None;
    }

    pub fn validate(&self) -> Validation {
        if self.available() == 0 {
            return Validation::Invalid(SelectionError::NoQuotasAvailable);
        }

        let count = self.len();
        if count == 0 {
            return Validation::NothingSelected;
        }
        if count < self.constraints.min() {
            return Validation::Invalid(SelectionError::BelowMinimum(self.constraints.min()));
        }

        let max = self.effective_max();
        if count > max {
            return Validation::Invalid(SelectionError::AboveMaximum(max));
        }

        Validation::Valid
    }

    /// Installs a freshly fetched sold set and evicts every selected number
    /// it now covers. Returns the evicted numbers.
    ///
    /// The sold set must fit this engine's universe; a record of a different
    /// size needs a new engine.
    pub fn refresh(&mut self, sold: SoldSet) -> Result<Vec<u32>, RecordError> {
        if let Some(number) = sold.iter().find(|number| !self.universe.contains(*number)) {
            return Err(RecordError::QuotaOutOfRange {
                number,
                total: self.universe.total(),
            });
        }

        self.sold = sold;
        self.pending = None;

        let evicted: Vec<u32> = self
            .selection
            .iter()
            .copied()
            .filter(|number| self.sold.contains(*number))
            .collect();

        for number in &evicted {
            self.selection.remove(number);
        }

        if !evicted.is_empty() {
            info!(
                evicted = evicted.len(),
                "Selected quotas were taken by another buyer"
            );
        }

        Ok(evicted)
    }

    /// Random and package requests replace the selection on success and leave it
    /// untouched on failure. Interval requests only produce a preview.
    pub fn generate<D>(
        &mut self,
        request: &GenerationRequest,
        draw: &mut D,
    ) -> Result<Generated, SelectionError>
    where
        D: QuotaDraw + ?Sized,
    {
        let drawn = match request {
            GenerationRequest::Interval { from, to } => {
                return Ok(Generated::Preview(self.preview_interval(*from, *to)));
            }
            GenerationRequest::Random { count } => {
                random(self.universe, &self.sold, &self.constraints, *count, draw)
            }
            GenerationRequest::Package {
                quantity,
                package_id,
            } => package(
                self.universe,
                &self.sold,
                &self.constraints,
                *quantity,
                package_id,
                draw,
            ),
        };

        match drawn {
            Ok(numbers) => Ok(Generated::Applied(self.replace(numbers))),
            Err(error) => {
                self.pending = Some(error);
                Err(error)
            }
        }
    }

    pub fn preview_interval(&self, from: u32, to: u32) -> IntervalPreview {
        interval(self.universe, &self.sold, &self.constraints, from, to)
    }

    /// Applies an accepted preview. The range is scanned again first, so numbers
    /// sold since the preview was shown count against the limits.
    pub fn confirm(&mut self, preview: IntervalPreview) -> Result<u32, SelectionError> {
        let fresh = preview.recheck(&self.sold, &self.constraints);

        if let Err(error) = fresh.verdict() {
            self.pending = Some(error);
            return Err(error);
        }

        if fresh.count() < preview.count() {
            debug!(
                previewed = preview.count(),
                confirmed = fresh.count(),
                "Interval shrank before confirmation"
            );
        }

        Ok(self.replace(fresh.into_candidates()))
    }

    pub fn summary(&self, unit_price: Cents, quotas_per_ebook: NonZeroU32) -> SelectionSummary {
        let count = self.len();
        let available = self.available();

        SelectionSummary {
            count,
            available,
            total_price: total_price(count, unit_price),
            ebooks: ebooks_for(count, quotas_per_ebook),
            constraints: ConstraintSummary::new(&self.constraints, available),
            validation: self.validate(),
        }
    }

    /// Payload for the reservation endpoint. Only a valid selection qualifies.
    pub fn reservation(&self, raffle_id: u64, buyer: Buyer) -> Result<Reservation, SelectionError> {
        match self.validate() {
            Validation::Valid => Ok(Reservation::new(
                self.selection.iter().copied().collect(),
                raffle_id,
                buyer,
            )),
            Validation::NothingSelected => {
                Err(SelectionError::BelowMinimum(self.constraints.min()))
            }
            Validation::Invalid(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generate::{Catalog, ScriptedDraw},
        pricing::QUOTAS_PER_EBOOK,
    };

    fn engine(total: u32, sold: &[u32], min: u32, max: Option<u32>) -> SelectionEngine {
        let universe = QuotaUniverse::new(total);
        let sold = SoldSet::new(universe, sold.iter().copied()).unwrap();

        SelectionEngine::new(universe, sold, PurchaseConstraints::new(min, max))
    }

    fn buyer() -> Buyer {
        Buyer::new("Ana Souza", "ana@example.com", "123.456.789-09", "(11) 91234-5678")
    }

    #[test]
    fn test_toggle_sold_is_noop() {
        let mut engine = engine(10, &[3, 7], 1, Some(5));
        engine.toggle(1).unwrap();

        assert_eq!(engine.toggle(3), Ok(ToggleOutcome::Unavailable));
        assert_eq!(engine.selection(), &BTreeSet::from([1]));
        assert_eq!(engine.pending(), None);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut engine = engine(10, &[], 1, None);

        assert_eq!(engine.toggle(0), Ok(ToggleOutcome::Unavailable));
        assert_eq!(engine.toggle(11), Ok(ToggleOutcome::Unavailable));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut engine = engine(10, &[3], 1, None);
        engine.replace([1, 2]);

        assert_eq!(engine.toggle(5), Ok(ToggleOutcome::Added));
        assert_eq!(engine.toggle(5), Ok(ToggleOutcome::Removed));
        assert_eq!(engine.selection(), &BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_toggle_rejects_past_max() {
        let mut engine = engine(10, &[], 1, Some(2));
        engine.toggle(1).unwrap();
        engine.toggle(2).unwrap();

        assert_eq!(engine.toggle(3), Err(SelectionError::AboveMaximum(2)));
        assert_eq!(engine.selection(), &BTreeSet::from([1, 2]));
        assert_eq!(engine.pending(), Some(SelectionError::AboveMaximum(2)));

        // removal is always fine and clears the message
        assert_eq!(engine.toggle(2), Ok(ToggleOutcome::Removed));
        assert_eq!(engine.pending(), None);
    }

    #[test]
    fn test_remove_below_minimum_is_advisory() {
        let mut engine = engine(10, &[], 3, None);
        engine.replace([1, 2, 3]);
        assert_eq!(engine.validate(), Validation::Valid);

        assert_eq!(engine.toggle(3), Ok(ToggleOutcome::Removed));
        assert_eq!(
            engine.validate(),
            Validation::Invalid(SelectionError::BelowMinimum(3))
        );
    }

    #[test]
    fn test_validate_states() {
        let mut engine = engine(10, &[3, 7], 2, Some(5));

        assert_eq!(engine.validate(), Validation::NothingSelected);
        assert_eq!(engine.validate().message(), None);

        engine.replace([1]);
        assert_eq!(
            engine.validate(),
            Validation::Invalid(SelectionError::BelowMinimum(2))
        );

        engine.replace([1, 2, 4, 5, 6, 8]);
        assert_eq!(
            engine.validate(),
            Validation::Invalid(SelectionError::AboveMaximum(5))
        );
        assert_eq!(
            engine.validate().message().as_deref(),
            Some("Maximum purchase: 5 quota(s).")
        );

        engine.replace([1, 2]);
        assert!(engine.validate().is_valid());
    }

    #[test]
    fn test_validate_fully_sold() {
        let engine = engine(5, &[1, 2, 3, 4, 5], 1, None);

        assert_eq!(
            engine.validate(),
            Validation::Invalid(SelectionError::NoQuotasAvailable)
        );
    }

    #[test]
    fn test_replace_drops_unavailable() {
        let mut engine = engine(10, &[3, 7], 1, None);

        assert_eq!(engine.replace([1, 3, 7, 12, 4]), 2);
        assert_eq!(engine.selection(), &BTreeSet::from([1, 4]));
    }

    #[test]
    fn test_clear_resets_pending() {
        let mut engine = engine(10, &[], 1, Some(1));
        engine.toggle(1).unwrap();
        assert!(engine.toggle(2).is_err());

        engine.clear();

        assert!(engine.is_empty());
        assert_eq!(engine.pending(), None);
    }

    #[test]
    fn test_generate_random() {
        let mut engine = engine(10, &[3, 7], 1, Some(5));
        let mut draw = ScriptedDraw::new(vec![3, 4, 7, 10, 4, 1]);

        let generated = engine
            .generate(&GenerationRequest::Random { count: 3 }, &mut draw)
            .unwrap();

        assert_eq!(generated, Generated::Applied(3));
        assert_eq!(engine.selection(), &BTreeSet::from([1, 4, 10]));
    }

    #[test]
    fn test_generate_failure_keeps_selection() {
        let mut engine = engine(10, &[3, 7], 1, Some(5));
        engine.replace([1, 2]);
        let mut draw = ScriptedDraw::new(vec![3, 7]);

        assert_eq!(
            engine.generate(&GenerationRequest::Random { count: 3 }, &mut draw),
            Err(SelectionError::InsufficientAvailableQuotas)
        );
        assert_eq!(engine.selection(), &BTreeSet::from([1, 2]));
        assert_eq!(
            engine.pending(),
            Some(SelectionError::InsufficientAvailableQuotas)
        );
    }

    #[test]
    fn test_generate_package_respects_max() {
        let mut engine = engine(100, &[], 1, Some(20));
        let request = Catalog::storefront().request("p50").unwrap();
        let mut draw = ScriptedDraw::new((1..=100).collect());

        assert_eq!(
            engine.generate(&request, &mut draw),
            Err(SelectionError::AboveMaximum(20))
        );

        let request = Catalog::storefront().request("p10").unwrap();
        assert_eq!(engine.generate(&request, &mut draw), Ok(Generated::Applied(10)));
        assert_eq!(engine.selection(), &(1..=10).collect::<BTreeSet<u32>>());
    }

    #[test]
    fn test_generate_fully_sold() {
        let mut engine = engine(5, &[1, 2, 3, 4, 5], 1, None);
        let mut draw = ScriptedDraw::new(vec![1]);

        assert_eq!(
            engine.generate(&GenerationRequest::Random { count: 1 }, &mut draw),
            Err(SelectionError::NoQuotasAvailable)
        );

        let Ok(Generated::Preview(preview)) =
            engine.generate(&GenerationRequest::Interval { from: 1, to: 5 }, &mut draw)
        else {
            panic!("interval requests always preview");
        };
        assert_eq!(preview.verdict(), Err(SelectionError::NoQuotasAvailable));
    }

    #[test]
    fn test_interval_preview_then_confirm() {
        let mut engine = engine(10, &[3, 7], 1, Some(5));
        engine.replace([9]);

        let rejected = engine.preview_interval(1, 10);
        assert_eq!(engine.confirm(rejected), Err(SelectionError::AboveMaximum(5)));
        assert_eq!(engine.selection(), &BTreeSet::from([9]));

        let accepted = engine.preview_interval(6, 2);
        assert_eq!(engine.confirm(accepted), Ok(4));
        assert_eq!(engine.selection(), &BTreeSet::from([2, 4, 5, 6]));
    }

    #[test]
    fn test_refresh_evicts_newly_sold() {
        let mut engine = engine(10, &[3], 1, None);
        engine.replace([1, 2, 4]);

        let sold = SoldSet::new(engine.universe(), [2, 3, 4]).unwrap();
        let evicted = engine.refresh(sold).unwrap();

        assert_eq!(evicted, vec![2, 4]);
        assert_eq!(engine.selection(), &BTreeSet::from([1]));
        assert_eq!(engine.available(), 7);
    }

    #[test]
    fn test_refresh_rejects_larger_universe() {
        let mut engine = engine(5, &[], 1, None);
        engine.replace([1, 2]);

        let sold = SoldSet::new(QuotaUniverse::new(100), [50, 60, 70, 80, 90]).unwrap();

        assert_eq!(
            engine.refresh(sold),
            Err(RecordError::QuotaOutOfRange {
                number: 50,
                total: 5
            })
        );
        assert!(engine.sold().is_empty());
        assert_eq!(engine.available(), 5);
        assert_eq!(engine.selection(), &BTreeSet::from([1, 2]));
        assert_eq!(engine.toggle(3), Ok(ToggleOutcome::Added));
    }

    #[test]
    fn test_refresh_clears_pending() {
        let mut engine = engine(10, &[], 1, Some(1));
        engine.toggle(1).unwrap();
        assert_eq!(engine.toggle(2), Err(SelectionError::AboveMaximum(1)));
        assert_eq!(engine.pending(), Some(SelectionError::AboveMaximum(1)));

        let sold = SoldSet::new(engine.universe(), [1]).unwrap();
        engine.refresh(sold).unwrap();

        assert_eq!(engine.pending(), None);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_confirm_rechecks_after_refresh() {
        let mut engine = engine(10, &[], 3, None);
        let preview = engine.preview_interval(1, 3);
        assert_eq!(preview.verdict(), Ok(()));

        let sold = SoldSet::new(engine.universe(), [2, 3]).unwrap();
        engine.refresh(sold).unwrap();

        assert_eq!(engine.confirm(preview), Err(SelectionError::BelowMinimum(3)));
        assert!(engine.is_empty());
        assert_eq!(engine.pending(), Some(SelectionError::BelowMinimum(3)));
        assert_eq!(engine.validate(), Validation::NothingSelected);
    }

    #[test]
    fn test_confirm_applies_shrunk_interval() {
        let mut engine = engine(10, &[], 1, Some(5));
        let preview = engine.preview_interval(1, 4);

        let sold = SoldSet::new(engine.universe(), [4]).unwrap();
        engine.refresh(sold).unwrap();

        assert_eq!(engine.confirm(preview), Ok(3));
        assert_eq!(engine.selection(), &BTreeSet::from([1, 2, 3]));
        assert_eq!(engine.validate(), Validation::Valid);
    }

    #[test]
    fn test_summary() {
        let mut engine = engine(10, &[3, 7], 1, Some(5));
        engine.replace([1, 2, 4, 5]);

        let summary = engine.summary(Cents(2500), QUOTAS_PER_EBOOK);

        assert_eq!(summary.count, 4);
        assert_eq!(summary.available, 8);
        assert_eq!(summary.total_price, Cents(10_000));
        assert_eq!(summary.ebooks, 1);
        assert_eq!(summary.constraints.to_string(), "Min: 1 • Max: 5");
        assert_eq!(summary.validation, Validation::Valid);
    }

    #[test]
    fn test_reservation_requires_valid_selection() {
        let mut engine = engine(10, &[3, 7], 2, Some(5));

        assert_eq!(
            engine.reservation(42, buyer()),
            Err(SelectionError::BelowMinimum(2))
        );

        engine.replace([8, 1]);
        let reservation = engine.reservation(42, buyer()).unwrap();

        assert_eq!(reservation.quota_ids, vec![1, 8]);
        assert_eq!(reservation.raffle_id, 42);
        assert_eq!(reservation.buyer.cpf, "12345678909");
    }
}
