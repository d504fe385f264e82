//! # Quota Selection
//!
//! Rules for picking numbered quotas in a raffle storefront.
//!
//! ## Flow
//!
//! - Caller loads a raffle record and builds a [`SelectionEngine`] from its universe, sold set and limits
//! - Buyer toggles numbers or asks a generator for a bulk pick
//! - Random and package picks replace the selection directly, interval picks come back as a preview
//! - [`SelectionEngine::validate`] decides whether the reservation action is enabled
//! - [`SelectionEngine::summary`] derives price, ebook count and limit text for display
//! - Whenever the record is fetched again, [`SelectionEngine::refresh`] swaps the sold set and evicts lost numbers
//!
//! No I/O happens in this crate. Buyer identity and the random source are always passed in.
//!
//! ## Limits
//!
//! - Minimum defaults to 1, maximum defaults to unbounded
//! - Effective maximum is the purchase maximum capped by what is still available
//! - Going below the minimum is flagged, never blocked
//!
//! ## Notes
//!
//! ### Random retries
//! Rejection sampling stops after `total * 10` draws. A heavily sold raffle may fail a request
//! that is technically satisfiable, the buyer simply tries again.
pub mod error;
pub mod generate;
pub mod pricing;
pub mod record;
pub mod selection;
pub mod universe;

#[cfg(test)]
mod proptest_selection;

pub use error::{RecordError, SelectionError};
pub use generate::{
    Catalog, GenerationRequest, Generated, IntervalPreview, Package, QuotaDraw, RngDraw,
};
pub use pricing::{Cents, ConstraintSummary, QUOTAS_PER_EBOOK};
pub use record::{Buyer, Quota, Raffle, Reservation};
pub use selection::{SelectionEngine, SelectionSummary, ToggleOutcome, Validation};
pub use universe::{PurchaseConstraints, QuantityBounds, QuotaUniverse, SoldSet};
