use thiserror::Error;

/// Recoverable, user-correctable outcomes of selecting or generating quotas.
///
/// The display strings double as the inline messages shown next to the
/// quantity picker.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Minimum purchase: {0} quota(s).")]
    BelowMinimum(u32),

    #[error("Maximum purchase: {0} quota(s).")]
    AboveMaximum(u32),

    #[error("There are no quotas available right now.")]
    NoQuotasAvailable,

    #[error("Could not generate the requested amount (not enough quotas available).")]
    InsufficientAvailableQuotas,
}

/// Raffle records that break the universe invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Quota {number} is outside the raffle range 1..={total}")]
    QuotaOutOfRange { number: u32, total: u32 },

    #[error("Invalid quota price: {0}")]
    InvalidPrice(f64),
}
