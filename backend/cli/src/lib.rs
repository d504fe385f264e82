//! # Rifa CLI
//!
//! Terminal storefront for a single raffle.
//!
//! ## Flow
//!
//! - Load the raffle record from the backend (`GET /rifas/{id}`) or a local JSON file
//! - Build the selection engine from the record
//! - Generate or hand-pick quotas, print price, ebooks and limits
//! - Reserve: re-fetch the record, evict numbers someone else took, then `POST /reservation`
//!
//! ## Environment
//!
//! - `RIFA_API_URL`: backend base URL, default `http://localhost:8089`
//! - `RIFA_QUOTAS_PER_EBOOK`: default `5`
//! - `RIFA_HTTP_TIMEOUT_SECS`: default `10`
//! - `RUST_LOG`: tracing filter
use std::path::PathBuf;

use quota::{
    Buyer, Catalog, Cents, GenerationRequest, Generated, QuotaDraw, Raffle, Reservation,
    SelectionEngine, ToggleOutcome,
};
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod report;
pub mod utils;

use error::CliError;
use remote::Remote;
use utils::load_raffle_file;

pub enum Source {
    Remote(u64),
    File(PathBuf),
}

pub async fn load_raffle(remote: &Remote, source: &Source) -> Result<Raffle, CliError> {
    match source {
        Source::Remote(id) => remote.raffle(*id).await,
        Source::File(path) => {
            info!("Reading raffle from {}", path.display());
            load_raffle_file(path)
        }
    }
}

/// One raffle view: the record, its engine and the package catalog.
pub struct Session {
    pub raffle: Raffle,
    pub engine: SelectionEngine,
    pub unit_price: Cents,
    pub catalog: Catalog,
}

impl Session {
    pub fn new(raffle: Raffle) -> Result<Self, CliError> {
        let engine = raffle.engine()?;
        let unit_price = raffle.unit_price()?;

        Ok(Self {
            raffle,
            engine,
            unit_price,
            catalog: Catalog::storefront(),
        })
    }

    pub fn package_request(&self, id: &str) -> Result<GenerationRequest, CliError> {
        self.catalog
            .request(id)
            .ok_or_else(|| CliError::UnknownPackage(id.to_string()))
    }

    pub fn generate<D>(
        &mut self,
        request: &GenerationRequest,
        draw: &mut D,
    ) -> Result<Generated, CliError>
    where
        D: QuotaDraw + ?Sized,
    {
        Ok(self.engine.generate(request, draw)?)
    }

    /// Toggles each number into an empty selection. Unavailable numbers are
    /// skipped and returned.
    pub fn select(&mut self, numbers: &[u32]) -> Result<Vec<u32>, CliError> {
        self.engine.clear();
        let mut skipped = Vec::new();

        for number in numbers {
            if self.engine.selection().contains(number) {
                continue;
            }

            if self.engine.toggle(*number)? == ToggleOutcome::Unavailable {
                skipped.push(*number);
            }
        }

        if !skipped.is_empty() {
            warn!(?skipped, "Quotas already sold, reserved or out of range");
        }

        Ok(skipped)
    }

    /// Installs a fresh copy of the record, keeping the current selection minus
    /// anything that is no longer available.
    ///
    /// A record whose size changed gets a new engine; the old selection is
    /// carried over where it still fits.
    pub fn refresh(&mut self, raffle: Raffle) -> Result<Vec<u32>, CliError> {
        let evicted = if raffle.universe() == self.engine.universe() {
            self.engine.refresh(raffle.sold_set()?)?
        } else {
            warn!(
                before = self.engine.universe().total(),
                after = raffle.number_of_shares,
                "Raffle size changed, rebuilding selection"
            );

            let previous = self.engine.selection().clone();
            let mut engine = raffle.engine()?;
            engine.replace(previous.iter().copied());

            let evicted = previous
                .difference(engine.selection())
                .copied()
                .collect();
            self.engine = engine;

            evicted
        };

        self.unit_price = raffle.unit_price()?;
        self.raffle = raffle;

        Ok(evicted)
    }

    pub fn reservation(&self, buyer: Buyer) -> Result<Reservation, CliError> {
        let raffle_id = self.raffle.id.ok_or(CliError::MissingRaffleId)?;

        Ok(self.engine.reservation(raffle_id, buyer)?)
    }
}
