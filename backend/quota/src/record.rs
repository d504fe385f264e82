//! # Raffle Record
//!
//! Shapes exchanged with the REST backend, camelCase on the wire.
//!
//! ## Raffle
//! - `numberOfShares` sizes the universe
//! - `quotas[]` carries per-number state, sold **or** reserved numbers are unavailable
//! - `minPurchaseShares` / `maxPurchaseShares` are optional, zero means unset
//!
//! ## Reservation
//! - `{ quotaIds, raffleId, buyer }`
//! - Buyer CPF goes out as digits only
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::RecordError,
    pricing::Cents,
    selection::SelectionEngine,
    universe::{PurchaseConstraints, QuotaUniverse, SoldSet},
};

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\D").expect("Hard-coded pattern must compile"));

pub fn only_digits(input: &str) -> String {
    NON_DIGITS.replace_all(input, "").into_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub number: u32,
    #[serde(default)]
    pub sold: bool,
    #[serde(default)]
    pub reserved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_purchase_id: Option<u64>,
}

impl Quota {
    pub fn is_taken(&self) -> bool {
        self.sold || self.reserved
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Raffle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_award: String,
    pub quota_price: f64,
    #[serde(default)]
    pub show_quotas: bool,
    #[serde(default)]
    pub quotas: Vec<Quota>,
    pub number_of_shares: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_purchase_shares: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_purchase_shares: Option<u32>,
}

impl Raffle {
    pub fn universe(&self) -> QuotaUniverse {
        QuotaUniverse::new(self.number_of_shares)
    }

    pub fn sold_set(&self) -> Result<SoldSet, RecordError> {
        SoldSet::new(
            self.universe(),
            self.quotas
                .iter()
                .filter(|quota| quota.is_taken())
                .map(|quota| quota.number),
        )
    }

    pub fn constraints(&self) -> PurchaseConstraints {
        let min = self.min_purchase_shares.filter(|min| *min > 0).unwrap_or(1);
        let max = self.max_purchase_shares.filter(|max| *max > 0);

        PurchaseConstraints::new(min, max)
    }

    pub fn unit_price(&self) -> Result<Cents, RecordError> {
        Cents::from_reais(self.quota_price)
    }

    /// Percentage sold, as reported by the backend or counted from the quota list.
    pub fn sold_percentage(&self) -> f64 {
        if let Some(percentage) = self.sold_percentage {
            return percentage;
        }
        if self.quotas.is_empty() {
            return 0.0;
        }

        let sold = self.quotas.iter().filter(|quota| quota.sold).count();

        sold as f64 / self.quotas.len() as f64 * 100.0
    }

    /// Numbers bought by `user_id`, for highlighting the buyer's own quotas.
    pub fn purchased_by(&self, user_id: u64) -> Vec<u32> {
        self.quotas
            .iter()
            .filter(|quota| quota.user_purchase_id == Some(user_id))
            .map(|quota| quota.number)
            .collect()
    }

    pub fn engine(&self) -> Result<SelectionEngine, RecordError> {
        Ok(SelectionEngine::new(
            self.universe(),
            self.sold_set()?,
            self.constraints(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub full_name: String,
    pub email: String,
    pub cpf: String,
    pub number_phone: String,
}

impl Buyer {
    pub fn new(full_name: &str, email: &str, cpf: &str, number_phone: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_string(),
            cpf: only_digits(cpf),
            number_phone: number_phone.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub quota_ids: Vec<u32>,
    pub raffle_id: u64,
    pub buyer: Buyer,
}

impl Reservation {
    pub fn new(quota_ids: Vec<u32>, raffle_id: u64, buyer: Buyer) -> Self {
        Self {
            quota_ids,
            raffle_id,
            buyer,
        }
    }
}
