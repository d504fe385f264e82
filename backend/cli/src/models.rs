use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

pub const RAFFLE_PATH: &str = "rifas";
pub const RESERVATION_PATH: &str = "reservation";

/// What the backend answers to a reservation. Payment details are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReservationReceipt {
    pub id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_of_expiration: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    Unknown,
    Expired,
    Remaining(chrono::Duration),
}

impl ReservationReceipt {
    pub fn hold(&self, now: DateTime<Utc>) -> Hold {
        let Some(expiration) = self.date_of_expiration else {
            return Hold::Unknown;
        };

        let left = expiration.with_timezone(&Utc) - now;
        if left <= chrono::Duration::zero() {
            Hold::Expired
        } else {
            Hold::Remaining(left)
        }
    }
}
