use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use quota::{Raffle, Reservation};
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::CliError,
    models::{RAFFLE_PATH, RESERVATION_PATH, ReservationReceipt},
};

pub struct Remote {
    client: Client,
    api_url: String,
}

impl Remote {
    pub fn new(config: &Config) -> Result<Self, CliError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn raffle_url(&self, id: u64) -> String {
        format!("{}/{RAFFLE_PATH}/{id}", self.api_url)
    }

    pub fn reservation_url(&self) -> String {
        format!("{}/{RESERVATION_PATH}", self.api_url)
    }

    pub async fn raffle(&self, id: u64) -> Result<Raffle, CliError> {
        let url = self.raffle_url(id);
        let spinner = spinner(format!("Fetching raffle {id}"));

        debug!("GET {url}");
        let response = self.client.get(&url).send().await;
        spinner.finish_and_clear();

        let bytes = response?.error_for_status()?.bytes().await?;
        let raffle: Raffle = serde_json::from_slice(&bytes)?;

        info!(
            id,
            quotas = raffle.number_of_shares,
            "Loaded raffle {:?}",
            raffle.title
        );

        Ok(raffle)
    }

    pub async fn reserve(&self, reservation: &Reservation) -> Result<ReservationReceipt, CliError> {
        let url = self.reservation_url();
        let spinner = spinner(format!(
            "Reserving {} quota(s)",
            reservation.quota_ids.len()
        ));

        debug!("POST {url}");
        let response = self.client.post(&url).json(reservation).send().await;
        spinner.finish_and_clear();

        let bytes = response?.error_for_status()?.bytes().await?;

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner
}
