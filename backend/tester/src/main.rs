use std::fs;

use anyhow::Result;
use quota::{Quota, Raffle};

const FIXTURE_PATH: &str = "../raffle.json";
const NUMBER_OF_SHARES: u32 = 200;

fn main() -> Result<()> {
    let quotas: Vec<Quota> = (1..=NUMBER_OF_SHARES)
        .map(|number| Quota {
            id: Some(u64::from(number)),
            number,
            sold: number % 7 == 0,
            reserved: number % 11 == 0,
            user_purchase_id: (number % 7 == 0).then_some(1),
        })
        .collect();

    let raffle = Raffle {
        id: Some(1),
        title: "Golden Book Raffle".to_string(),
        description: "Each ebook bought comes with numbered quotas for the draw.".to_string(),
        description_award: "A brand new bike".to_string(),
        quota_price: 2.5,
        show_quotas: true,
        quotas,
        number_of_shares: NUMBER_OF_SHARES,
        sold_percentage: None,
        min_purchase_shares: Some(5),
        max_purchase_shares: Some(100),
    };

    let engine = raffle.engine()?;
    println!("Quotas: {}", engine.universe().total());
    println!("Available: {}", engine.available());
    println!("Sold: {:.0}%", raffle.sold_percentage());

    fs::write(FIXTURE_PATH, serde_json::to_string_pretty(&raffle)?)?;
    println!("Wrote {FIXTURE_PATH}");

    Ok(())
}
