use std::{fs, path::Path};

use chrono::Duration;
use quota::Raffle;

use crate::error::CliError;

pub fn load_raffle_file(path: &Path) -> Result<Raffle, CliError> {
    let data = fs::read(path)?;

    Ok(serde_json::from_slice(&data)?)
}

/// Parses `1,2,5-8` into individual quota numbers, in the given order.
/// Ranges must end inside `1..=total`.
pub fn parse_quota_list(input: &str, total: u32) -> Result<Vec<u32>, CliError> {
    let mut numbers = Vec::new();

    for part in input.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        match part.split_once('-') {
            Some((from, to)) => {
                let from = parse_number(from)?;
                let to = parse_number(to)?;

                if from.max(to) > total {
                    return Err(CliError::QuotaList(format!(
                        "{part} (raffle has {total} quotas)"
                    )));
                }

                numbers.extend(from.min(to)..=from.max(to));
            }
            None => numbers.push(parse_number(part)?),
        }
    }

    if numbers.is_empty() {
        return Err(CliError::QuotaList(input.to_string()));
    }

    Ok(numbers)
}

fn parse_number(input: &str) -> Result<u32, CliError> {
    input
        .trim()
        .parse()
        .map_err(|_| CliError::QuotaList(input.trim().to_string()))
}

/// `MM:SS`, floored to whole seconds and never negative.
pub fn format_time_left(left: Duration) -> String {
    let total_seconds = left.num_seconds().max(0);

    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
