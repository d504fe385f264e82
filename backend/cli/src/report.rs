use std::num::NonZeroU32;

use quota::{
    Catalog, Cents, ConstraintSummary, IntervalPreview, Raffle, SelectionEngine, Validation,
    pricing::ebook_hint,
};

/// Zero-padded badges, as wide as the largest quota number.
pub fn badges<'a, I>(numbers: I, total: u32) -> String
where
    I: IntoIterator<Item = &'a u32>,
{
    let width = total.to_string().len();

    numbers
        .into_iter()
        .map(|number| format!("{number:0width$}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn overview(
    raffle: &Raffle,
    engine: &SelectionEngine,
    catalog: &Catalog,
    unit_price: Cents,
) -> String {
    let bounds = engine
        .constraints()
        .input_bounds(engine.universe(), engine.available());

    let mut lines = vec![raffle.title.clone()];
    if !raffle.description_award.is_empty() {
        lines.push(format!("Award: {}", raffle.description_award));
    }
    lines.push(format!("Price per quota: {unit_price}"));
    lines.push(format!(
        "Quotas: {} total, {} available ({:.0}% sold)",
        engine.universe().total(),
        engine.available(),
        raffle.sold_percentage()
    ));
    lines.push(format!("Quantity picker: {} to {}", bounds.min, bounds.max));
    lines.push(ConstraintSummary::new(engine.constraints(), engine.available()).to_string());

    lines.push("\nPackages:".to_string());
    for package in catalog.packages() {
        let tag = package
            .tag
            .as_deref()
            .map(|tag| format!(" [{tag}]"))
            .unwrap_or_default();
        let old_price = package
            .old_price
            .map(|price| format!(" (was {price})"))
            .unwrap_or_default();

        lines.push(format!(
            "  {:<4} {}{}: {}, {} {}{}",
            package.id,
            package.title,
            tag,
            package.highlight,
            package.description,
            package.price(unit_price),
            old_price
        ));
    }

    to_block(lines)
}

pub fn selection(engine: &SelectionEngine, unit_price: Cents, ratio: NonZeroU32) -> String {
    let summary = engine.summary(unit_price, ratio);

    let verdict = match summary.validation {
        Validation::Valid => "Ready to reserve.".to_string(),
        Validation::NothingSelected => "Nothing selected yet.".to_string(),
        Validation::Invalid(error) => error.to_string(),
    };

    to_block(vec![
        format!(
            "Selected: {}",
            badges(engine.selection(), engine.universe().total())
        ),
        format!("Quantity of quotas: {}", summary.count),
        format!("Total: {}", summary.total_price),
        ebook_hint(summary.count, ratio),
        summary.constraints.to_string(),
        verdict,
    ])
}

pub fn preview(preview: &IntervalPreview, total: u32) -> String {
    let (from, to) = preview.range();

    let verdict = match preview.verdict() {
        Ok(()) => format!("Accepted, confirm with `reserve --quotas {from}-{to}`."),
        Err(error) => format!("Rejected: {error}"),
    };

    to_block(vec![
        format!("Interval {from} to {to}: {} open quota(s)", preview.count()),
        badges(preview.candidates(), total),
        verdict,
    ])
}

/// One line per entry, newline terminated.
fn to_block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}
