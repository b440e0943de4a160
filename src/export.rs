use crate::model::{FlightRecord, ResultTable};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use std::path::Path;

pub fn write_table_csv(table: &ResultTable, path: &Path) -> Result<()> {
    let with_emissions = table.has_emissions();

    let mut lines = Vec::with_capacity(table.len() + 1);
    lines.push(table.columns().join(","));
    for record in table.records() {
        lines.push(record_row(record, with_emissions));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output dir {}", parent.display()))?;
    }

    std::fs::write(path, lines.join("\n") + "\n")
        .with_context(|| format!("failed to write csv {}", path.display()))?;

    Ok(())
}

fn record_row(record: &FlightRecord, with_emissions: bool) -> String {
    let mut fields = vec![
        format_timestamp(record.departs),
        format_timestamp(record.arrives),
        record.origin.clone(),
        record.destination.clone(),
        format_duration(record.duration),
        format_price(record.price),
        record.airline.clone(),
        record.num_stops.to_string(),
        record.layover_detail.clone(),
        record.trip_type.as_str().to_string(),
    ];

    if with_emissions {
        match &record.emissions {
            Some(emissions) => {
                fields.push(emissions.co2.clone());
                fields.push(emissions.delta.clone().unwrap_or_default());
            }
            None => {
                fields.push(String::new());
                fields.push(String::new());
            }
        }
    }

    fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn format_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

fn format_duration(value: Duration) -> String {
    format!(
        "{}:{:02}:{:02}",
        value.num_hours(),
        value.num_minutes() % 60,
        value.num_seconds() % 60
    )
}

fn format_price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
