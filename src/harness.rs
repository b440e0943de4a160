use crate::driver::{ScriptedBrowser, ScriptedPage};
use crate::export::write_table_csv;
use crate::model::ResultTable;
use crate::pipeline::scrape_queries;
use crate::query::{Airline, Cabin, Passengers, QuerySpec};
use anyhow::Result;
use chrono::{Duration, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration as Timeout;

#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct HarnessReport {
    pub queries_run: usize,
    pub queries_timed_out: usize,
    pub blocks_seen: usize,
    pub records_parsed: usize,
    pub blocks_rejected: usize,
    pub rows_written: usize,
}

pub fn run_harness(options: &HarnessOptions) -> Result<HarnessReport> {
    let departure = (Local::now().date_naive() + Duration::days(30))
        .format("%Y-%m-%d")
        .to_string();

    let queries = vec![
        QuerySpec::build(
            "SFO",
            "SEA",
            &departure,
            None,
            Passengers::default(),
            Cabin::Economy,
            Airline::Any,
        )?,
        QuerySpec::build(
            "PIT",
            "AUS",
            &departure,
            None,
            Passengers::default(),
            Cabin::Economy,
            Airline::Any,
        )?,
    ];

    let mut browser = ScriptedBrowser::new(vec![
        ScriptedPage::loaded(fixture_blocks()),
        ScriptedPage::timing_out(),
    ]);

    let mut table = ResultTable::default();
    let reports = scrape_queries(&mut browser, &queries, Timeout::from_secs(5), &mut table)?;

    let out_path = options.out_dir.join("flights.csv");
    write_table_csv(&table, &out_path)?;

    Ok(HarnessReport {
        queries_run: reports.len(),
        queries_timed_out: reports.iter().filter(|r| r.timed_out).count(),
        blocks_seen: reports.iter().map(|r| r.blocks_seen).sum(),
        records_parsed: reports.iter().map(|r| r.records_parsed).sum(),
        blocks_rejected: reports.iter().map(|r| r.blocks_rejected).sum(),
        rows_written: table.len(),
    })
}

// Both clock grammars plus a non-itinerary control row the extractor drops.
fn fixture_blocks() -> Vec<String> {
    vec![
        "12:10 PM \u{2013} 1:15 PM\nDelta\n2 hr 21 min\nSFO\u{2013}SEA\nNonstop\n122 kg CO2\n+20% emissions\n$74"
            .to_string(),
        "17:45 \u{2013} 22:20+1\nCathay PacificMalaysia Airlines\n19 hrs 35 min\nPIT\u{2013}AUS\n1 stop\n2 hrs 55 min HKG\n789 kg CO2\n-16% emissions\nUS$969\nround trip"
            .to_string(),
        "Show more flights\nView".to_string(),
    ]
}
