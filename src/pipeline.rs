use crate::config::load_plans_from_dir;
use crate::driver::Browser;
use crate::export::write_table_csv;
use crate::extract::extract_blocks;
use crate::model::{FlightRecord, QueryRunReport, ResultTable};
use crate::parser::{BlockParser, ParseError};
use crate::price::PriceParser;
use crate::query::{QuerySpec, expand_travel_plans};
use crate::resolve::resolve_times;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

// Page contract for the travel-search results view.
pub const FLIGHT_INFO_SELECTOR: &str = "//c-wiz/div/div/div/ul/li";
pub const MORE_FLIGHTS_SELECTOR: &str = "//ul/li/div/span/div/button";

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub config_dir: PathBuf,
    pub out_path: PathBuf,
    pub plan: Option<String>,
}

pub fn run_scrape(options: &ScrapeOptions, browser: &mut dyn Browser) -> Result<Vec<QueryRunReport>> {
    let mut plans = load_plans_from_dir(&options.config_dir)?;
    if let Some(filter) = &options.plan {
        plans.retain(|p| p.config.plan.key == *filter);
    }
    if plans.is_empty() {
        bail!("no matching plan configurations found");
    }

    let mut table = ResultTable::default();
    let mut reports = Vec::new();

    for plan in &plans {
        info!(plan = %plan.config.plan.key, "plan start");

        let queries = expand_travel_plans(
            &[plan.config.travel_plan()],
            plan.config.passengers,
            plan.config.options.cabin,
            plan.config.options.airline,
        )
        .with_context(|| format!("invalid query in plan {}", plan.config.plan.key))?;

        let timeout = Duration::from_secs(plan.config.options.timeout_secs);
        let plan_reports = scrape_queries(browser, &queries, timeout, &mut table)?;

        info!(
            plan = %plan.config.plan.key,
            queries = plan_reports.len(),
            parsed = plan_reports.iter().map(|r| r.records_parsed).sum::<usize>(),
            timed_out = plan_reports.iter().filter(|r| r.timed_out).count(),
            "plan complete"
        );

        reports.extend(plan_reports);
    }

    write_table_csv(&table, &options.out_path)?;
    info!(
        rows = table.len(),
        file = %options.out_path.display(),
        "result table written"
    );

    Ok(reports)
}

// One query runs to completion before the next begins; the browser session is
// a single shared collaborator.
pub fn scrape_queries(
    browser: &mut dyn Browser,
    queries: &[QuerySpec],
    timeout: Duration,
    table: &mut ResultTable,
) -> Result<Vec<QueryRunReport>> {
    let price = PriceParser::new();
    let parser = BlockParser::new();
    let mut reports = Vec::new();

    for query in queries {
        let mut report = QueryRunReport {
            query: query.lookup_string(),
            ..QueryRunReport::default()
        };

        browser
            .navigate(&query.url())
            .with_context(|| format!("navigation failed for query {}", query.lookup_string()))?;

        if !browser.wait_until_visible(FLIGHT_INFO_SELECTOR, timeout)? {
            warn!(
                query = %query.lookup_string(),
                timeout_secs = timeout.as_secs(),
                "page load timed out; no flights may be available, skipping query"
            );
            report.timed_out = true;
            reports.push(report);
            continue;
        }

        expand_more_flights(browser, timeout);

        let raw_texts = browser.locate_all(FLIGHT_INFO_SELECTOR)?;
        report.blocks_seen = raw_texts.len();

        let blocks = extract_blocks(raw_texts, &price);
        for block in &blocks {
            match assemble_record(&parser, block, query.departure_date()) {
                Ok(record) => {
                    table.push(record);
                    report.records_parsed += 1;
                }
                Err(err) => {
                    warn!(
                        query = %query.lookup_string(),
                        error = %err,
                        block = %block,
                        "rejecting unparseable block"
                    );
                    report.blocks_rejected += 1;
                }
            }
        }

        info!(
            query = %query.lookup_string(),
            blocks = report.blocks_seen,
            parsed = report.records_parsed,
            rejected = report.blocks_rejected,
            "query complete"
        );

        reports.push(report);
    }

    Ok(reports)
}

// A missing "more flights" control or a failed wait leaves the visible subset.
fn expand_more_flights(browser: &mut dyn Browser, timeout: Duration) {
    if browser.click(MORE_FLIGHTS_SELECTOR).is_err() {
        return;
    }
    let _ = browser.wait_until_visible(FLIGHT_INFO_SELECTOR, timeout);
}

pub fn assemble_record(
    parser: &BlockParser,
    block: &str,
    departure_date: NaiveDate,
) -> Result<FlightRecord, ParseError> {
    let fields = parser.parse_fields(block)?;
    let (departs, arrives) = resolve_times(departure_date, &fields.clock, fields.duration)?;
    let price = coerce_price(&fields.price_text)?;

    Ok(FlightRecord {
        departs,
        arrives,
        origin: fields.origin,
        destination: fields.destination,
        duration: fields.duration,
        price,
        airline: fields.airline,
        num_stops: fields.num_stops,
        layover_detail: fields.layover_detail,
        trip_type: fields.trip_type,
        emissions: fields.emissions,
    })
}

fn coerce_price(text: &str) -> Result<f64, ParseError> {
    text.replace(',', "").parse::<f64>().map_err(|_| {
        ParseError::UnrecognizedLayout(format!("price field {text:?} is not numeric"))
    })
}
