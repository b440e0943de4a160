use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripType {
    OneWay,
    RoundTrip,
    EntireTrip,
}

impl TripType {
    pub fn from_marker(text: &str) -> Option<Self> {
        match title_case(text.trim()).as_str() {
            "One-Way" => Some(TripType::OneWay),
            "Round Trip" => Some(TripType::RoundTrip),
            "Entire Trip" => Some(TripType::EntireTrip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::OneWay => "One-Way",
            TripType::RoundTrip => "Round Trip",
            TripType::EntireTrip => "Entire Trip",
        }
    }
}

pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emissions {
    pub co2: String,
    pub delta: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub departs: NaiveDateTime,
    pub arrives: NaiveDateTime,
    pub origin: String,
    pub destination: String,
    pub duration: Duration,
    pub price: f64,
    pub airline: String,
    pub num_stops: u32,
    pub layover_detail: String,
    pub trip_type: TripType,
    pub emissions: Option<Emissions>,
}

const BASE_COLUMNS: [&str; 10] = [
    "Departs",
    "Arrives",
    "Origin",
    "Destination",
    "Duration",
    "Price",
    "Airline",
    "Num_Stops",
    "Layover_Detail",
    "Trip_Type",
];

const EMISSIONS_COLUMNS: [&str; 2] = ["Emissions_CO2", "Emissions_Delta"];

#[derive(Debug, Default)]
pub struct ResultTable {
    records: Vec<FlightRecord>,
}

impl ResultTable {
    pub fn push(&mut self, record: FlightRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_emissions(&self) -> bool {
        self.records.iter().any(|r| r.emissions.is_some())
    }

    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = BASE_COLUMNS.to_vec();
        if self.has_emissions() {
            columns.extend(EMISSIONS_COLUMNS);
        }
        columns
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryRunReport {
    pub query: String,
    pub blocks_seen: usize,
    pub records_parsed: usize,
    pub blocks_rejected: usize,
    pub timed_out: bool,
}
