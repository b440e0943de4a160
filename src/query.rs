use chrono::{Local, NaiveDate};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DATE_FORMAT: &str = "%Y-%m-%d";
const FLIGHTS_BASE_URL: &str = "https://www.google.com/travel/flights";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("origin and destination must be 3-letter IATA airport codes")]
    InvalidAirportCode,
    #[error("invalid {which} date format: {value}")]
    InvalidDateFormat { which: &'static str, value: String },
    #[error("departure date {0} is in the past")]
    DepartureInPast(NaiveDate),
    #[error("return date {return_date} is before departure date {departure_date}")]
    ReturnBeforeDeparture {
        departure_date: NaiveDate,
        return_date: NaiveDate,
    },
    #[error("at least one passenger is required")]
    NoPassengers,
    #[error("infants cannot travel without an adult")]
    InvalidInfantRule,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Cabin {
    #[default]
    Economy,
    Business,
    First,
}

impl Cabin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cabin::Economy => "economy",
            Cabin::Business => "business",
            Cabin::First => "first",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Airline {
    #[default]
    Any,
    Alaska,
    American,
    ChinaEastern,
    Delta,
    Emirates,
    FijiAirways,
    Frontier,
    Hawaiian,
    Jetblue,
    QatarAirways,
    Southwest,
    Spirit,
    SunCountry,
    United,
    Westjet,
}

impl Airline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Airline::Any => "any",
            Airline::Alaska => "alaska",
            Airline::American => "american",
            Airline::ChinaEastern => "china_eastern",
            Airline::Delta => "delta",
            Airline::Emirates => "emirates",
            Airline::FijiAirways => "fiji_airways",
            Airline::Frontier => "frontier",
            Airline::Hawaiian => "hawaiian",
            Airline::Jetblue => "jetblue",
            Airline::QatarAirways => "qatar_airways",
            Airline::Southwest => "southwest",
            Airline::Spirit => "spirit",
            Airline::SunCountry => "sun_country",
            Airline::United => "united",
            Airline::Westjet => "westjet",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Passengers {
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: default_adults(),
            children: 0,
            infants: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    origin: String,
    destination: String,
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
    passengers: Passengers,
    cabin: Cabin,
    airline: Airline,
}

impl QuerySpec {
    pub fn build(
        origin: &str,
        destination: &str,
        departure_date: &str,
        return_date: Option<&str>,
        passengers: Passengers,
        cabin: Cabin,
        airline: Airline,
    ) -> Result<Self, QueryError> {
        if !is_iata_code(origin) || !is_iata_code(destination) {
            return Err(QueryError::InvalidAirportCode);
        }

        let departure = parse_iso_date(departure_date, "departure")?;
        if departure < Local::now().date_naive() {
            return Err(QueryError::DepartureInPast(departure));
        }

        let return_date = match return_date.filter(|v| !v.is_empty()) {
            Some(raw) => {
                let parsed = parse_iso_date(raw, "return")?;
                if parsed < departure {
                    return Err(QueryError::ReturnBeforeDeparture {
                        departure_date: departure,
                        return_date: parsed,
                    });
                }
                Some(parsed)
            }
            None => None,
        };

        let total = passengers.adults + passengers.children + passengers.infants;
        if total == 0 {
            return Err(QueryError::NoPassengers);
        }
        if passengers.infants > 0 && passengers.adults == 0 {
            return Err(QueryError::InvalidInfantRule);
        }

        Ok(Self {
            origin: origin.to_ascii_uppercase(),
            destination: destination.to_ascii_uppercase(),
            departure_date: departure,
            return_date,
            passengers,
            cabin,
            airline,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn lookup_string(&self) -> String {
        let trip = match self.return_date {
            Some(return_date) => format!("returning {}", return_date.format(DATE_FORMAT)),
            None => "one-way".to_string(),
        };

        [
            format!("Flights from {}", self.origin),
            format!("to {}", self.destination),
            format!("on {}", self.departure_date.format(DATE_FORMAT)),
            trip,
            format!("for {} adults", self.passengers.adults),
            format!("for {} children", self.passengers.children),
            format!("for {} infants", self.passengers.infants),
            format!("on {} class", self.cabin.as_str()),
            format!("with {} airline", self.airline.as_str()),
        ]
        .join(" ")
    }

    pub fn url(&self) -> String {
        let url = Url::parse_with_params(
            FLIGHTS_BASE_URL,
            &[("hl", "en"), ("q", self.lookup_string().as_str())],
        )
        .expect("flights base url must parse");
        url.to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TravelPlan {
    pub origin: String,
    pub destination: String,
    pub departure_dates: Vec<String>,
    #[serde(default)]
    pub return_dates: Vec<String>,
}

pub fn expand_travel_plans(
    plans: &[TravelPlan],
    passengers: Passengers,
    cabin: Cabin,
    airline: Airline,
) -> Result<Vec<QuerySpec>, QueryError> {
    let mut queries = Vec::new();

    for plan in plans {
        let return_dates: Vec<Option<&str>> = if plan.return_dates.is_empty() {
            vec![None]
        } else {
            plan.return_dates.iter().map(|d| Some(d.as_str())).collect()
        };

        for departure in &plan.departure_dates {
            for return_date in &return_dates {
                queries.push(QuerySpec::build(
                    &plan.origin,
                    &plan.destination,
                    departure,
                    *return_date,
                    passengers,
                    cabin,
                    airline,
                )?);
            }
        }
    }

    Ok(queries)
}

fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn parse_iso_date(raw: &str, which: &'static str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| QueryError::InvalidDateFormat {
        which,
        value: raw.to_string(),
    })
}

fn default_adults() -> u32 {
    1
}
