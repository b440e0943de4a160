use crate::model::{Emissions, TripType};
use crate::price::PriceParser;
use chrono::{Duration, NaiveTime};
use regex::Regex;
use thiserror::Error;

pub const LAYOVER_FIELD_INDEX: usize = 5;
const EMISSIONS_FIELD_INDEX: usize = 6;
const NONSTOP_MARKER: &str = "Nonstop";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not parse departure and arrival times from {0:?}")]
    UnparseableTimeFormat(String),
    #[error("could not parse duration from {0:?}")]
    UnparseableDuration(String),
    #[error("could not split route {0:?} into two airport codes")]
    UnparseableRoute(String),
    #[error("unrecognized block layout: {0}")]
    UnrecognizedLayout(String),
    #[error("unknown trip type marker {0:?}")]
    UnknownTripType(String),
    #[error("could not resolve timestamps: {0}")]
    TimeResolutionError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSchema {
    Bare,
    EmissionsTotal,
    EmissionsFull,
}

impl BlockSchema {
    pub fn from_field_count(count: usize) -> Result<Self, ParseError> {
        match count {
            8 => Ok(BlockSchema::Bare),
            9 => Ok(BlockSchema::EmissionsTotal),
            10 => Ok(BlockSchema::EmissionsFull),
            other => Err(ParseError::UnrecognizedLayout(format!(
                "expected 8, 9, or 10 fields, got {other}"
            ))),
        }
    }

    fn emissions(&self, fields: &[String]) -> Option<Emissions> {
        match self {
            BlockSchema::Bare => None,
            BlockSchema::EmissionsTotal => Some(Emissions {
                co2: fields[EMISSIONS_FIELD_INDEX].trim().to_string(),
                delta: None,
            }),
            BlockSchema::EmissionsFull => Some(Emissions {
                co2: fields[EMISSIONS_FIELD_INDEX].trim().to_string(),
                delta: Some(fields[EMISSIONS_FIELD_INDEX + 1].trim().to_string()),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockNotation {
    TwentyFourHour,
    TwelveHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFields {
    pub departs: NaiveTime,
    pub arrives: NaiveTime,
    pub day_offset: Option<i64>,
}

struct ClockGrammar {
    notation: ClockNotation,
    pattern: Regex,
}

impl ClockGrammar {
    fn try_parse(&self, text: &str) -> Option<ClockFields> {
        let caps = self.pattern.captures(text)?;

        let (departs, arrives) = match self.notation {
            ClockNotation::TwentyFourHour => {
                let departs = NaiveTime::parse_from_str(&caps[1], "%H:%M").ok()?;
                let arrives = NaiveTime::parse_from_str(&caps[2], "%H:%M").ok()?;
                (departs, arrives)
            }
            ClockNotation::TwelveHour => {
                let departs = parse_twelve_hour(&caps[1], &caps[2])?;
                let arrives = parse_twelve_hour(&caps[3], &caps[4])?;
                (departs, arrives)
            }
        };

        let day_offset = caps
            .name("offset")
            .and_then(|m| m.as_str().parse::<i64>().ok());

        Some(ClockFields {
            departs,
            arrives,
            day_offset,
        })
    }
}

fn parse_twelve_hour(clock: &str, meridiem: &str) -> Option<NaiveTime> {
    let assembled = format!("{clock}{}", meridiem.to_ascii_uppercase());
    NaiveTime::parse_from_str(&assembled, "%I:%M%p").ok()
}

#[derive(Debug, Clone)]
pub struct ParsedFields {
    pub schema: BlockSchema,
    pub clock: ClockFields,
    pub airline: String,
    pub duration: Duration,
    pub origin: String,
    pub destination: String,
    pub num_stops: u32,
    pub layover_detail: String,
    pub price_text: String,
    pub trip_type: TripType,
    pub emissions: Option<Emissions>,
}

pub struct BlockParser {
    clock_grammars: Vec<ClockGrammar>,
    duration_hours: Regex,
    duration_minutes: Regex,
    price: PriceParser,
}

impl BlockParser {
    pub fn new() -> Self {
        // Ordered strategies; the stricter 24-hour grammar goes first.
        let clock_grammars = vec![
            ClockGrammar {
                notation: ClockNotation::TwentyFourHour,
                pattern: Regex::new(
                    r"^\s*(\d{2}:\d{2})\s*-\s*(\d{2}:\d{2})(?:\+(?P<offset>\d+))?\s*$",
                )
                .expect("24-hour clock regex must compile"),
            },
            ClockGrammar {
                notation: ClockNotation::TwelveHour,
                pattern: Regex::new(
                    r"^\s*(\d{1,2}:\d{2})\s*([AaPp][Mm])\s*-\s*(\d{1,2}:\d{2})\s*([AaPp][Mm])(?:\+(?P<offset>\d+))?\s*$",
                )
                .expect("12-hour clock regex must compile"),
            },
        ];

        Self {
            clock_grammars,
            duration_hours: Regex::new(r"(\d+)\s*hr").expect("duration hours regex must compile"),
            duration_minutes: Regex::new(r"(\d+)\s*min")
                .expect("duration minutes regex must compile"),
            price: PriceParser::new(),
        }
    }

    pub fn parse_fields(&self, block: &str) -> Result<ParsedFields, ParseError> {
        let fields = split_fields(block);
        let schema = BlockSchema::from_field_count(fields.len())?;

        let clock = self.parse_clock(&fields[0])?;
        let airline = fields[1].trim().to_string();
        let duration = self.parse_duration(&fields[2])?;
        let (origin, destination) = parse_route(&fields[3])?;
        let num_stops = parse_stops(&fields[4])?;
        let layover_detail = fields[LAYOVER_FIELD_INDEX].trim().to_string();
        let emissions = schema.emissions(&fields);

        let price_field = &fields[fields.len() - 2];
        let price_text = self
            .price
            .parse(price_field)
            .amount_text
            .ok_or_else(|| {
                ParseError::UnrecognizedLayout(format!("price field {price_field:?} has no amount"))
            })?;

        let trip_field = &fields[fields.len() - 1];
        let trip_type = TripType::from_marker(trip_field)
            .ok_or_else(|| ParseError::UnknownTripType(trip_field.trim().to_string()))?;

        Ok(ParsedFields {
            schema,
            clock,
            airline,
            duration,
            origin,
            destination,
            num_stops,
            layover_detail,
            price_text,
            trip_type,
            emissions,
        })
    }

    fn parse_clock(&self, raw: &str) -> Result<ClockFields, ParseError> {
        let text: String = raw.chars().filter(char::is_ascii).collect();

        self.clock_grammars
            .iter()
            .find_map(|grammar| grammar.try_parse(&text))
            .ok_or_else(|| ParseError::UnparseableTimeFormat(raw.trim().to_string()))
    }

    fn parse_duration(&self, raw: &str) -> Result<Duration, ParseError> {
        let hours = self
            .duration_hours
            .captures(raw)
            .and_then(|caps| caps[1].parse::<i64>().ok());
        let minutes = self
            .duration_minutes
            .captures(raw)
            .and_then(|caps| caps[1].parse::<i64>().ok());

        if hours.is_none() && minutes.is_none() {
            return Err(ParseError::UnparseableDuration(raw.trim().to_string()));
        }

        Ok(Duration::hours(hours.unwrap_or(0)) + Duration::minutes(minutes.unwrap_or(0)))
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

fn split_fields(block: &str) -> Vec<String> {
    let mut fields: Vec<String> = block.lines().map(ToString::to_string).collect();

    // Nonstop blocks carry no layover line; insert a placeholder so both
    // shapes expose the same positional layout.
    if block.contains(NONSTOP_MARKER) && fields.len() > LAYOVER_FIELD_INDEX {
        fields.insert(LAYOVER_FIELD_INDEX, String::new());
    }

    fields
}

fn parse_route(raw: &str) -> Result<(String, String), ParseError> {
    let cleaned: String = raw.chars().filter(char::is_ascii).collect();
    let parts: Vec<&str> = cleaned.trim().split('-').collect();

    match parts.as_slice() {
        [origin, destination] if is_iata_code(origin) && is_iata_code(destination) => {
            Ok((origin.to_string(), destination.to_string()))
        }
        _ => Err(ParseError::UnparseableRoute(raw.trim().to_string())),
    }
}

fn parse_stops(raw: &str) -> Result<u32, ParseError> {
    if raw.contains(NONSTOP_MARKER) {
        return Ok(0);
    }

    raw.trim()
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| {
            ParseError::UnrecognizedLayout(format!(
                "stop-count field {raw:?} has no leading digit"
            ))
        })
}

fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}
