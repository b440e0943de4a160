use anyhow::Result;
use chrono::{Duration, NaiveDate};
use farescrape::extract::{extract_blocks, normalize_block};
use farescrape::model::TripType;
use farescrape::parser::{BlockParser, BlockSchema, ParseError};
use farescrape::pipeline::assemble_record;
use farescrape::price::PriceParser;

const DEPARTURE: &str = "2023-12-25";

fn departure_date() -> NaiveDate {
    NaiveDate::parse_from_str(DEPARTURE, "%Y-%m-%d").expect("fixture date must parse")
}

// A normalized nonstop one-way block with substitutable clock and duration.
fn nonstop_block(clock: &str, duration: &str) -> String {
    format!("{clock}\nDelta\n{duration}\nSFO-SEA\nNonstop\n$74\nOne-Way")
}

#[test]
fn duration_text_round_trips() -> Result<()> {
    let parser = BlockParser::new();
    let cases = [
        ("12:10 PM - 2:31 PM", "2 hr 21 min", Duration::minutes(141)),
        ("10:00 AM - 10:45 AM", "45 min", Duration::minutes(45)),
        ("10:00 AM - 3:00 PM", "5 hr", Duration::hours(5)),
    ];

    for (clock, duration_text, expected) in cases {
        let record = assemble_record(
            &parser,
            &nonstop_block(clock, duration_text),
            departure_date(),
        )?;
        assert_eq!(record.duration, expected, "duration text {duration_text:?}");
    }

    Ok(())
}

#[test]
fn nonstop_blocks_have_zero_stops_and_empty_layover() -> Result<()> {
    let parser = BlockParser::new();
    let record = assemble_record(
        &parser,
        &nonstop_block("12:10 PM - 1:15 PM", "1 hr 5 min"),
        departure_date(),
    )?;

    assert_eq!(record.num_stops, 0);
    assert_eq!(record.layover_detail, "");

    Ok(())
}

#[test]
fn twelve_and_twenty_four_hour_grammars_agree() -> Result<()> {
    let parser = BlockParser::new();
    let twelve = assemble_record(
        &parser,
        &nonstop_block("12:10 PM - 1:15 PM", "1 hr 5 min"),
        departure_date(),
    )?;
    let twenty_four = assemble_record(
        &parser,
        &nonstop_block("12:10 - 13:15", "1 hr 5 min"),
        departure_date(),
    )?;

    assert_eq!(twelve.departs, twenty_four.departs);
    assert_eq!(twelve.arrives, twenty_four.arrives);

    Ok(())
}

#[test]
fn overnight_flights_arrive_after_departure() -> Result<()> {
    let parser = BlockParser::new();
    let record = assemble_record(
        &parser,
        &nonstop_block("11:30 PM - 1:10 AM", "1 hr 40 min"),
        departure_date(),
    )?;

    assert!(record.arrives > record.departs);
    assert_eq!(
        record.arrives,
        NaiveDate::from_ymd_opt(2023, 12, 26)
            .unwrap()
            .and_hms_opt(1, 10, 0)
            .unwrap()
    );

    Ok(())
}

#[test]
fn rounded_duration_undershooting_midnight_still_rolls_over() -> Result<()> {
    let parser = BlockParser::new();
    let record = assemble_record(
        &parser,
        &nonstop_block("11:00 PM - 12:10 AM", "50 min"),
        departure_date(),
    )?;

    assert!(record.arrives > record.departs);
    assert_eq!(
        record.arrives,
        NaiveDate::from_ymd_opt(2023, 12, 26)
            .unwrap()
            .and_hms_opt(0, 10, 0)
            .unwrap()
    );

    Ok(())
}

#[test]
fn price_with_currency_prefix_and_thousands_separator_normalizes() -> Result<()> {
    let parser = BlockParser::new();
    let block = "12:10 PM - 1:15 PM\nDelta\n1 hr 5 min\nSFO-SEA\nNonstop\nUS$1,096\nOne-Way";
    let record = assemble_record(&parser, block, departure_date())?;

    assert_eq!(record.price, 1096.0);

    Ok(())
}

#[test]
fn price_parser_exposes_currency_and_amount() {
    let price = PriceParser::new();

    let parsed = price.parse("US$1,096");
    assert_eq!(parsed.currency.as_deref(), Some("US$"));
    assert_eq!(parsed.amount_text.as_deref(), Some("1,096"));

    let parsed = price.parse("Show more flights");
    assert!(parsed.currency.is_none());
    assert!(parsed.amount_text.is_none());
}

#[test]
fn parses_nonstop_twelve_hour_block_with_emissions() -> Result<()> {
    let raw = "12:10 PM \u{2013} 1:15 PM\nDelta\n2 hr 21 min\nSFO\u{2013}SEA\nNonstop\n122 kg CO2\n+20% emissions\n$74".to_string();
    let blocks = extract_blocks(vec![raw], &PriceParser::new());
    assert_eq!(blocks.len(), 1);

    let parser = BlockParser::new();
    let record = assemble_record(&parser, &blocks[0], departure_date())?;

    assert_eq!(
        record.departs,
        NaiveDate::from_ymd_opt(2023, 12, 25)
            .unwrap()
            .and_hms_opt(12, 10, 0)
            .unwrap()
    );
    assert_eq!(
        record.arrives,
        NaiveDate::from_ymd_opt(2023, 12, 25)
            .unwrap()
            .and_hms_opt(13, 15, 0)
            .unwrap()
    );
    assert_eq!(record.origin, "SFO");
    assert_eq!(record.destination, "SEA");
    assert_eq!(record.duration, Duration::minutes(141));
    assert_eq!(record.price, 74.0);
    assert_eq!(record.airline, "Delta");
    assert_eq!(record.num_stops, 0);
    assert_eq!(record.layover_detail, "");
    assert_eq!(record.trip_type, TripType::OneWay);

    let emissions = record.emissions.expect("emissions fields must be captured");
    assert_eq!(emissions.co2, "122 kg CO2");
    assert_eq!(emissions.delta.as_deref(), Some("+20% emissions"));

    Ok(())
}

#[test]
fn round_trip_marker_sets_trip_type() -> Result<()> {
    let raw = "12:10 PM \u{2013} 1:15 PM\nDelta\n2 hr 21 min\nSFO\u{2013}SEA\nNonstop\n122 kg CO2\n+20% emissions\n$74\nround trip".to_string();
    let blocks = extract_blocks(vec![raw], &PriceParser::new());

    let parser = BlockParser::new();
    let record = assemble_record(&parser, &blocks[0], departure_date())?;
    assert_eq!(record.trip_type, TripType::RoundTrip);

    Ok(())
}

#[test]
fn parses_layover_twenty_four_hour_block_with_day_offset() -> Result<()> {
    let raw = "17:45 \u{2013} 22:20+1\nCathay PacificMalaysia Airlines\n19 hrs 35 min\nPIT\u{2013}AUS\n1 stop\n2 hrs 55 min HKG\n789 kg CO2\n-16% emissions\nUS$969\nround trip".to_string();
    let blocks = extract_blocks(vec![raw], &PriceParser::new());
    assert_eq!(blocks.len(), 1);

    let parser = BlockParser::new();
    let record = assemble_record(&parser, &blocks[0], departure_date())?;

    assert_eq!(
        record.departs,
        NaiveDate::from_ymd_opt(2023, 12, 25)
            .unwrap()
            .and_hms_opt(17, 45, 0)
            .unwrap()
    );
    assert_eq!(
        record.arrives,
        NaiveDate::from_ymd_opt(2023, 12, 26)
            .unwrap()
            .and_hms_opt(22, 20, 0)
            .unwrap()
    );
    assert_eq!(record.duration, Duration::hours(19) + Duration::minutes(35));
    assert_eq!(record.price, 969.0);
    assert_eq!(record.airline, "Cathay PacificMalaysia Airlines");
    assert_eq!(record.num_stops, 1);
    assert_eq!(record.layover_detail, "2 hrs 55 min HKG");
    assert_eq!(record.trip_type, TripType::RoundTrip);

    Ok(())
}

#[test]
fn unparseable_clock_field_is_rejected() {
    let parser = BlockParser::new();
    let block = "sometime - later\nDelta\n1 hr 5 min\nSFO-SEA\nNonstop\n$74\nOne-Way";
    let err = assemble_record(&parser, block, departure_date()).unwrap_err();

    assert!(matches!(err, ParseError::UnparseableTimeFormat(_)));
}

#[test]
fn unparseable_duration_field_is_rejected() {
    let parser = BlockParser::new();
    let block = "12:10 PM - 1:15 PM\nDelta\nTBD\nSFO-SEA\nNonstop\n$74\nOne-Way";
    let err = assemble_record(&parser, block, departure_date()).unwrap_err();

    assert!(matches!(err, ParseError::UnparseableDuration(_)));
}

#[test]
fn unparseable_route_field_is_rejected() {
    let parser = BlockParser::new();
    let block = "12:10 PM - 1:15 PM\nDelta\n1 hr 5 min\nSFOSEA\nNonstop\n$74\nOne-Way";
    let err = assemble_record(&parser, block, departure_date()).unwrap_err();

    assert!(matches!(err, ParseError::UnparseableRoute(_)));
}

#[test]
fn unknown_trip_type_marker_is_rejected() {
    let parser = BlockParser::new();
    let block = "12:10 PM - 1:15 PM\nDelta\n1 hr 5 min\nSFO-SEA\nNonstop\n$74\nmystery fare";
    let err = assemble_record(&parser, block, departure_date()).unwrap_err();

    assert!(matches!(err, ParseError::UnknownTripType(_)));
}

#[test]
fn unexpected_field_count_is_rejected() {
    let parser = BlockParser::new();
    let block = "12:10 PM - 1:15 PM\nDelta\n1 hr 5 min\nSFO-SEA\n$74\nOne-Way";
    let err = assemble_record(&parser, block, departure_date()).unwrap_err();

    assert!(matches!(err, ParseError::UnrecognizedLayout(_)));
}

#[test]
fn field_count_resolves_named_schema_variants() -> Result<()> {
    let parser = BlockParser::new();

    let bare = "12:10 PM - 1:15 PM\nDelta\n1 hr 5 min\nSFO-SEA\nNonstop\n$74\nOne-Way";
    assert_eq!(parser.parse_fields(bare)?.schema, BlockSchema::Bare);

    let total_only =
        "12:10 PM - 1:15 PM\nDelta\n1 hr 5 min\nSFO-SEA\nNonstop\n122 kg CO2\n$74\nOne-Way";
    assert_eq!(
        parser.parse_fields(total_only)?.schema,
        BlockSchema::EmissionsTotal
    );

    let full = "12:10 PM - 1:15 PM\nDelta\n1 hr 5 min\nSFO-SEA\nNonstop\n122 kg CO2\n+20% emissions\n$74\nOne-Way";
    assert_eq!(
        parser.parse_fields(full)?.schema,
        BlockSchema::EmissionsFull
    );

    let emissions = parser
        .parse_fields(total_only)?
        .emissions
        .expect("emissions total must be captured");
    assert_eq!(emissions.co2, "122 kg CO2");
    assert_eq!(emissions.delta, None);

    Ok(())
}

#[test]
fn extractor_appends_one_way_marker_and_drops_unpriced_rows() {
    let price = PriceParser::new();
    let blocks = extract_blocks(
        vec![
            "12:10 PM \u{2013} 1:15 PM\nDelta\n2 hr 21 min\nSFO\u{2013}SEA\nNonstop\n$74"
                .to_string(),
            "Show more flights\nView".to_string(),
        ],
        &price,
    );

    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].ends_with("One-Way"));
}

#[test]
fn normalization_resolves_unicode_separators() {
    let normalized = normalize_block("17:45\u{202f}\u{2013}\u{202f}22:20+1");
    assert_eq!(normalized, "17:45 - 22:20+1");
}
