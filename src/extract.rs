use crate::price::PriceParser;
use tracing::debug;

const ONE_WAY_MARKER: &str = "One-Way";
const ROUND_TRIP_MARKER: &str = "round trip";
const ENTIRE_TRIP_MARKER: &str = "entire trip";

const PRICE_FIELD_FROM_END: usize = 2;

pub fn extract_blocks(raw_texts: Vec<String>, price: &PriceParser) -> Vec<String> {
    let mut blocks = Vec::new();

    for raw in raw_texts {
        let mut block = normalize_block(&raw);

        // The source page omits the marker for one-way itineraries.
        if !block.contains(ROUND_TRIP_MARKER) && !block.contains(ENTIRE_TRIP_MARKER) {
            block.push('\n');
            block.push_str(ONE_WAY_MARKER);
        }

        let lines: Vec<&str> = block.lines().collect();
        if lines.len() < PRICE_FIELD_FROM_END {
            debug!(block = %block, "discarding block with too few fields");
            continue;
        }

        let price_line = lines[lines.len() - PRICE_FIELD_FROM_END];
        if price.parse(price_line).currency.is_none() {
            debug!(field = %price_line, "discarding block without a priced field");
            continue;
        }

        blocks.push(block);
    }

    blocks
}

// U+2013 stands in for the field-separator dash; U+202F pads 12-hour suffixes.
pub fn normalize_block(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{202f}' | '\u{a0}' => ' ',
            other => other,
        })
        .collect()
}
