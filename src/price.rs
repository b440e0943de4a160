use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPrice {
    pub currency: Option<String>,
    pub amount_text: Option<String>,
}

pub struct PriceParser {
    symbol_prefixed: Regex,
    code_suffixed: Regex,
}

impl PriceParser {
    pub fn new() -> Self {
        Self {
            symbol_prefixed: Regex::new(r"(?P<cur>[A-Z]{0,3}[\$€£¥])\s*(?P<amt>\d[\d,]*(?:\.\d+)?)")
                .expect("symbol price regex must compile"),
            code_suffixed: Regex::new(r"(?P<amt>\d[\d,]*(?:\.\d+)?)\s*(?P<cur>[A-Z]{3})\b")
                .expect("code price regex must compile"),
        }
    }

    pub fn parse(&self, text: &str) -> ParsedPrice {
        for pattern in [&self.symbol_prefixed, &self.code_suffixed] {
            if let Some(caps) = pattern.captures(text) {
                return ParsedPrice {
                    currency: caps.name("cur").map(|m| m.as_str().to_string()),
                    amount_text: caps.name("amt").map(|m| m.as_str().to_string()),
                };
            }
        }

        ParsedPrice::default()
    }
}

impl Default for PriceParser {
    fn default() -> Self {
        Self::new()
    }
}
