//! Rate extraction from unstructured markup.
//!
//! Pages with no stable schema are searched with an ordered ladder of
//! patterns, most specific first. The first pattern whose capture parses to a
//! positive finite number wins. Adding a shape means adding a pattern; call
//! sites only ever see [`RateExtractor::extract`].

use lazy_static::lazy_static;
use regex::Regex;

/// Characters stripped from a captured number before parsing.
const GROUPING_CHARS: &[char] = &[',', ' ', '\u{a0}', '\u{202f}', '\''];

/// One named pattern. Capture group 1 must hold the number.
///
/// A pair pattern is a template whose `{FROM}` and `{TO}` placeholders are
/// replaced with the requested codes before matching, so it only ever reads
/// the quote for that ordered pair.
#[derive(Debug, Clone)]
pub struct RatePattern {
    name: &'static str,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Fixed(Regex),
    Pair(String),
}

impl RatePattern {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            matcher: Matcher::Fixed(Regex::new(pattern)?),
        })
    }

    /// Builds a pattern anchored to the requested pair.
    pub fn pair(name: &'static str, template: &str) -> Result<Self, regex::Error> {
        Regex::new(&bind_pair(template, "AAA", "BBB"))?;
        Ok(Self {
            name,
            matcher: Matcher::Pair(template.to_string()),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// First capture of this pattern that parses as a usable rate.
    fn find(&self, body: &str, from: &str, to: &str) -> Option<f64> {
        match &self.matcher {
            Matcher::Fixed(regex) => first_rate(regex, body),
            Matcher::Pair(template) => {
                let regex = Regex::new(&bind_pair(template, from, to)).ok()?;
                first_rate(&regex, body)
            }
        }
    }
}

fn bind_pair(template: &str, from: &str, to: &str) -> String {
    template
        .replace("{FROM}", &regex::escape(from))
        .replace("{TO}", &regex::escape(to))
}

fn first_rate(regex: &Regex, body: &str) -> Option<f64> {
    regex
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| parse_rate(m.as_str()))
}

lazy_static! {
    /// Plain digits, or digits grouped in threes, with an optional `.` fraction.
    static ref NUMBER_SHAPE: Regex = Regex::new(
        r"^(?:[0-9]+|[0-9]{1,3}(?:[,\x20\x{A0}\x{202F}'][0-9]{3})+)(?:\.[0-9]+)?$"
    )
    .expect("Invalid regex pattern");

    /// Default ladder, most specific shape first.
    static ref DEFAULT_PATTERNS: Vec<RatePattern> = vec![
        // <div data-last-price="0.9213" ...>
        RatePattern::new("data-last-price", r#"data-last-price="([0-9][0-9.,]*)""#)
            .expect("Invalid regex pattern"),
        // <div class="YMlKec fxKbKc">0.9213</div>
        RatePattern::new(
            "quote-price",
            r#"<div[^>]*class="YMlKec fxKbKc"[^>]*>\s*([0-9][0-9.,]*)\s*<"#,
        )
        .expect("Invalid regex pattern"),
        // <span data-exchange-rate="0.9213">
        RatePattern::new("data-exchange-rate", r#"data-exchange-rate="([0-9][0-9.,]*)""#)
            .expect("Invalid regex pattern"),
        // <span class="DFlfde SwHCTb" data-precision="2" data-value="0.9213">
        RatePattern::new(
            "converter-value",
            r#"<span[^>]*class="DFlfde[^"]*"[^>]*data-value="([0-9][0-9.,]*)""#,
        )
        .expect("Invalid regex pattern"),
        // "1 USD = 0.9213 EUR"
        RatePattern::pair(
            "inline-equation",
            r"\b1\s+{FROM}\s*=\s*([0-9][0-9.,]*)\s*{TO}\b",
        )
        .expect("Invalid regex pattern"),
        // embedded JSON: {"pair": "USDEUR", "rate": 0.9213}
        RatePattern::pair(
            "json-rate",
            r#""pair"\s*:\s*"{FROM}[/-]?{TO}"[^{}]*?"rate"\s*:\s*"?([0-9][0-9.,]*)"?"#,
        )
        .expect("Invalid regex pattern"),
    ];
}

/// Ordered pattern ladder.
#[derive(Debug, Clone)]
pub struct RateExtractor {
    patterns: Vec<RatePattern>,
}

impl RateExtractor {
    pub fn new(patterns: Vec<RatePattern>) -> Self {
        Self { patterns }
    }

    /// Appends a pattern below every existing one.
    pub fn with_pattern(mut self, pattern: RatePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn patterns(&self) -> &[RatePattern] {
        &self.patterns
    }

    /// Rate for `from -> to` read from a quote page for that pair.
    pub fn extract(&self, body: &str, from: &str, to: &str) -> Option<f64> {
        self.extract_with_source(body, from, to).map(|(_, rate)| rate)
    }

    /// Like [`extract`](Self::extract), also naming the pattern that matched.
    pub fn extract_with_source(
        &self,
        body: &str,
        from: &str,
        to: &str,
    ) -> Option<(&'static str, f64)> {
        self.patterns
            .iter()
            .find_map(|p| p.find(body, from, to).map(|rate| (p.name(), rate)))
    }
}

impl Default for RateExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS.clone())
    }
}

/// Parses a captured number, ignoring grouping characters.
///
/// A separator only counts as grouping when it splits digits into threes;
/// anything else (`0,9213`) is rejected rather than reinterpreted. Returns
/// `None` unless the value is finite and strictly positive, so a missing
/// rate is never confused with zero.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if !NUMBER_SHAPE.is_match(raw) {
        return None;
    }
    let cleaned: String = raw.chars().filter(|c| !GROUPING_CHARS.contains(c)).collect();
    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
