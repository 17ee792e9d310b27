//! Salary text parsing: "$80,000 - $120,000 per year", "€55k", "£45/hr",
//! "12-18 LPA" and friends.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Without a period keyword, a maximum below this is read as an hourly rate.
const HOURLY_CEILING: f64 = 500.0;
/// Without a period keyword, a maximum below this is read as a monthly figure.
const MONTHLY_CEILING: f64 = 20_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl PayPeriod {
    /// Multiplier that turns one period's pay into annual pay
    /// (40 h × 52 weeks, 260 working days).
    pub fn annual_factor(self) -> f64 {
        match self {
            Self::Hourly => 2080.0,
            Self::Daily => 260.0,
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
            Self::Annual => 1.0,
        }
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSalary {
    pub min: f64,
    pub max: f64,
    /// ISO 4217 code, upper-case.
    pub currency: String,
    pub period: PayPeriod,
}

impl ParsedSalary {
    pub fn annual_min(&self) -> f64 {
        self.min * self.period.annual_factor()
    }

    pub fn annual_max(&self) -> f64 {
        self.max * self.period.annual_factor()
    }
}

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:[.,]\d+)*)\s*(lpa|lakhs?|lacs?|crores?|cr|mm|k|m|l)?\b")
            .expect("valid regex")
    })
}

fn iso_currency_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(usd|eur|gbp|inr|cad|aud|sgd|jpy|chf|sek|pln|aed|brl|mxn|ils|rs)\b")
            .expect("valid regex")
    })
}

fn period_patterns() -> &'static [(PayPeriod, Regex)] {
    static PATTERNS: OnceLock<Vec<(PayPeriod, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (
                PayPeriod::Hourly,
                r"(?i)(?:/\s*(?:hr|hour|h)\b|\bper\s+hour\b|\bhourly\b|\ban\s+hour\b)",
            ),
            (
                PayPeriod::Daily,
                r"(?i)(?:/\s*(?:day|d)\b|\bper\s+day\b|\bdaily\b|\ba\s+day\b)",
            ),
            (
                PayPeriod::Weekly,
                r"(?i)(?:/\s*(?:wk|week)\b|\bper\s+week\b|\bweekly\b|\ba\s+week\b)",
            ),
            (
                PayPeriod::Monthly,
                r"(?i)(?:/\s*(?:mo|mth|month)\b|\bper\s+month\b|\bmonthly\b|\ba\s+month\b)",
            ),
            (
                PayPeriod::Annual,
                r"(?i)(?:/\s*(?:yr|year|annum|a)\b|\bper\s+(?:year|annum)\b|\bannual(?:ly)?\b|\byearly\b|\ba\s+year\b|\bp\.a\.|\bpa\b|\blpa\b)",
            ),
        ]
        .into_iter()
        .map(|(period, pattern)| (period, Regex::new(pattern).expect("valid regex")))
        .collect()
    })
}

/// Symbol prefixes, longest first so "C$" wins over "$".
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("CA$", "CAD"),
    ("AU$", "AUD"),
    ("SG$", "SGD"),
    ("US$", "USD"),
    ("C$", "CAD"),
    ("A$", "AUD"),
    ("S$", "SGD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("₹", "INR"),
    ("¥", "JPY"),
    ("$", "USD"),
];

/// Parses a salary string. `None` when there is no usable amount
/// ("Competitive", "DOE", "TBD", empty text, all zeros).
///
/// Parsing starts at the first amount carrying a currency marker (else the
/// first amount); the next amount is its upper bound only when the two are
/// joined by a range separator. Percentages, numbers glued to words and
/// retirement-plan tokens ("401k") are never amounts.
pub fn parse_salary_string(text: &str) -> Option<ParsedSalary> {
    let text = text.trim();
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let amounts: Vec<Amount> = amount_pattern()
        .captures_iter(text)
        .filter_map(|caps| Amount::from_captures(&caps))
        .filter(|amount| amount.is_salary_figure(text))
        .collect();

    let anchor = amounts
        .iter()
        .position(|amount| amount.has_currency_marker(text))
        .unwrap_or(0);
    let first = *amounts.get(anchor)?;
    let upper = amounts
        .get(anchor + 1)
        .filter(|next| is_range_separator(&text[first.end..next.start]))
        .copied();

    let (mut min, mut max) = match upper {
        Some(upper) => {
            let shared = if first.is_bare() { upper.scale } else { None };
            (first.value(shared), upper.value(None))
        }
        None => (first.value(None), first.value(None)),
    };
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }
    if max <= 0.0 || !max.is_finite() {
        return None;
    }

    let indian_notation = std::iter::once(first)
        .chain(upper)
        .any(|amount| amount.scale.is_some_and(Scale::is_indian));
    let currency = detect_currency(text, indian_notation);
    let period = detect_period(text).unwrap_or(if indian_notation {
        PayPeriod::Annual
    } else if max < HOURLY_CEILING {
        PayPeriod::Hourly
    } else if max < MONTHLY_CEILING {
        PayPeriod::Monthly
    } else {
        PayPeriod::Annual
    });

    Some(ParsedSalary {
        min,
        max,
        currency,
        period,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scale {
    Thousand,
    Million,
    Lakh,
    Crore,
}

impl Scale {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "k" => Some(Self::Thousand),
            "m" | "mm" => Some(Self::Million),
            "l" | "lpa" | "lakh" | "lakhs" | "lac" | "lacs" => Some(Self::Lakh),
            "cr" | "crore" | "crores" => Some(Self::Crore),
            _ => None,
        }
    }

    fn factor(self) -> f64 {
        match self {
            Self::Thousand => 1e3,
            Self::Million => 1e6,
            Self::Lakh => 1e5,
            Self::Crore => 1e7,
        }
    }

    fn is_indian(self) -> bool {
        matches!(self, Self::Lakh | Self::Crore)
    }
}

#[derive(Debug, Clone, Copy)]
struct Amount {
    number: f64,
    scale: Option<Scale>,
    /// Byte span of the match in the trimmed input.
    start: usize,
    end: usize,
}

impl Amount {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let number = parse_number(caps.get(1)?.as_str())?;
        let scale = caps.get(2).and_then(|m| Scale::from_suffix(m.as_str()));
        Some(Self {
            number,
            scale,
            start: whole.start(),
            end: whole.end(),
        })
    }

    /// Value with this amount's own scale, or `shared` when it has none
    /// ("80-120k" scales both ends).
    fn value(&self, shared: Option<Scale>) -> f64 {
        let scale = self.scale.or(shared);
        self.number * scale.map_or(1.0, Scale::factor)
    }

    /// A small number with no suffix and no digit grouping, the "80" in "80-120k".
    fn is_bare(&self) -> bool {
        self.scale.is_none() && self.number < 1000.0
    }

    fn has_currency_marker(&self, text: &str) -> bool {
        ends_with_currency(&text[..self.start]) || starts_with_currency(&text[self.end..])
    }

    fn is_salary_figure(&self, text: &str) -> bool {
        let before = &text[..self.start];
        let after = text[self.end..].trim_start();
        let marked = ends_with_currency(before);

        let percentage = after.starts_with('%');
        let glued = !marked && before.chars().last().is_some_and(char::is_alphanumeric);
        let retirement_plan = !marked
            && self.number == 401.0
            && (self.scale == Some(Scale::Thousand)
                || after.to_ascii_lowercase().starts_with("(k)"));

        !(percentage || glued || retirement_plan)
    }
}

fn is_range_separator(between: &str) -> bool {
    let mut stripped = between.to_uppercase();
    for (symbol, _) in CURRENCY_SYMBOLS {
        stripped = stripped.replace(symbol, "");
    }
    let stripped = iso_currency_pattern().replace_all(&stripped, "");
    matches!(
        stripped.trim().to_lowercase().as_str(),
        "-" | "–" | "—" | "~" | "to"
    )
}

fn ends_with_currency(before: &str) -> bool {
    let before = before.trim_end().trim_end_matches('.').to_uppercase();
    if CURRENCY_SYMBOLS.iter().any(|(symbol, _)| before.ends_with(symbol)) {
        return true;
    }
    let word_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map_or(before.len(), |(i, _)| i);
    is_currency_code(&before[word_start..])
}

fn starts_with_currency(after: &str) -> bool {
    let after = after.trim_start().to_uppercase();
    if CURRENCY_SYMBOLS.iter().any(|(symbol, _)| after.starts_with(symbol)) {
        return true;
    }
    let word_end = after
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(after.len());
    is_currency_code(&after[..word_end])
}

fn is_currency_code(word: &str) -> bool {
    !word.is_empty()
        && iso_currency_pattern()
            .find(word)
            .is_some_and(|m| m.as_str().len() == word.len())
}

/// "80,000" / "80.000" / "12,00,000" → integer thousands; "1.5" / "1,5" →
/// decimals; "80,000.50" → the last separator is the decimal point.
fn parse_number(raw: &str) -> Option<f64> {
    let has_comma = raw.contains(',');
    let has_dot = raw.contains('.');

    let normalized = if has_comma && has_dot {
        let decimal = if raw.rfind(',') > raw.rfind('.') { ',' } else { '.' };
        let grouping = if decimal == ',' { '.' } else { ',' };
        raw.replace(grouping, "").replace(decimal, ".")
    } else if has_comma || has_dot {
        let sep = if has_comma { ',' } else { '.' };
        let groups: Vec<&str> = raw.split(sep).collect();
        let (last, middle) = groups.split_last()?;
        let is_grouping = last.len() == 3
            && middle
                .iter()
                .skip(1)
                .all(|g| g.len() == 2 || g.len() == 3);
        if is_grouping {
            raw.replace(sep, "")
        } else if groups.len() == 2 {
            raw.replace(sep, ".")
        } else {
            return None;
        }
    } else {
        raw.to_string()
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn detect_currency(text: &str, indian_notation: bool) -> String {
    if let Some(caps) = iso_currency_pattern().captures(text) {
        let code = caps[1].to_ascii_uppercase();
        return if code == "RS" { "INR".to_string() } else { code };
    }

    let upper = text.to_uppercase();
    if let Some((_, code)) = CURRENCY_SYMBOLS.iter().find(|(symbol, _)| upper.contains(symbol)) {
        return (*code).to_string();
    }

    let default = if indian_notation { "INR" } else { "USD" };
    default.to_string()
}

fn detect_period(text: &str) -> Option<PayPeriod> {
    period_patterns()
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(period, _)| *period)
}
