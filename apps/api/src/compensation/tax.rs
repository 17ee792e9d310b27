//! Effective income-tax estimates.
//!
//! Each country has a progressive marginal schedule (thresholds converted to
//! USD) plus a flat social-contribution rate. The estimate is a planning
//! figure, not tax advice: no deductions, credits or contribution caps.

use crate::reference::{normalize_key, ReferenceDataset};

/// Upper bound of any effective rate we report, in percent.
pub const MAX_EFFECTIVE_RATE: f64 = 60.0;

/// A marginal bracket: `rate` percent applies to income above `from`.
#[derive(Debug, Clone, Copy)]
pub struct Bracket {
    pub from: f64,
    pub rate: f64,
}

const fn b(from: f64, rate: f64) -> Bracket {
    Bracket { from, rate }
}

#[derive(Debug)]
pub struct TaxTable {
    pub id: &'static str,
    /// Canonical country name first, then aliases and codes (normalized).
    pub names: &'static [&'static str],
    /// Ascending by `from`, with non-decreasing rates.
    pub brackets: &'static [Bracket],
    pub social_rate: f64,
}

impl TaxTable {
    /// Effective rate in percent for a positive, finite income.
    fn effective_rate(&self, income: f64) -> f64 {
        let mut tax = 0.0;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if income <= bracket.from {
                break;
            }
            let upper = self
                .brackets
                .get(i + 1)
                .map_or(income, |next| next.from.min(income));
            tax += (upper - bracket.from) * bracket.rate / 100.0;
        }
        tax / income * 100.0 + self.social_rate
    }

    fn top_rate(&self) -> f64 {
        self.brackets.last().map_or(0.0, |b| b.rate) + self.social_rate
    }
}

pub const TAX_TABLES: &[TaxTable] = &[
    TaxTable {
        id: "us",
        names: &["united states", "usa", "us", "united states of america", "america"],
        brackets: &[
            b(0.0, 10.0),
            b(11_600.0, 12.0),
            b(47_150.0, 22.0),
            b(100_525.0, 24.0),
            b(191_950.0, 32.0),
            b(243_725.0, 35.0),
            b(609_350.0, 37.0),
        ],
        social_rate: 7.65,
    },
    TaxTable {
        id: "uk",
        names: &["united kingdom", "uk", "gb", "great britain", "britain", "england", "scotland", "wales"],
        brackets: &[b(0.0, 0.0), b(15_800.0, 20.0), b(63_500.0, 40.0), b(158_000.0, 45.0)],
        social_rate: 8.0,
    },
    TaxTable {
        id: "ca",
        names: &["canada", "ca"],
        brackets: &[
            b(0.0, 0.0),
            b(11_000.0, 20.0),
            b(40_000.0, 25.0),
            b(81_000.0, 31.0),
            b(126_000.0, 38.0),
            b(180_000.0, 44.0),
        ],
        social_rate: 6.0,
    },
    TaxTable {
        id: "de",
        names: &["germany", "de", "deutschland"],
        brackets: &[b(0.0, 0.0), b(12_500.0, 24.0), b(70_000.0, 42.0), b(300_000.0, 45.0)],
        social_rate: 20.0,
    },
    TaxTable {
        id: "fr",
        names: &["france", "fr"],
        brackets: &[
            b(0.0, 0.0),
            b(12_000.0, 11.0),
            b(31_000.0, 30.0),
            b(90_000.0, 41.0),
            b(190_000.0, 45.0),
        ],
        social_rate: 22.0,
    },
    TaxTable {
        id: "nl",
        names: &["netherlands", "nl", "the netherlands", "holland"],
        brackets: &[b(0.0, 36.97), b(83_000.0, 49.5)],
        social_rate: 0.0,
    },
    TaxTable {
        id: "es",
        names: &["spain", "es", "espana"],
        brackets: &[
            b(0.0, 19.0),
            b(13_500.0, 24.0),
            b(22_000.0, 30.0),
            b(38_000.0, 37.0),
            b(65_000.0, 45.0),
            b(325_000.0, 47.0),
        ],
        social_rate: 6.35,
    },
    TaxTable {
        id: "ie",
        names: &["ireland", "ie", "eire", "republic of ireland"],
        brackets: &[b(0.0, 0.0), b(20_000.0, 20.0), b(46_000.0, 40.0)],
        social_rate: 12.0,
    },
    TaxTable {
        id: "ch",
        names: &["switzerland", "ch", "schweiz", "suisse"],
        brackets: &[b(0.0, 0.0), b(20_000.0, 8.0), b(60_000.0, 15.0), b(150_000.0, 25.0)],
        social_rate: 6.4,
    },
    TaxTable {
        id: "se",
        names: &["sweden", "se", "sverige"],
        brackets: &[b(0.0, 0.0), b(26_000.0, 32.0), b(67_000.0, 52.0)],
        social_rate: 7.0,
    },
    TaxTable {
        id: "pl",
        names: &["poland", "pl", "polska"],
        brackets: &[b(0.0, 0.0), b(3_300.0, 12.0), b(31_000.0, 32.0)],
        social_rate: 22.7,
    },
    TaxTable {
        id: "pt",
        names: &["portugal", "pt"],
        brackets: &[
            b(0.0, 13.0),
            b(8_000.0, 21.0),
            b(22_000.0, 35.0),
            b(50_000.0, 45.0),
            b(85_000.0, 48.0),
        ],
        social_rate: 11.0,
    },
    TaxTable {
        id: "in",
        names: &["india", "in", "bharat"],
        brackets: &[b(0.0, 0.0), b(8_500.0, 10.0), b(14_500.0, 20.0), b(18_000.0, 30.0)],
        social_rate: 4.0,
    },
    TaxTable {
        id: "sg",
        names: &["singapore", "sg"],
        brackets: &[
            b(0.0, 0.0),
            b(15_000.0, 2.0),
            b(30_000.0, 7.0),
            b(60_000.0, 11.5),
            b(90_000.0, 15.0),
            b(120_000.0, 18.0),
            b(150_000.0, 19.0),
            b(180_000.0, 19.5),
            b(210_000.0, 20.0),
            b(240_000.0, 22.0),
        ],
        social_rate: 0.0,
    },
    TaxTable {
        id: "jp",
        names: &["japan", "jp"],
        brackets: &[
            b(0.0, 5.0),
            b(13_000.0, 10.0),
            b(22_000.0, 20.0),
            b(47_000.0, 23.0),
            b(62_000.0, 33.0),
            b(120_000.0, 40.0),
            b(280_000.0, 45.0),
        ],
        social_rate: 15.0,
    },
    TaxTable {
        id: "au",
        names: &["australia", "au", "aus"],
        brackets: &[
            b(0.0, 0.0),
            b(12_000.0, 16.0),
            b(30_000.0, 30.0),
            b(89_000.0, 37.0),
            b(120_000.0, 45.0),
        ],
        social_rate: 2.0,
    },
    TaxTable {
        id: "ae",
        names: &["united arab emirates", "ae", "uae", "emirates"],
        brackets: &[],
        social_rate: 0.0,
    },
    TaxTable {
        id: "br",
        names: &["brazil", "br", "brasil"],
        brackets: &[
            b(0.0, 0.0),
            b(5_500.0, 7.5),
            b(8_200.0, 15.0),
            b(11_000.0, 22.5),
            b(13_500.0, 27.5),
        ],
        social_rate: 11.0,
    },
    TaxTable {
        id: "mx",
        names: &["mexico", "mx"],
        brackets: &[
            b(0.0, 1.92),
            b(500.0, 6.4),
            b(4_300.0, 10.88),
            b(7_500.0, 16.0),
            b(8_800.0, 17.92),
            b(10_500.0, 21.36),
            b(21_000.0, 23.52),
            b(33_500.0, 30.0),
            b(64_000.0, 32.0),
            b(85_000.0, 34.0),
            b(256_000.0, 35.0),
        ],
        social_rate: 3.0,
    },
    TaxTable {
        id: "il",
        names: &["israel", "il"],
        brackets: &[
            b(0.0, 10.0),
            b(22_000.0, 14.0),
            b(32_000.0, 20.0),
            b(51_000.0, 31.0),
            b(71_000.0, 35.0),
            b(182_000.0, 47.0),
        ],
        social_rate: 12.0,
    },
];

/// Table for a country name, alias or code; unknown countries get the US table.
pub fn tax_table(country: &str) -> &'static TaxTable {
    let key = normalize_key(country);
    TAX_TABLES
        .iter()
        .find(|t| t.id == key || t.names.contains(&key.as_str()))
        .unwrap_or(&TAX_TABLES[0])
}

pub fn tax_table_by_id(id: &str) -> Option<&'static TaxTable> {
    let key = normalize_key(id);
    TAX_TABLES.iter().find(|t| t.id == key)
}

/// Table named by the country's reference entry (`tax_table`), when both the
/// country and the table are known.
pub fn declared_tax_table(country: &str, dataset: &ReferenceDataset) -> Option<&'static TaxTable> {
    dataset
        .find_country(country)
        .and_then(|profile| tax_table_by_id(&profile.tax_table))
}

/// Estimated effective tax rate in percent, rounded to two decimals and
/// clamped to `[0, MAX_EFFECTIVE_RATE]`.
pub fn estimate_tax_rate(income_usd: f64, country: &str) -> f64 {
    estimate_tax_rate_with(income_usd, tax_table(country))
}

/// `estimate_tax_rate` against an explicit table.
pub fn estimate_tax_rate_with(income_usd: f64, table: &TaxTable) -> f64 {
    if income_usd.is_nan() || income_usd <= 0.0 {
        return 0.0;
    }

    let rate = if income_usd.is_infinite() {
        table.top_rate()
    } else {
        table.effective_rate(income_usd)
    };

    ((rate * 100.0).round() / 100.0).clamp(0.0, MAX_EFFECTIVE_RATE)
}
