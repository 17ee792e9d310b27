//! Static geographic reference data consumed read-only by the location resolver.
//!
//! Tables are loaded once (built-in or from a JSON file), validated, and indexed.
//! Nothing in here is mutated after `ReferenceDataset::new` returns, so a single
//! instance is shared behind an `Arc` for the whole process.

mod builtin;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use builtin::builtin_tables;

// ────────────────────────────────────────────────────────────────────────────
// Table rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryProfile {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub default_city: String,
    pub major_cities: Vec<String>,
    /// Key into the tax bracket tables (`compensation::tax`).
    pub tax_table: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionLevel {
    Country,
    CountryGroup,
    Continent,
}

/// A vague regional phrase ("APAC", "Europe") and the city used when nothing
/// more specific is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionMapping {
    pub name: String,
    pub keywords: Vec<String>,
    pub level: RegionLevel,
    pub default_city: String,
    pub default_country: String,
    pub countries: Vec<String>,
}

impl RegionMapping {
    pub fn contains_country(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c.eq_ignore_ascii_case(country))
    }
}

/// A state, province or territory, keyed by full name and postal code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subdivision {
    pub name: String,
    pub code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneHint {
    pub abbreviations: Vec<String>,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyHeadquarters {
    pub company: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

/// Raw, serializable form of the reference dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub countries: Vec<CountryProfile>,
    #[serde(default)]
    pub regions: Vec<RegionMapping>,
    #[serde(default)]
    pub subdivisions: Vec<Subdivision>,
    #[serde(default)]
    pub timezones: Vec<TimezoneHint>,
    #[serde(default)]
    pub companies: Vec<CompanyHeadquarters>,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// A missing, corrupt or internally inconsistent dataset. These are the only
/// hard failures in the resolution core and are surfaced at start-up.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reference data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("reference data contains no countries")]
    Empty,

    #[error("duplicate {table} key '{key}'")]
    DuplicateKey { table: &'static str, key: String },

    #[error("{referenced_by} references unknown country '{country}'")]
    UnknownCountry {
        referenced_by: String,
        country: String,
    },

    #[error("default city '{city}' of {country} is not listed among its major cities")]
    DefaultCityNotMajor { country: String, city: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Indexed dataset
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ReferenceDataset {
    tables: ReferenceTables,
    country_index: HashMap<String, usize>,
    city_index: HashMap<String, Vec<usize>>,
    region_index: HashMap<String, usize>,
    subdivision_index: HashMap<String, Vec<usize>>,
    timezone_index: HashMap<String, usize>,
    company_index: HashMap<String, usize>,
}

impl ReferenceDataset {
    /// Validates `tables` and builds the lookup indexes.
    pub fn new(tables: ReferenceTables) -> Result<Self, ReferenceDataError> {
        if tables.countries.is_empty() {
            return Err(ReferenceDataError::Empty);
        }

        let mut country_index = HashMap::new();
        let mut city_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, country) in tables.countries.iter().enumerate() {
            if !country
                .major_cities
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&country.default_city))
            {
                return Err(ReferenceDataError::DefaultCityNotMajor {
                    country: country.name.clone(),
                    city: country.default_city.clone(),
                });
            }
            for key in std::iter::once(&country.name).chain(country.aliases.iter()) {
                insert_unique(&mut country_index, "country", normalize_key(key), idx)?;
            }
            for city in &country.major_cities {
                let entry = city_index.entry(normalize_key(city)).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }

        let known = |name: &str| country_index.contains_key(&normalize_key(name));

        let mut region_index = HashMap::new();
        for (idx, region) in tables.regions.iter().enumerate() {
            for country in std::iter::once(&region.default_country).chain(region.countries.iter()) {
                if !known(country) {
                    return Err(unknown_country(format!("region '{}'", region.name), country));
                }
            }
            for keyword in &region.keywords {
                insert_unique(&mut region_index, "region", normalize_key(keyword), idx)?;
            }
        }

        let mut subdivision_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, sub) in tables.subdivisions.iter().enumerate() {
            if !known(&sub.country) {
                return Err(unknown_country(format!("subdivision '{}'", sub.name), &sub.country));
            }
            for key in [&sub.name, &sub.code] {
                subdivision_index.entry(normalize_key(key)).or_default().push(idx);
            }
        }

        let mut timezone_index = HashMap::new();
        for (idx, tz) in tables.timezones.iter().enumerate() {
            if !known(&tz.country) {
                return Err(unknown_country(format!("timezone '{}'", tz.city), &tz.country));
            }
            for abbr in &tz.abbreviations {
                insert_unique(&mut timezone_index, "timezone", abbr.to_ascii_uppercase(), idx)?;
            }
        }

        let mut company_index = HashMap::new();
        for (idx, hq) in tables.companies.iter().enumerate() {
            if !known(&hq.country) {
                return Err(unknown_country(format!("company '{}'", hq.company), &hq.country));
            }
            for key in std::iter::once(&hq.company).chain(hq.aliases.iter()) {
                insert_unique(&mut company_index, "company", normalize_key(key), idx)?;
            }
        }

        Ok(Self {
            tables,
            country_index,
            city_index,
            region_index,
            subdivision_index,
            timezone_index,
            company_index,
        })
    }

    /// The compiled-in dataset.
    pub fn builtin() -> Result<Self, ReferenceDataError> {
        Self::new(builtin_tables())
    }

    /// Loads and validates a dataset from a JSON file shaped like `ReferenceTables`.
    pub fn from_json_file(path: &Path) -> Result<Self, ReferenceDataError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables: ReferenceTables = serde_json::from_str(&raw)?;
        let dataset = Self::new(tables)?;
        info!(
            "Loaded reference dataset from {} ({} countries)",
            path.display(),
            dataset.tables.countries.len()
        );
        Ok(dataset)
    }

    /// Loads from `path` when given, otherwise the built-in tables.
    pub fn load(path: Option<&Path>) -> Result<Self, ReferenceDataError> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => Self::builtin(),
        }
    }

    pub fn countries(&self) -> &[CountryProfile] {
        &self.tables.countries
    }

    /// Country by canonical name or alias, case- and punctuation-insensitive.
    pub fn find_country(&self, name: &str) -> Option<&CountryProfile> {
        self.country_index
            .get(&normalize_key(name))
            .map(|&idx| &self.tables.countries[idx])
    }

    /// Region whose keyword equals the whole of `text`.
    pub fn find_region_default(&self, text: &str) -> Option<&RegionMapping> {
        self.region_index
            .get(&normalize_key(text))
            .map(|&idx| &self.tables.regions[idx])
    }

    pub fn is_major_city(&self, city: &str, country: &str) -> bool {
        self.canonical_city(city, country).is_some()
    }

    /// The dataset spelling of `city` if it is a major city of `country`.
    pub fn canonical_city(&self, city: &str, country: &str) -> Option<&str> {
        let profile = self.find_country(country)?;
        let key = normalize_key(city);
        profile
            .major_cities
            .iter()
            .find(|c| normalize_key(c) == key)
            .map(String::as_str)
    }

    /// Every country listing `city` as a major city, in dataset order.
    pub fn find_major_city_countries(&self, city: &str) -> Vec<&CountryProfile> {
        self.city_index
            .get(&normalize_key(city))
            .map(|idxs| idxs.iter().map(|&i| &self.tables.countries[i]).collect())
            .unwrap_or_default()
    }

    /// All major city names, longest first, paired with their country.
    pub fn major_cities_longest_first(&self) -> Vec<(&str, &CountryProfile)> {
        let mut cities: Vec<(&str, &CountryProfile)> = self
            .tables
            .countries
            .iter()
            .flat_map(|c| c.major_cities.iter().map(move |city| (city.as_str(), c)))
            .collect();
        cities.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        cities
    }

    /// Subdivisions matching a state/province name or code.
    pub fn find_subdivisions(&self, text: &str) -> Vec<&Subdivision> {
        self.subdivision_index
            .get(&normalize_key(text))
            .map(|idxs| idxs.iter().map(|&i| &self.tables.subdivisions[i]).collect())
            .unwrap_or_default()
    }

    /// Timezone hint by abbreviation (`PST`, `CET`); case-sensitive upper-case key.
    pub fn find_timezone(&self, abbreviation: &str) -> Option<&TimezoneHint> {
        self.timezone_index
            .get(abbreviation)
            .map(|&idx| &self.tables.timezones[idx])
    }

    pub fn find_company(&self, name: &str) -> Option<&CompanyHeadquarters> {
        self.company_index
            .get(&normalize_key(name))
            .map(|&idx| &self.tables.companies[idx])
    }
}

fn insert_unique(
    index: &mut HashMap<String, usize>,
    table: &'static str,
    key: String,
    idx: usize,
) -> Result<(), ReferenceDataError> {
    match index.insert(key.clone(), idx) {
        Some(previous) if previous != idx => Err(ReferenceDataError::DuplicateKey { table, key }),
        _ => Ok(()),
    }
}

fn unknown_country(referenced_by: String, country: &str) -> ReferenceDataError {
    ReferenceDataError::UnknownCountry {
        referenced_by,
        country: country.to_string(),
    }
}

/// Lookup key: lower-case, dots dropped, separators and brackets turned into
/// spaces, whitespace collapsed. "U.S.A." → "usa", "Asia-Pacific" → "asia pacific".
pub fn normalize_key(text: &str) -> String {
    let mapped: String = text
        .chars()
        .filter(|c| *c != '.')
        .map(|c| match c {
            '-' | '_' | '/' | '(' | ')' | '[' | ']' | '|' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dataset() -> ReferenceDataset {
        ReferenceDataset::builtin().unwrap()
    }

    #[test]
    fn test_builtin_dataset_is_consistent() {
        let ds = dataset();
        assert!(ds.countries().len() >= 15);
    }

    #[test]
    fn test_find_country_by_alias_and_punctuation() {
        let ds = dataset();
        assert_eq!(ds.find_country("USA").unwrap().name, "United States");
        assert_eq!(ds.find_country("u.s.a.").unwrap().name, "United States");
        assert_eq!(ds.find_country("  uk ").unwrap().name, "United Kingdom");
        assert!(ds.find_country("Atlantis").is_none());
    }

    #[test]
    fn test_is_major_city_case_insensitive() {
        let ds = dataset();
        assert!(ds.is_major_city("austin", "United States"));
        assert!(ds.is_major_city("Berlin", "germany"));
        assert!(!ds.is_major_city("Berlin", "France"));
        assert!(!ds.is_major_city("Berlin", "Atlantis"));
    }

    #[test]
    fn test_shared_city_lists_every_country() {
        let ds = dataset();
        let countries: Vec<&str> = ds
            .find_major_city_countries("London")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(countries, vec!["United Kingdom", "Canada"]);
    }

    #[test]
    fn test_region_lookup_normalizes_separators() {
        let ds = dataset();
        assert_eq!(ds.find_region_default("Asia-Pacific").unwrap().name, "APAC");
        assert_eq!(ds.find_region_default("(EMEA)").unwrap().name, "EMEA");
        assert!(ds.find_region_default("Europe, maybe").is_none());
    }

    #[test]
    fn test_ambiguous_subdivision_code_returns_all() {
        let ds = dataset();
        let wa: Vec<&str> = ds
            .find_subdivisions("WA")
            .iter()
            .map(|s| s.country.as_str())
            .collect();
        assert!(wa.contains(&"United States"));
        assert!(wa.contains(&"Australia"));
    }

    #[test]
    fn test_timezone_and_company_lookup() {
        let ds = dataset();
        assert_eq!(ds.find_timezone("PST").unwrap().city, "San Francisco");
        assert_eq!(ds.find_company("  spotify ").unwrap().city, "Stockholm");
        assert!(ds.find_company("Unknown Startup").is_none());
    }

    #[test]
    fn test_empty_tables_rejected() {
        let tables = ReferenceTables {
            countries: vec![],
            regions: vec![],
            subdivisions: vec![],
            timezones: vec![],
            companies: vec![],
        };
        assert!(matches!(
            ReferenceDataset::new(tables),
            Err(ReferenceDataError::Empty)
        ));
    }

    #[test]
    fn test_region_with_unknown_country_rejected() {
        let mut tables = builtin_tables();
        tables.regions[0].default_country = "Atlantis".to_string();
        assert!(matches!(
            ReferenceDataset::new(tables),
            Err(ReferenceDataError::UnknownCountry { .. })
        ));
    }

    #[test]
    fn test_default_city_must_be_major() {
        let mut tables = builtin_tables();
        tables.countries[0].default_city = "Nowhere".to_string();
        assert!(matches!(
            ReferenceDataset::new(tables),
            Err(ReferenceDataError::DefaultCityNotMajor { .. })
        ));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut tables = builtin_tables();
        tables.countries[1].aliases.push("usa".to_string());
        assert!(matches!(
            ReferenceDataset::new(tables),
            Err(ReferenceDataError::DuplicateKey { table: "country", .. })
        ));
    }

    #[test]
    fn test_load_from_json_file() {
        let json = r#"{
            "countries": [{
                "name": "Freedonia",
                "aliases": ["fd"],
                "default_city": "Capital City",
                "major_cities": ["Capital City", "Port Town"],
                "tax_table": "us"
            }]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let ds = ReferenceDataset::from_json_file(file.path()).unwrap();
        assert_eq!(ds.find_country("FD").unwrap().name, "Freedonia");
        assert!(ds.is_major_city("port town", "Freedonia"));
        assert!(ds.find_region_default("usa").is_none());
    }

    #[test]
    fn test_corrupt_json_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            ReferenceDataset::from_json_file(file.path()),
            Err(ReferenceDataError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ReferenceDataset::from_json_file(Path::new("/nonexistent/reference.json"))
            .unwrap_err();
        assert!(matches!(err, ReferenceDataError::Io { .. }));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("U.S.A."), "usa");
        assert_eq!(normalize_key("  Asia-Pacific  "), "asia pacific");
        assert_eq!(normalize_key("New   York"), "new york");
    }
}
