//! Compiled-in reference tables. Order matters: when a city name is listed by
//! several countries, earlier countries win ties.

use super::{
    CompanyHeadquarters, CountryProfile, ReferenceTables, RegionLevel, RegionMapping,
    Subdivision, TimezoneHint,
};

const COUNTRIES: &[(&str, &[&str], &str, &[&str], &str)] = &[
    (
        "United States",
        &["usa", "us", "united states of america", "america"],
        "New York",
        &[
            "New York", "San Francisco", "Los Angeles", "Seattle", "Austin", "Boston",
            "Chicago", "Denver", "Washington", "Atlanta", "Miami", "Dallas", "Houston",
            "San Jose", "San Diego", "Portland", "Philadelphia", "Phoenix", "Minneapolis",
            "Raleigh", "Salt Lake City", "Pittsburgh", "Nashville", "Detroit", "Cambridge",
        ],
        "us",
    ),
    (
        "United Kingdom",
        &["uk", "gb", "great britain", "britain", "england", "scotland", "wales"],
        "London",
        &[
            "London", "Manchester", "Edinburgh", "Birmingham", "Bristol", "Cambridge",
            "Oxford", "Glasgow", "Leeds", "Belfast",
        ],
        "uk",
    ),
    (
        "Canada",
        &[],
        "Toronto",
        &["Toronto", "Vancouver", "Montreal", "Calgary", "Ottawa", "Edmonton", "Waterloo", "London"],
        "ca",
    ),
    (
        "Germany",
        &["deutschland"],
        "Berlin",
        &["Berlin", "Munich", "Hamburg", "Frankfurt", "Cologne", "Stuttgart", "Dusseldorf"],
        "de",
    ),
    (
        "France",
        &[],
        "Paris",
        &["Paris", "Lyon", "Marseille", "Toulouse", "Nice", "Bordeaux"],
        "fr",
    ),
    (
        "Netherlands",
        &["the netherlands", "holland", "nl"],
        "Amsterdam",
        &["Amsterdam", "Rotterdam", "Utrecht", "Eindhoven", "The Hague"],
        "nl",
    ),
    (
        "Spain",
        &["espana"],
        "Madrid",
        &["Madrid", "Barcelona", "Valencia", "Seville", "Malaga"],
        "es",
    ),
    (
        "Ireland",
        &["eire", "republic of ireland"],
        "Dublin",
        &["Dublin", "Cork", "Galway"],
        "ie",
    ),
    (
        "Switzerland",
        &["ch", "schweiz", "suisse"],
        "Zurich",
        &["Zurich", "Geneva", "Basel", "Lausanne"],
        "ch",
    ),
    (
        "Sweden",
        &["sverige"],
        "Stockholm",
        &["Stockholm", "Gothenburg", "Malmo"],
        "se",
    ),
    (
        "Poland",
        &["polska"],
        "Warsaw",
        &["Warsaw", "Krakow", "Wroclaw"],
        "pl",
    ),
    ("Portugal", &[], "Lisbon", &["Lisbon", "Porto"], "pt"),
    (
        "India",
        &["bharat"],
        "Bangalore",
        &[
            "Bangalore", "Bengaluru", "Mumbai", "Delhi", "New Delhi", "Hyderabad", "Pune",
            "Chennai", "Gurgaon", "Noida",
        ],
        "in",
    ),
    ("Singapore", &["sg"], "Singapore", &["Singapore"], "sg"),
    ("Japan", &["jp"], "Tokyo", &["Tokyo", "Osaka", "Kyoto"], "jp"),
    (
        "Australia",
        &["aus", "au"],
        "Sydney",
        &["Sydney", "Melbourne", "Brisbane", "Perth", "Adelaide", "Canberra"],
        "au",
    ),
    (
        "United Arab Emirates",
        &["uae", "emirates"],
        "Dubai",
        &["Dubai", "Abu Dhabi"],
        "ae",
    ),
    ("Brazil", &["brasil"], "Sao Paulo", &["Sao Paulo", "Rio de Janeiro"], "br"),
    (
        "Mexico",
        &["mx"],
        "Mexico City",
        &["Mexico City", "Guadalajara", "Monterrey"],
        "mx",
    ),
    ("Israel", &[], "Tel Aviv", &["Tel Aviv", "Jerusalem", "Haifa"], "il"),
];

const EUROPE: &[&str] = &[
    "United Kingdom", "Germany", "France", "Netherlands", "Spain", "Ireland", "Switzerland",
    "Sweden", "Poland", "Portugal",
];
const EU: &[&str] = &[
    "Germany", "France", "Netherlands", "Spain", "Ireland", "Sweden", "Poland", "Portugal",
];
const EMEA: &[&str] = &[
    "United Kingdom", "Germany", "France", "Netherlands", "Spain", "Ireland", "Switzerland",
    "Sweden", "Poland", "Portugal", "United Arab Emirates", "Israel",
];

const REGIONS: &[(&str, &[&str], RegionLevel, &str, &str, &[&str])] = &[
    (
        "United States",
        &["usa", "us", "united states", "united states of america", "america"],
        RegionLevel::Country,
        "New York",
        "United States",
        &["United States"],
    ),
    ("Europe", &["europe"], RegionLevel::Continent, "Berlin", "Germany", EUROPE),
    (
        "European Union",
        &["eu", "european union"],
        RegionLevel::CountryGroup,
        "Berlin",
        "Germany",
        EU,
    ),
    ("EMEA", &["emea"], RegionLevel::CountryGroup, "London", "United Kingdom", EMEA),
    (
        "DACH",
        &["dach"],
        RegionLevel::CountryGroup,
        "Berlin",
        "Germany",
        &["Germany", "Switzerland"],
    ),
    (
        "Nordics",
        &["nordics", "nordic", "scandinavia"],
        RegionLevel::CountryGroup,
        "Stockholm",
        "Sweden",
        &["Sweden"],
    ),
    (
        "Benelux",
        &["benelux"],
        RegionLevel::CountryGroup,
        "Amsterdam",
        "Netherlands",
        &["Netherlands"],
    ),
    (
        "APAC",
        &["apac", "asia pacific"],
        RegionLevel::CountryGroup,
        "Singapore",
        "Singapore",
        &["India", "Singapore", "Japan", "Australia"],
    ),
    (
        "Asia",
        &["asia"],
        RegionLevel::Continent,
        "Singapore",
        "Singapore",
        &["India", "Singapore", "Japan", "United Arab Emirates", "Israel"],
    ),
    (
        "Oceania",
        &["oceania", "australasia", "anz"],
        RegionLevel::Continent,
        "Sydney",
        "Australia",
        &["Australia"],
    ),
    (
        "North America",
        &["north america"],
        RegionLevel::Continent,
        "New York",
        "United States",
        &["United States", "Canada", "Mexico"],
    ),
    (
        "Americas",
        &["americas", "the americas"],
        RegionLevel::Continent,
        "New York",
        "United States",
        &["United States", "Canada", "Mexico", "Brazil"],
    ),
    (
        "LATAM",
        &["latam", "latin america"],
        RegionLevel::CountryGroup,
        "Sao Paulo",
        "Brazil",
        &["Brazil", "Mexico"],
    ),
    (
        "South America",
        &["south america"],
        RegionLevel::Continent,
        "Sao Paulo",
        "Brazil",
        &["Brazil"],
    ),
    (
        "Middle East",
        &["middle east", "mena", "gcc"],
        RegionLevel::CountryGroup,
        "Dubai",
        "United Arab Emirates",
        &["United Arab Emirates", "Israel"],
    ),
];

const US_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"), ("Alaska", "AK"), ("Arizona", "AZ"), ("Arkansas", "AR"),
    ("California", "CA"), ("Colorado", "CO"), ("Connecticut", "CT"), ("Delaware", "DE"),
    ("District of Columbia", "DC"), ("Florida", "FL"), ("Georgia", "GA"), ("Hawaii", "HI"),
    ("Idaho", "ID"), ("Illinois", "IL"), ("Indiana", "IN"), ("Iowa", "IA"),
    ("Kansas", "KS"), ("Kentucky", "KY"), ("Louisiana", "LA"), ("Maine", "ME"),
    ("Maryland", "MD"), ("Massachusetts", "MA"), ("Michigan", "MI"), ("Minnesota", "MN"),
    ("Mississippi", "MS"), ("Missouri", "MO"), ("Montana", "MT"), ("Nebraska", "NE"),
    ("Nevada", "NV"), ("New Hampshire", "NH"), ("New Jersey", "NJ"), ("New Mexico", "NM"),
    ("New York", "NY"), ("North Carolina", "NC"), ("North Dakota", "ND"), ("Ohio", "OH"),
    ("Oklahoma", "OK"), ("Oregon", "OR"), ("Pennsylvania", "PA"), ("Rhode Island", "RI"),
    ("South Carolina", "SC"), ("South Dakota", "SD"), ("Tennessee", "TN"), ("Texas", "TX"),
    ("Utah", "UT"), ("Vermont", "VT"), ("Virginia", "VA"), ("Washington", "WA"),
    ("West Virginia", "WV"), ("Wisconsin", "WI"), ("Wyoming", "WY"),
];

const OTHER_SUBDIVISIONS: &[(&str, &str, &str)] = &[
    ("Ontario", "ON", "Canada"),
    ("British Columbia", "BC", "Canada"),
    ("Quebec", "QC", "Canada"),
    ("Alberta", "AB", "Canada"),
    ("Manitoba", "MB", "Canada"),
    ("Nova Scotia", "NS", "Canada"),
    ("New South Wales", "NSW", "Australia"),
    ("Victoria", "VIC", "Australia"),
    ("Queensland", "QLD", "Australia"),
    ("Western Australia", "WA", "Australia"),
    ("South Australia", "SA", "Australia"),
    ("Australian Capital Territory", "ACT", "Australia"),
    ("Karnataka", "KA", "India"),
    ("Maharashtra", "MH", "India"),
    ("Telangana", "TG", "India"),
    ("Tamil Nadu", "TN", "India"),
    ("Haryana", "HR", "India"),
    ("Uttar Pradesh", "UP", "India"),
    ("Bavaria", "BY", "Germany"),
    ("North Rhine-Westphalia", "NRW", "Germany"),
    ("Hesse", "HE", "Germany"),
    ("Catalonia", "CT", "Spain"),
    ("Ile-de-France", "IDF", "France"),
];

const TIMEZONES: &[(&[&str], &str, &str)] = &[
    (&["EST", "EDT", "ET"], "New York", "United States"),
    (&["CST", "CDT", "CT"], "Chicago", "United States"),
    (&["MST", "MDT", "MT"], "Denver", "United States"),
    (&["PST", "PDT", "PT"], "San Francisco", "United States"),
    (&["GMT", "BST"], "London", "United Kingdom"),
    (&["WET", "WEST"], "Lisbon", "Portugal"),
    (&["CET", "CEST"], "Berlin", "Germany"),
    (&["IST"], "Bangalore", "India"),
    (&["SGT"], "Singapore", "Singapore"),
    (&["JST"], "Tokyo", "Japan"),
    (&["AEST", "AEDT"], "Sydney", "Australia"),
    (&["GST"], "Dubai", "United Arab Emirates"),
    (&["BRT"], "Sao Paulo", "Brazil"),
];

const COMPANIES: &[(&str, &[&str], &str, Option<&str>, &str)] = &[
    ("Google", &["alphabet"], "Mountain View", Some("California"), "United States"),
    ("Microsoft", &[], "Redmond", Some("Washington"), "United States"),
    ("Apple", &[], "Cupertino", Some("California"), "United States"),
    ("Amazon", &["aws", "amazon web services"], "Seattle", Some("Washington"), "United States"),
    ("Meta", &["facebook"], "Menlo Park", Some("California"), "United States"),
    ("Netflix", &[], "Los Gatos", Some("California"), "United States"),
    ("Stripe", &[], "San Francisco", Some("California"), "United States"),
    ("Salesforce", &[], "San Francisco", Some("California"), "United States"),
    ("Nvidia", &[], "Santa Clara", Some("California"), "United States"),
    ("IBM", &[], "Armonk", Some("New York"), "United States"),
    ("Shopify", &[], "Ottawa", Some("Ontario"), "Canada"),
    ("Spotify", &[], "Stockholm", None, "Sweden"),
    ("SAP", &[], "Walldorf", None, "Germany"),
    ("Zalando", &[], "Berlin", None, "Germany"),
    ("Atlassian", &[], "Sydney", Some("New South Wales"), "Australia"),
    ("Canva", &[], "Sydney", Some("New South Wales"), "Australia"),
    ("Infosys", &[], "Bangalore", Some("Karnataka"), "India"),
    ("Tata Consultancy Services", &["tcs"], "Mumbai", Some("Maharashtra"), "India"),
    ("Grab", &[], "Singapore", None, "Singapore"),
    ("Sony", &[], "Tokyo", None, "Japan"),
    ("Booking.com", &["booking"], "Amsterdam", None, "Netherlands"),
    ("Adyen", &[], "Amsterdam", None, "Netherlands"),
    ("Revolut", &[], "London", None, "United Kingdom"),
    ("Monzo", &[], "London", None, "United Kingdom"),
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn builtin_tables() -> ReferenceTables {
    let countries = COUNTRIES
        .iter()
        .map(|(name, aliases, default_city, majors, tax)| CountryProfile {
            name: name.to_string(),
            aliases: strings(aliases),
            default_city: default_city.to_string(),
            major_cities: strings(majors),
            tax_table: tax.to_string(),
        })
        .collect();

    let regions = REGIONS
        .iter()
        .map(|(name, keywords, level, city, country, members)| RegionMapping {
            name: name.to_string(),
            keywords: strings(keywords),
            level: *level,
            default_city: city.to_string(),
            default_country: country.to_string(),
            countries: strings(members),
        })
        .collect();

    let subdivisions = US_STATES
        .iter()
        .map(|(name, code)| (*name, *code, "United States"))
        .chain(OTHER_SUBDIVISIONS.iter().copied())
        .map(|(name, code, country)| Subdivision {
            name: name.to_string(),
            code: code.to_string(),
            country: country.to_string(),
        })
        .collect();

    let timezones = TIMEZONES
        .iter()
        .map(|(abbrs, city, country)| TimezoneHint {
            abbreviations: strings(abbrs),
            city: city.to_string(),
            country: country.to_string(),
        })
        .collect();

    let companies = COMPANIES
        .iter()
        .map(|(company, aliases, city, state, country)| CompanyHeadquarters {
            company: company.to_string(),
            aliases: strings(aliases),
            city: city.to_string(),
            state: state.map(str::to_string),
            country: country.to_string(),
        })
        .collect();

    ReferenceTables {
        countries,
        regions,
        subdivisions,
        timezones,
        companies,
    }
}
