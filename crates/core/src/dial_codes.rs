//! Country calling codes for phone number inputs.
//!
//! The full list comes from a remote country catalog. It is fetched at most
//! once per [`DialCodeCatalog`]; when the fetch fails or yields nothing usable
//! the four built-in countries are used instead.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::DialCodeError;

pub const COUNTRIES_URL: &str = "https://restcountries.com/v3.1/all?fields=name,cca2,idd,flag";

const PRIORITY_ISO2: [&str; 4] = ["AU", "CA", "GB", "US"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialCodeOption {
    pub key: String,
    pub iso2: String,
    pub country: String,
    pub dial_code: String,
    pub flag: String,
    pub format_hint: String,
    pub priority: bool,
}

/// One record of the remote catalog. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestCountry {
    pub cca2: Option<String>,
    pub flag: Option<String>,
    pub name: Option<RestCountryName>,
    pub idd: Option<RestCountryIdd>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestCountryName {
    pub common: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestCountryIdd {
    pub root: Option<String>,
    pub suffixes: Option<Vec<String>>,
}

fn option(iso2: &str, country: &str, dial_code: &str, hint: &str) -> DialCodeOption {
    DialCodeOption {
        key: format!("{iso2}:{dial_code}"),
        iso2: iso2.to_string(),
        country: country.to_string(),
        dial_code: dial_code.to_string(),
        flag: flag_from_iso2(iso2),
        format_hint: hint.to_string(),
        priority: PRIORITY_ISO2.contains(&iso2),
    }
}

pub fn default_options() -> Vec<DialCodeOption> {
    vec![
        option("AU", "Australia", "+61", "(##) #### ####"),
        option("CA", "Canada", "+1", "(###) ###-####"),
        option("GB", "United Kingdom", "+44", "#### ### ####"),
        option("US", "United States", "+1", "(###) ###-####"),
    ]
}

fn format_hint(iso2: &str) -> &'static str {
    match iso2 {
        "US" => "Area code + number",
        "CA" => "(###) ###-####",
        "GB" => "#### ### ####",
        "AU" => "(##) #### ####",
        "AR" => "## #### ####",
        _ => "##########",
    }
}

/// Regional-indicator flag emoji for a two-letter code.
pub fn flag_from_iso2(iso2: &str) -> String {
    iso2.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_uppercase)
        .filter_map(|c| char::from_u32(127397 + c as u32))
        .collect()
}

fn non_empty(s: Option<&String>) -> Option<&str> {
    s.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn country_options(country: &RestCountry) -> Vec<DialCodeOption> {
    let iso2 = non_empty(country.cca2.as_ref()).map(str::to_uppercase);
    let name = non_empty(country.name.as_ref().and_then(|n| n.common.as_ref()));
    let root = non_empty(country.idd.as_ref().and_then(|i| i.root.as_ref()));
    let (Some(iso2), Some(name), Some(root)) = (iso2, name, root) else {
        return Vec::new();
    };

    // NANP members list every area code as a suffix; keep the bare +1.
    let suffixes: Vec<&str> = if iso2 == "US" || iso2 == "CA" {
        vec![""]
    } else {
        country
            .idd
            .as_ref()
            .and_then(|i| i.suffixes.as_ref())
            .map(|s| s.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    };

    let flag = country
        .flag
        .clone()
        .unwrap_or_else(|| flag_from_iso2(&iso2));
    suffixes
        .into_iter()
        .map(|suffix| {
            let dial_code: String = format!("{root}{suffix}")
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            DialCodeOption {
                key: format!("{iso2}:{dial_code}"),
                iso2: iso2.clone(),
                country: name.to_string(),
                dial_code,
                flag: flag.clone(),
                format_hint: format_hint(&iso2).to_string(),
                priority: PRIORITY_ISO2.contains(&iso2.as_str()),
            }
        })
        .collect()
}

fn priority_rank(iso2: &str) -> usize {
    PRIORITY_ISO2
        .iter()
        .position(|p| *p == iso2)
        .unwrap_or(PRIORITY_ISO2.len())
}

/// Normalize catalog records into sorted, de-duplicated options.
///
/// Priority countries come first in fixed order, then everything else by
/// country name and dial code. Falls back to [`default_options`] when no
/// record is usable.
pub fn options_from_countries(countries: &[RestCountry]) -> Vec<DialCodeOption> {
    let mut seen = HashSet::new();
    let mut options: Vec<DialCodeOption> = countries
        .iter()
        .flat_map(country_options)
        .filter(|o| seen.insert(o.key.clone()))
        .collect();

    options.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| priority_rank(&a.iso2).cmp(&priority_rank(&b.iso2)))
            .then_with(|| a.country.to_lowercase().cmp(&b.country.to_lowercase()))
            .then_with(|| a.dial_code.cmp(&b.dial_code))
    });

    if options.is_empty() {
        default_options()
    } else {
        options
    }
}

/// Where the catalog records come from.
pub trait DialCodeSource {
    fn fetch(&self) -> Result<Vec<RestCountry>, DialCodeError>;
}

impl<F> DialCodeSource for F
where
    F: Fn() -> Result<Vec<RestCountry>, DialCodeError>,
{
    fn fetch(&self) -> Result<Vec<RestCountry>, DialCodeError> {
        self()
    }
}

#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpDialCodeSource {
    pub url: String,
    pub timeout: std::time::Duration,
}

#[cfg(feature = "http")]
impl Default for HttpDialCodeSource {
    fn default() -> Self {
        Self {
            url: COUNTRIES_URL.to_string(),
            timeout: std::time::Duration::from_secs(10),
        }
    }
}

#[cfg(feature = "http")]
impl DialCodeSource for HttpDialCodeSource {
    fn fetch(&self) -> Result<Vec<RestCountry>, DialCodeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(DialCodeError::Status(status.as_u16()));
        }
        Ok(response.json()?)
    }
}

/// Catalog records stored as JSON on disk, in the same shape the API returns.
#[derive(Debug, Clone)]
pub struct FileDialCodeSource(pub std::path::PathBuf);

impl DialCodeSource for FileDialCodeSource {
    fn fetch(&self) -> Result<Vec<RestCountry>, DialCodeError> {
        let text = std::fs::read_to_string(&self.0)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Fetch-once cache over a [`DialCodeSource`].
///
/// Concurrent callers wait for the single in-flight fetch; later callers get
/// the stored result. Errors are never surfaced, they select the fallback list.
pub struct DialCodeCatalog<S> {
    source: S,
    options: OnceLock<Vec<DialCodeOption>>,
}

impl<S: DialCodeSource> DialCodeCatalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: OnceLock::new(),
        }
    }

    pub fn options(&self) -> &[DialCodeOption] {
        self.options.get_or_init(|| match self.source.fetch() {
            Ok(countries) => {
                debug!(records = countries.len(), "country catalog fetched");
                options_from_countries(&countries)
            }
            Err(error) => {
                warn!(%error, "country catalog unavailable, using defaults");
                default_options()
            }
        })
    }

    /// Result of the fetch if it already completed.
    pub fn cached(&self) -> Option<&[DialCodeOption]> {
        self.options.get().map(Vec::as_slice)
    }
}

/// Process-wide catalog backed by the public country API.
#[cfg(feature = "http")]
pub fn load_country_dial_codes() -> &'static [DialCodeOption] {
    static CATALOG: OnceLock<DialCodeCatalog<HttpDialCodeSource>> = OnceLock::new();
    CATALOG
        .get_or_init(|| DialCodeCatalog::new(HttpDialCodeSource::default()))
        .options()
}

/// Options whose country, dial code or ISO code contains `query`.
/// Priority countries keep their order; the rest are alphabetical.
pub fn filter_options<'a>(options: &'a [DialCodeOption], query: &str) -> Vec<&'a DialCodeOption> {
    let needle = query.trim().to_lowercase();
    let compact: String = needle.chars().filter(|c| !c.is_whitespace()).collect();
    let matches = |o: &DialCodeOption| {
        needle.is_empty()
            || o.country.to_lowercase().contains(&needle)
            || o.dial_code.replace(' ', "").contains(&compact)
            || o.iso2.to_lowercase().contains(&needle)
    };

    let mut priority: Vec<&DialCodeOption> = options.iter().filter(|o| o.priority && matches(o)).collect();
    let mut rest: Vec<&DialCodeOption> = options.iter().filter(|o| !o.priority && matches(o)).collect();
    rest.sort_by(|a, b| {
        a.country
            .to_lowercase()
            .cmp(&b.country.to_lowercase())
            .then_with(|| a.dial_code.cmp(&b.dial_code))
    });
    priority.append(&mut rest);
    priority
}

fn digit_range(digits: &str, from: usize, to: usize) -> &str {
    let to = to.min(digits.len());
    if from >= to {
        ""
    } else {
        &digits[from..to]
    }
}

/// Format typed input for the selected country.
pub fn format_phone_number(value: &str, option: &DialCodeOption) -> String {
    if option.iso2 == "US" {
        return value
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '.' | '-'))
            .take(14)
            .collect();
    }

    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let part = |from: usize, to: usize| digit_range(&digits, from, to);
    let grouped = |bounds: [(usize, usize); 3]| -> String {
        bounds
            .iter()
            .map(|&(a, b)| digit_range(&digits, a, b))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };

    match option.dial_code.as_str() {
        "+1" => {
            let (p1, p2, p3) = (part(0, 3), part(3, 6), part(6, 10));
            if p1.is_empty() {
                String::new()
            } else if p2.is_empty() {
                format!("({p1}")
            } else if p3.is_empty() {
                format!("({p1}) {p2}")
            } else {
                format!("({p1}) {p2}-{p3}")
            }
        }
        "+44" | "+61" => grouped([(0, 4), (4, 7), (7, 11)]),
        "+54" => grouped([(0, 2), (2, 6), (6, 10)]),
        _ => part(0, 12).to_string(),
    }
}
