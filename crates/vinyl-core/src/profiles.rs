//! Store site profiles: declarative scraping configuration for one store.
//!
//! Profiles arrive as loosely-typed records (a YAML mapping or a CSV row per
//! store) and are validated into [`SiteProfile`] values. A record that fails
//! validation is rejected as a whole and reported; it is never patched up
//! with defaults.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ConfigError;

const NAME: Field = Field::new("name", "Name");
const BASE_URL: Field = Field::new("baseurl", "BaseURL");
const PAGINATION_PARAM: Field = Field::new("paginationparam", "PaginationParam");
const START_PAGE: Field = Field::new("startpage", "StartPage");
const END_PAGE: Field = Field::new("endpage", "EndPage");
const PRODUCT_CONTAINER: Field = Field::new("productcontainer", "ProductContainer");
const TITLE_ELEMENT: Field = Field::new("titleelement", "TitleElement");
const PRICE_ELEMENT: Field = Field::new("priceelement", "PriceElement");
const LINK_ELEMENT: Field = Field::new("linkelement", "LinkElement");
const ARTIST_ELEMENT: Field = Field::new("artistelement", "ArtistElement");

#[derive(Debug, Clone, Copy)]
struct Field {
    key: &'static str,
    label: &'static str,
}

impl Field {
    const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Why a raw profile record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("required field {0} is missing or blank")]
    MissingRequiredField(&'static str),

    #[error("selector family {0} has no selectors after splitting on commas")]
    EmptySelectorFamily(&'static str),

    #[error("{field} is not an integer: \"{value}\"")]
    NonIntegerPageBound { field: &'static str, value: String },

    #[error("invalid page range {start}..={end}; pages are 1-based and start must not exceed end")]
    InvalidPageRange { start: i64, end: i64 },

    #[error("BaseURL \"{url}\" is not an absolute http(s) URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("duplicate store name: '{0}'")]
    DuplicateName(String),
}

/// An ordered list of alternative CSS selectors for one logical field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectorFamily(Vec<String>);

impl SelectorFamily {
    /// Splits a comma-separated selector list, trimming each entry and
    /// dropping blanks.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    #[must_use]
    pub fn new(selectors: Vec<String>) -> Self {
        Self(selectors)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The comma-separated form accepted by [`SelectorFamily::parse`].
    #[must_use]
    pub fn to_raw(&self) -> String {
        self.0.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectorSet {
    pub product_container: SelectorFamily,
    pub title: SelectorFamily,
    pub price: SelectorFamily,
    pub link: SelectorFamily,
    /// Empty when the store shows the artist only inside the title.
    pub artist: SelectorFamily,
}

/// Validated scraping configuration for one store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteProfile {
    pub name: String,
    pub base_url: String,
    /// Query parameter carrying the page number; `None` means the store is
    /// scraped from its first page only.
    pub pagination_param: Option<String>,
    pub start_page: u32,
    pub end_page: u32,
    pub selectors: SelectorSet,
}

impl SiteProfile {
    /// Number of pages in the configured range; zero when the range is
    /// inverted.
    #[must_use]
    pub fn page_span(&self) -> u32 {
        if self.start_page > self.end_page {
            return 0;
        }
        (self.end_page - self.start_page).saturating_add(1)
    }
}

/// One loosely-typed profile record keyed by normalized field name.
///
/// Field names are matched case- and whitespace-insensitively, so
/// `"Base URL"`, `"baseurl"` and `" BaseURL "` address the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSiteProfile(BTreeMap<String, String>);

impl RawSiteProfile {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (normalize_field_name(k.as_ref()), v.into()))
                .collect(),
        )
    }

    pub fn insert(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(normalize_field_name(field), value.into());
    }

    /// The trimmed value of `field`, or `None` when absent or blank.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(&normalize_field_name(field))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, field: Field) -> Result<&str, RejectionReason> {
        self.get(field.key)
            .ok_or(RejectionReason::MissingRequiredField(field.label))
    }

    fn required_family(&self, field: Field) -> Result<SelectorFamily, RejectionReason> {
        let family = SelectorFamily::parse(self.required(field)?);
        if family.is_empty() {
            return Err(RejectionReason::EmptySelectorFamily(field.label));
        }
        Ok(family)
    }

    fn page_bound(&self, field: Field) -> Result<i64, RejectionReason> {
        match self.get(field.key) {
            None => Ok(1),
            Some(value) => value
                .parse::<i64>()
                .map_err(|_| RejectionReason::NonIntegerPageBound {
                    field: field.label,
                    value: value.to_owned(),
                }),
        }
    }
}

impl From<&SiteProfile> for RawSiteProfile {
    fn from(profile: &SiteProfile) -> Self {
        let mut raw = RawSiteProfile::default();
        raw.insert(NAME.key, profile.name.clone());
        raw.insert(BASE_URL.key, profile.base_url.clone());
        if let Some(param) = &profile.pagination_param {
            raw.insert(PAGINATION_PARAM.key, param.clone());
        }
        raw.insert(START_PAGE.key, profile.start_page.to_string());
        raw.insert(END_PAGE.key, profile.end_page.to_string());
        let s = &profile.selectors;
        raw.insert(PRODUCT_CONTAINER.key, s.product_container.to_raw());
        raw.insert(TITLE_ELEMENT.key, s.title.to_raw());
        raw.insert(PRICE_ELEMENT.key, s.price.to_raw());
        raw.insert(LINK_ELEMENT.key, s.link.to_raw());
        if !s.artist.is_empty() {
            raw.insert(ARTIST_ELEMENT.key, s.artist.to_raw());
        }
        raw
    }
}

fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Validates one raw record into a [`SiteProfile`].
///
/// # Errors
///
/// Returns the first [`RejectionReason`] found; no partial profile is
/// produced.
pub fn validate(raw: &RawSiteProfile) -> Result<SiteProfile, RejectionReason> {
    let name = raw.required(NAME)?.to_owned();
    let base_url = raw.required(BASE_URL)?.to_owned();
    check_base_url(&base_url)?;

    let pagination_param = raw.get(PAGINATION_PARAM.key).map(str::to_owned);

    let start = raw.page_bound(START_PAGE)?;
    let end = raw.page_bound(END_PAGE)?;
    if start < 1 || start > end {
        return Err(RejectionReason::InvalidPageRange { start, end });
    }
    let (Ok(start_page), Ok(end_page)) = (u32::try_from(start), u32::try_from(end)) else {
        return Err(RejectionReason::InvalidPageRange { start, end });
    };

    let selectors = SelectorSet {
        product_container: raw.required_family(PRODUCT_CONTAINER)?,
        title: raw.required_family(TITLE_ELEMENT)?,
        price: raw.required_family(PRICE_ELEMENT)?,
        link: raw.required_family(LINK_ELEMENT)?,
        artist: SelectorFamily::parse(raw.get(ARTIST_ELEMENT.key).unwrap_or_default()),
    };

    Ok(SiteProfile {
        name,
        base_url,
        pagination_param,
        start_page,
        end_page,
        selectors,
    })
}

fn check_base_url(base_url: &str) -> Result<(), RejectionReason> {
    let invalid = |reason: String| RejectionReason::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason,
    };
    let parsed = url::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_owned()));
    }
    Ok(())
}

/// A record that did not become a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRejection {
    /// Zero-based position of the record in its source.
    pub index: usize,
    /// The record's `Name`, when it had one.
    pub name: Option<String>,
    pub reason: RejectionReason,
}

/// The valid profiles of a configuration source plus everything rejected.
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    pub profiles: Vec<SiteProfile>,
    pub rejections: Vec<ProfileRejection>,
}

impl ProfileSet {
    /// Validates every record independently, keeping source order. Later
    /// records whose name repeats an accepted one (case-insensitively) are
    /// rejected as duplicates.
    #[must_use]
    pub fn from_raw(records: &[RawSiteProfile]) -> Self {
        let mut set = ProfileSet::default();
        let mut seen_names = HashSet::new();

        for (index, raw) in records.iter().enumerate() {
            let outcome = validate(raw).and_then(|profile| {
                if seen_names.insert(profile.name.to_lowercase()) {
                    Ok(profile)
                } else {
                    Err(RejectionReason::DuplicateName(profile.name))
                }
            });

            match outcome {
                Ok(profile) => set.profiles.push(profile),
                Err(reason) => {
                    let name = raw.get(NAME.key).map(str::to_owned);
                    tracing::warn!(
                        index,
                        name = name.as_deref().unwrap_or("<unnamed>"),
                        %reason,
                        "skipping site profile"
                    );
                    set.rejections.push(ProfileRejection {
                        index,
                        name,
                        reason,
                    });
                }
            }
        }

        set
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SiteProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct SitesFile {
    sites: Vec<BTreeMap<String, serde_yaml::Value>>,
}

/// Load site profiles from a YAML (`sites:` list) or CSV (header row) file.
///
/// Invalid records are collected in [`ProfileSet::rejections`]; only
/// problems with the file as a whole are errors.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or has an
/// unsupported extension.
pub fn load_site_profiles(path: &Path) -> Result<ProfileSet, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let records = match extension.as_deref() {
        Some("yaml" | "yml") => parse_yaml_records(&content)?,
        Some("csv") => parse_csv_records(&content, &path.display().to_string())?,
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            })
        }
    };

    let set = ProfileSet::from_raw(&records);
    tracing::info!(
        path = %path.display(),
        accepted = set.profiles.len(),
        rejected = set.rejections.len(),
        "loaded site profiles"
    );
    Ok(set)
}

/// Parses a YAML document with a top-level `sites:` list of mappings.
///
/// Scalar values are taken as text; a list value (e.g. several selectors)
/// is joined with commas.
///
/// # Errors
///
/// Returns [`ConfigError::ProfilesYaml`] if the document does not have that shape.
pub fn parse_yaml_records(content: &str) -> Result<Vec<RawSiteProfile>, ConfigError> {
    let file: SitesFile = serde_yaml::from_str(content)?;
    Ok(file
        .sites
        .into_iter()
        .map(|record| {
            RawSiteProfile::from_pairs(record.into_iter().map(|(k, v)| (k, yaml_value_text(&v))))
        })
        .collect())
}

/// Parses CSV text whose header row names the profile fields.
///
/// # Errors
///
/// Returns [`ConfigError::Csv`] on malformed CSV.
pub fn parse_csv_records(content: &str, source: &str) -> Result<Vec<RawSiteProfile>, ConfigError> {
    let csv_err = |e: csv::Error| ConfigError::Csv {
        path: source.to_owned(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        records.push(RawSiteProfile::from_pairs(
            headers.iter().zip(row.iter()).map(|(k, v)| (k, v.to_owned())),
        ));
    }
    Ok(records)
}

fn yaml_value_text(value: &serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Sequence(items) => items
            .iter()
            .map(yaml_value_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Mapping(_) | Value::Tagged(_) => String::new(),
    }
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
