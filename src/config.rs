//! Document configuration.
//!
//! [`DocumentConfig`] is built with `with_*` methods or loaded from JSON.
//! The stream cache strategy is an ordinary field here and is passed down to
//! stream constructors; nothing is configured globally.

use crate::compliance::Profile;
use crate::error::{Error, Result};
use crate::number::{clamp_precision, DEFAULT_PRECISION};
use crate::stream::{CacheStrategy, FilterMap};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default `/Producer`.
pub const DEFAULT_PRODUCER: &str = concat!("pdf_scribe ", env!("CARGO_PKG_VERSION"));

/// PDF version written in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PdfVersion {
    /// PDF 1.3
    #[serde(rename = "1.3")]
    V1_3,
    /// PDF 1.4
    #[default]
    #[serde(rename = "1.4")]
    V1_4,
    /// PDF 1.5
    #[serde(rename = "1.5")]
    V1_5,
    /// PDF 1.6
    #[serde(rename = "1.6")]
    V1_6,
    /// PDF 1.7
    #[serde(rename = "1.7")]
    V1_7,
    /// PDF 2.0
    #[serde(rename = "2.0")]
    V2_0,
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match self {
            PdfVersion::V1_3 => "1.3",
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_5 => "1.5",
            PdfVersion::V1_6 => "1.6",
            PdfVersion::V1_7 => "1.7",
            PdfVersion::V2_0 => "2.0",
        };
        write!(f, "{}", version)
    }
}

/// Settings for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Header version
    pub version: PdfVersion,
    /// Decimal places for reals (1..=16)
    pub precision: u8,
    /// Buffering of stream payloads
    pub cache_strategy: CacheStrategy,
    /// Filters per stream category
    pub filter_map: FilterMap,
    /// Force the null filter on every stream
    pub disable_filters: bool,
    /// Conformance profile
    pub profile: Profile,
    /// `/Producer`
    pub producer: String,
    /// `/Creator`
    pub creator: Option<String>,
    /// `/Title`
    pub title: Option<String>,
    /// `/Author`
    pub author: Option<String>,
    /// `/Subject`
    pub subject: Option<String>,
    /// `/Keywords`
    pub keywords: Option<String>,
    /// `/CreationDate`; the current time when unset
    pub creation_date: Option<DateTime<FixedOffset>>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            version: PdfVersion::default(),
            precision: DEFAULT_PRECISION,
            cache_strategy: CacheStrategy::default(),
            filter_map: FilterMap::default(),
            disable_filters: false,
            profile: Profile::default(),
            producer: DEFAULT_PRODUCER.to_string(),
            creator: None,
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creation_date: None,
        }
    }
}

impl DocumentConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid document configuration: {}", e)))?;
        config.precision = clamp_precision(config.precision);
        config.profile.validate()?;
        Ok(config)
    }

    /// Set the PDF version.
    pub fn with_version(mut self, version: PdfVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the real-number precision (capped to 1..=16).
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = clamp_precision(precision);
        self
    }

    /// Set the stream cache strategy.
    pub fn with_cache_strategy(mut self, strategy: CacheStrategy) -> Self {
        self.cache_strategy = strategy;
        self
    }

    /// Set the filter map.
    pub fn with_filter_map(mut self, map: FilterMap) -> Self {
        self.filter_map = map;
        self
    }

    /// Disable all stream filters (useful for inspecting output).
    pub fn with_filters_disabled(mut self, disable: bool) -> Self {
        self.disable_filters = disable;
        self
    }

    /// Set the conformance profile.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the producer.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    /// Set the creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set document keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set the creation date.
    pub fn with_creation_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.creation_date = Some(date);
        self
    }
}
