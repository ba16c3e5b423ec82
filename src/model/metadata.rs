use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};

/// Order in which pages are read and spreads are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl ReadingDirection {
    /// Value for `dir` and `page-progression-direction` attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingDirection::LeftToRight => "ltr",
            ReadingDirection::RightToLeft => "rtl",
        }
    }
}

/// Book metadata (Dublin Core + extensions)
#[derive(Debug, Clone)]
pub struct Metadata {
    pub identifier: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publishing_date: NaiveDate,
    pub language: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub relation: Option<String>,
    pub copyright: Option<String>,
    /// Free-text subjects; a sorted set so output is deterministic.
    pub tags: BTreeSet<String>,
    /// Extension properties rendered as `<meta property="key">value</meta>`.
    pub properties: BTreeMap<String, String>,
    pub direction: ReadingDirection,
    /// Fixed `dcterms:modified` value. When unset the time of rendering is used.
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    pub const DEFAULT_LANGUAGE: &'static str = "en-us";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_direction(mut self, direction: ReadingDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Names of the required fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("identifier", &self.identifier),
            ("title", &self.title),
            ("author", &self.author),
            ("publisher", &self.publisher),
            ("language", &self.language),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Whether every required field is present.
    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            identifier: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            title: String::new(),
            author: String::new(),
            publisher: String::new(),
            publishing_date: Utc::now().date_naive(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
            description: None,
            source: None,
            relation: None,
            copyright: None,
            tags: BTreeSet::new(),
            properties: BTreeMap::new(),
            direction: ReadingDirection::default(),
            modified: None,
        }
    }
}
