//! Connection URLs for mapping sources.
//!
//! A URL has the form `<scheme>:<path>[?key=value&key=value]`, for example
//! `hibernate:classic:config/auction.json?dialect=mysql`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::BootstrapError;

/// The kinds of mapping source a URL can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// A classic Hibernate configuration, or a registered factory.
    HibernateClassic,
    /// An EJB3 persistence unit.
    HibernateEjb3,
    /// A Spring-managed session factory or entity manager.
    HibernateSpring,
    /// A plain JPA persistence unit.
    JpaPersistence,
}

impl SourceKind {
    /// Every source kind.
    pub const ALL: [Self; 4] = [
        Self::HibernateClassic,
        Self::HibernateEjb3,
        Self::HibernateSpring,
        Self::JpaPersistence,
    ];

    /// URL prefix, including the trailing colon.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::HibernateClassic => "hibernate:classic:",
            Self::HibernateEjb3 => "hibernate:ejb3:",
            Self::HibernateSpring => "hibernate:spring:",
            Self::JpaPersistence => "jpa:persistence:",
        }
    }

    /// Short name.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::HibernateClassic => "hibernateClassic",
            Self::HibernateEjb3 => "hibernateEjb3",
            Self::HibernateSpring => "hibernateSpring",
            Self::JpaPersistence => "jpaPersistence",
        }
    }

    /// Product name shown to users.
    #[must_use]
    pub const fn product_name(self) -> &'static str {
        match self {
            Self::HibernateClassic => "Hibernate Classic",
            Self::HibernateEjb3 => "Hibernate EJB3",
            Self::HibernateSpring => "Hibernate Spring",
            Self::JpaPersistence => "JPA Persistence",
        }
    }

    /// Finds the kind whose prefix starts `url`.
    #[must_use]
    pub fn detect(url: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| url.starts_with(kind.prefix()))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A parsed connection URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUrl {
    raw: String,
    kind: SourceKind,
    path: String,
    properties: BTreeMap<String, String>,
}

impl ConnectionUrl {
    /// The URL as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The source kind.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Path to the mapping document, or the name of a registered factory.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the first of `keys` set on the URL.
    #[must_use]
    pub fn property(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|key| self.properties.get(*key))
            .map(String::as_str)
    }

    /// All URL properties.
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl FromStr for ConnectionUrl {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let kind = SourceKind::detect(raw)
            .ok_or_else(|| BootstrapError::UnsupportedUrl(raw.to_string()))?;
        let rest = &raw[kind.prefix().len()..];
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let path = path.trim();
        if path.is_empty() {
            return Err(BootstrapError::EmptyPath(raw.to_string()));
        }

        let properties = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (key.trim().to_string(), value.trim().to_string())
            })
            .collect();

        Ok(Self {
            raw: raw.to_string(),
            kind,
            path: path.to_string(),
            properties,
        })
    }
}

impl fmt::Display for ConnectionUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
