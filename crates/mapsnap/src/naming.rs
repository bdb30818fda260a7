//! Physical naming strategies.
//!
//! A strategy rewrites the table and column names of a mapping document
//! before the snapshot sees them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::BootstrapError;

/// How logical names become physical names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalNamingStrategy {
    /// Names are used as declared.
    #[default]
    Standard,
    /// `OrderLine` becomes `order_line`.
    SnakeCase,
    /// Names are upper-cased.
    UpperCase,
    /// Names are lower-cased.
    LowerCase,
}

impl PhysicalNamingStrategy {
    /// Returns the strategy name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::SnakeCase => "snake_case",
            Self::UpperCase => "upper_case",
            Self::LowerCase => "lower_case",
        }
    }

    /// Applies the strategy to one name.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Standard => name.to_string(),
            Self::SnakeCase => snake_case(name),
            Self::UpperCase => name.to_uppercase(),
            Self::LowerCase => name.to_lowercase(),
        }
    }
}

/// Inserts an underscore where a lowercase letter is followed by an
/// uppercase letter that starts a new lowercase word.
fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.replace('.', "_").chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && i + 1 < chars.len() {
            let (before, after) = (chars[i - 1], chars[i + 1]);
            if before.is_lowercase() && c.is_uppercase() && after.is_lowercase() {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

impl fmt::Display for PhysicalNamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PhysicalNamingStrategy {
    type Err = BootstrapError;

    /// Accepts the short names as well as the well-known qualified strategy
    /// class names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        let simple = key.rsplit('.').next().unwrap_or_default();

        match simple {
            "standard" | "physicalnamingstrategystandardimpl" => Ok(Self::Standard),
            "snakecase"
            | "camelcasetounderscoresnamingstrategy"
            | "springphysicalnamingstrategy" => Ok(Self::SnakeCase),
            "uppercase" => Ok(Self::UpperCase),
            "lowercase" => Ok(Self::LowerCase),
            _ => Err(BootstrapError::UnknownNamingStrategy(s.to_string())),
        }
    }
}
