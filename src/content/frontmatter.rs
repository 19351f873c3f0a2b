//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors from reading a front-matter block
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front-matter opened with `{delimiter}` is never closed")]
    Unterminated { delimiter: &'static str },
    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid TOML front-matter: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key the `toml` crate uses to pass a datetime through serde
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Reads a scalar (string, number, bool) as a string
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, MapAccess, Visitor};

    struct Scalar;

    impl<'de> Visitor<'de> for Scalar {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or date")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        // TOML datetimes arrive as a one-entry map holding their string form;
        // any other table is a type error
        fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
            match map.next_key::<String>()? {
                Some(key) if key == TOML_DATETIME_KEY => Ok(Some(map.next_value::<String>()?)),
                _ => Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
            }
        }
    }

    deserializer.deserialize_any(Scalar)
}

/// Accepts a single string or a list of strings and keeps the first entry
fn first_of_string_or_vec<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<Self::Value, S::Error> {
            let first = seq.next_element::<String>()?;
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            Ok(first)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `categories: [a, b]` is accepted too; only the first entry is used
    #[serde(
        alias = "categories",
        deserialize_with = "first_of_string_or_vec",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if let Some((block, rest)) = split_block(content, "---")? {
            return Self::parse_yaml(content, block, rest);
        }

        if let Some((block, rest)) = split_block(content, "+++")? {
            let fm = if block.trim().is_empty() {
                FrontMatter::default()
            } else {
                toml::from_str(block)?
            };
            return Ok((fm, rest));
        }

        if let Some((block, rest)) = split_block(content, ";;;")? {
            let fm = if block.trim().is_empty() {
                FrontMatter::default()
            } else {
                serde_json::from_str(block)?
            };
            return Ok((fm, rest));
        }

        // No front-matter found
        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml<'a>(
        content: &'a str,
        yaml: &str,
        remaining: &'a str,
    ) -> Result<(Self, &'a str), FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // A `---` pair around prose is two thematic breaks, not metadata
        if !has_yaml_structure(yaml) {
            return Ok((FrontMatter::default(), content));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok((fm, remaining))
    }

    /// Serialize the metadata back into a `---` delimited YAML block
    pub fn to_yaml(&self) -> Result<String, FrontMatterError> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n", yaml))
    }

    /// Parse the date string into a calendar value
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Split `delimiter\n block \ndelimiter\n rest`.
///
/// `Ok(None)` when the content does not open with the delimiter on its own
/// line, an error when the opening delimiter is never closed.
fn split_block<'a>(
    content: &'a str,
    delimiter: &'static str,
) -> Result<Option<(&'a str, &'a str)>, FrontMatterError> {
    let Some(after) = content.strip_prefix(delimiter) else {
        return Ok(None);
    };

    let (opening_rest, block_start) = match after.find('\n') {
        Some(pos) => (&after[..pos], delimiter.len() + pos + 1),
        None => (after, content.len()),
    };
    if !opening_rest.trim().is_empty() {
        return Ok(None);
    }

    let mut offset = block_start;
    for line in content[block_start..].split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let block = &content[block_start..offset];
            let rest = content[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok(Some((block, rest)));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated { delimiter })
}

/// Valid YAML front-matter has at least one `key: value` line
fn has_yaml_structure(yaml: &str) -> bool {
    yaml.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    const DATETIME_FORMATS: [&str; 7] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
