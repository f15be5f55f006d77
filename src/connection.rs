//! PostgreSQL connection descriptors.
//!
//! Connection strings use the libpq keyword/value form
//! (`dbname=gis host=localhost active_schema=public`). Values may be wrapped
//! in single quotes, inside which `\'` and `\\` are escapes. Parameter order
//! is preserved through parse and serialize.

use crate::error::{GisError, Result};
use std::fmt;
use std::str::FromStr;

/// Key of the parameter that selects the default schema for the OGR PG driver.
pub const ACTIVE_SCHEMA: &str = "active_schema";

/// Prefix ogr2ogr expects in front of a PostgreSQL datasource.
pub const PG_PREFIX: &str = "PG:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgConnection {
    params: Vec<(String, String)>,
}

impl PgConnection {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a parameter, replacing it in place or appending it if absent.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key.to_string(), value)),
        }
    }

    /// Copy of this connection targeting another schema.
    pub fn with_active_schema(&self, schema: &str) -> Self {
        let mut conn = self.clone();
        conn.set(ACTIVE_SCHEMA, schema);
        conn
    }

    pub fn active_schema(&self) -> Option<&str> {
        self.get(ACTIVE_SCHEMA)
    }

    /// Datasource argument for ogr2ogr (`PG:<connection string>`).
    pub fn to_datasource(&self) -> String {
        format!("{}{}", PG_PREFIX, self)
    }
}

impl FromStr for PgConnection {
    type Err = GisError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix(PG_PREFIX).unwrap_or(s);
        let mut chars = s.chars().peekable();
        let mut params = Vec::new();

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_none() {
                break;
            }

            let mut key = String::new();
            while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
                key.push(c);
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.next() != Some('=') {
                return Err(GisError::Connection(format!(
                    "missing '=' after parameter '{}'",
                    key
                )));
            }
            if key.is_empty() {
                return Err(GisError::Connection("empty parameter name".into()));
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            let mut value = String::new();
            if chars.next_if_eq(&'\'').is_some() {
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some(escaped) => value.push(escaped),
                            None => break,
                        },
                        '\'' => {
                            closed = true;
                            break;
                        }
                        _ => value.push(c),
                    }
                }
                if !closed {
                    return Err(GisError::Connection(format!(
                        "unterminated quoted value for '{}'",
                        key
                    )));
                }
            } else {
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    value.push(c);
                }
            }

            params.push((key, value));
        }

        if params.is_empty() {
            return Err(GisError::Connection("connection string is empty".into()));
        }

        Ok(Self { params })
    }
}

impl fmt::Display for PgConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let needs_quotes = value.is_empty()
                || value
                    .chars()
                    .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
            if needs_quotes {
                let escaped = value.replace('\\', r"\\").replace('\'', r"\'");
                write!(f, "{}='{}'", key, escaped)?;
            } else {
                write!(f, "{}={}", key, value)?;
            }
        }
        Ok(())
    }
}
