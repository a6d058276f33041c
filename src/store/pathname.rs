//! Six-part container pathnames: `/A/B/C/D/E/F/`.
//!
//! A = location, B = site id, C = parameter, D = date block, E = interval,
//! F = version/source. Parts may contain spaces and commas but not `/`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CurveError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pathname {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub e: String,
    pub f: String,
}

impl Pathname {
    /// Same record with a blank date part, as used for catalog listings.
    pub fn without_date_part(&self) -> Self {
        Self {
            d: String::new(),
            ..self.clone()
        }
    }

    /// Same record with a different parameter (C part), e.g. `ELEVATION` -> `RES FLOW-OUT`.
    pub fn with_parameter(&self, c: impl Into<String>) -> Self {
        Self {
            c: c.into(),
            ..self.clone()
        }
    }

    /// Same record with a different interval (E part).
    pub fn with_interval(&self, e: impl Into<String>) -> Self {
        Self {
            e: e.into(),
            ..self.clone()
        }
    }
}

impl FromStr for Pathname {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| CurveError::InvalidPathname {
            pathname: s.to_string(),
            reason,
        };

        let inner = s
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
            .ok_or_else(|| invalid("must start and end with '/'"))?;

        let parts: Vec<&str> = inner.split('/').collect();
        let [a, b, c, d, e, f] = parts.as_slice() else {
            return Err(invalid("expected six parts /A/B/C/D/E/F/"));
        };

        Ok(Self {
            a: a.to_string(),
            b: b.to_string(),
            c: c.to_string(),
            d: d.to_string(),
            e: e.to_string(),
            f: f.to_string(),
        })
    }
}

impl fmt::Display for Pathname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}/{}/{}/{}/{}/{}/",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

/// Collapse a raw pathname listing to unique records with blank D parts.
///
/// Output is sorted so catalog listings are stable between runs.
pub fn catalog<'a, I>(paths: I) -> Result<Vec<Pathname>, CurveError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut unique = BTreeSet::new();
    for raw in paths {
        unique.insert(raw.parse::<Pathname>()?.without_date_part());
    }
    Ok(unique.into_iter().collect())
}
