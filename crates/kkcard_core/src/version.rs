use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Dotted-integer version such as `1.0.4.1`.
///
/// Comparison is component-wise with the shorter list zero-padded, so
/// `1.0` == `1.0.0` and `1.0.4` < `1.0.4.1`. The original text is kept so
/// that re-encoding reproduces it exactly.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u32>,
    text: String,
}

impl Version {
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn at_least(&self, other: StaticVersion) -> bool {
        compare_parts(&self.parts, other.0) != Ordering::Less
    }

    pub fn below(&self, other: StaticVersion) -> bool {
        !self.at_least(other)
    }
}

/// A compile-time version threshold.
#[derive(Debug, Clone, Copy)]
pub struct StaticVersion(pub &'static [u32]);

fn compare_parts(a: &[u32], b: &[u32]) -> Ordering {
    let len = a.len().max(b.len());
    for index in 0..len {
        let x = a.get(index).copied().unwrap_or(0);
        let y = b.get(index).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        compare_parts(&self.parts, &other.parts) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_parts(&self.parts, &other.parts)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::UnsupportedVersion {
                context: "version string".to_string(),
                version: s.to_string(),
            })?;
        Ok(Self {
            parts,
            text: s.to_string(),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn zero_pads_shorter_versions() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert!(v("1.0.4") < v("1.0.4.1"));
        assert!(v("0.0.10") > v("0.0.9"));
        assert!(v("1.1.0").at_least(StaticVersion(&[1, 0, 4, 1])));
        assert!(v("0.0.1").below(StaticVersion(&[0, 0, 2])));
    }

    #[test]
    fn keeps_original_text() {
        assert_eq!(v("1.01").to_string(), "1.01");
        assert_eq!(v("1.01"), v("1.1"));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!("1.a.0".parse::<Version>().is_err());
    }
}
