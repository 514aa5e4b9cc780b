//! Semantic version numbers, as described by [SemVer 2.0.0](https://semver.org/).

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use itertools::Itertools;
use once_cell::sync::Lazy;

/// A pre-release identifier.
///
/// Numeric identifiers have lower precedence than alphanumeric ones, and are compared
/// numerically. The variant order makes the derived [`Ord`] do exactly that.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    Numeric(u64),
    AlphaNumeric(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => n.fmt(f),
            Identifier::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,
    #[error("version is missing the {0} number")]
    MissingPart(&'static str),
    #[error("invalid {part} number `{value}`")]
    InvalidNumber { part: &'static str, value: String },
    #[error("{part} number `{value}` has a leading zero")]
    LeadingZero { part: &'static str, value: String },
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
}

/// A semantic version number like `1.4.0-beta.2+build.77`.
///
/// Versions are ordered by SemVer precedence. Build metadata does not participate in precedence,
/// so versions that only differ in their build metadata compare (and hash) as equal.
///
/// ```
/// use trellis::semver::Version;
///
/// let v: Version = "v1.0.0-rc.1".parse().unwrap();
/// assert!(v.is_prerelease());
/// assert!(v < Version::new(1, 0, 0));
/// assert!(v > "1.0.0-beta.11".parse::<Version>().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Vec<Identifier>,
    pub build: Vec<String>,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Parses a version string. A leading `v` is accepted and ignored.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let s = s.strip_prefix('v').unwrap_or(s);
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (s, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let mut parts = core.splitn(3, '.');
        let mut number = |part| parse_number(parts.next().unwrap_or(""), part);
        let (major, minor, patch) = (number("major")?, number("minor")?, number("patch")?);

        let pre = match pre {
            Some(pre) => pre.split('.').map(parse_pre).collect::<Result<_, _>>()?,
            None => Vec::new(),
        };
        let build = match build {
            Some(build) => build
                .split('.')
                .map(|id| check_identifier(id).map(str::to_string))
                .collect::<Result<_, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre,
            build,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Increments the major version, resetting everything after it.
    pub fn bump_major(&mut self) {
        *self = Self::new(self.major + 1, 0, 0);
    }

    /// Increments the minor version, resetting everything after it.
    pub fn bump_minor(&mut self) {
        *self = Self::new(self.major, self.minor + 1, 0);
    }

    /// Increments the patch version and removes pre-release and build identifiers.
    pub fn bump_patch(&mut self) {
        *self = Self::new(self.major, self.minor, self.patch + 1);
    }

    /// Returns whether `self` and `other` are compatible according to Cargo's caret rules.
    ///
    /// Versions `1.0.0` and above are compatible when their major version matches. Below that,
    /// the first non-zero component has to match, and `0.0.z` versions are only compatible with
    /// themselves. Pre-release and build identifiers are ignored.
    pub fn is_compatible_with(&self, other: &Version) -> bool {
        match (self.major, self.minor) {
            (0, 0) => {
                (self.major, self.minor, self.patch) == (other.major, other.minor, other.patch)
            }
            (0, minor) => other.major == 0 && other.minor == minor,
            (major, _) => other.major == major,
        }
    }

    fn precedence(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

/// Returns the version of the `trellis` crate.
pub fn crate_version() -> &'static Version {
    static VERSION: Lazy<Version> = Lazy::new(|| {
        Version::parse(env!("CARGO_PKG_VERSION")).expect("Cargo package versions are valid SemVer")
    });
    &VERSION
}

fn parse_number(s: &str, part: &'static str) -> Result<u64, VersionError> {
    if s.is_empty() {
        return Err(VersionError::MissingPart(part));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::InvalidNumber {
            part,
            value: s.to_string(),
        });
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(VersionError::LeadingZero {
            part,
            value: s.to_string(),
        });
    }
    s.parse().map_err(|_| VersionError::InvalidNumber {
        part,
        value: s.to_string(),
    })
}

fn check_identifier(id: &str) -> Result<&str, VersionError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Err(VersionError::InvalidIdentifier(id.to_string()));
    }
    Ok(id)
}

fn parse_pre(id: &str) -> Result<Identifier, VersionError> {
    let id = check_identifier(id)?;
    if id.bytes().all(|b| b.is_ascii_digit()) {
        parse_number(id, "pre-release").map(Identifier::Numeric)
    } else {
        Ok(Identifier::AlphaNumeric(id.to_string()))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.precedence(other) == Ordering::Equal
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
        self.precedence(other)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.major, self.minor, self.patch, &self.pre).hash(state);
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre.iter().format("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.iter().format("."))?;
        }
        Ok(())
    }
}
