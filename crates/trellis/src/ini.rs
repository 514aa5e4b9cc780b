//! Reading and writing INI files.
//!
//! The accepted format is line based:
//!
//! ```ini
//! ; comments start with `;` or `#`
//! name = global value
//!
//! [window]
//! width = 1280
//! title = "  padded title  " ; quotes keep surrounding whitespace
//! ```
//!
//! Keys that appear before the first section header belong to the global section, whose name is
//! the empty string. Sections and keys are stored in sorted order, so writing an [`Ini`] always
//! produces the same output for the same content.
//!
//! Unquoted values end at the first `;` or `#`, which starts an inline comment. Quoted values
//! extend to the last `"` on the line.

use std::{
    collections::BTreeMap,
    fmt,
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

/// The name of the section that holds keys appearing before any section header.
pub const GLOBAL: &str = "";

/// Key-value pairs of a single section.
pub type Section = BTreeMap<String, String>;

pub type Result<T, E = IniError> = std::result::Result<T, E>;

/// Errors that can occur while loading an INI file or accessing its values.
#[derive(Debug, thiserror::Error)]
pub enum IniError {
    #[error("line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    #[error("invalid value `{value}` for key `{key}` in section `{section}`: {reason}")]
    Value {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("{what} `{name}` can't be written to an INI file: {reason}")]
    InvalidName {
        what: &'static str,
        name: String,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Describes why a line of an INI file could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("section header is missing a closing `]`")]
    UnterminatedHeader,
    #[error("section name is empty")]
    EmptySectionName,
    #[error("key is empty")]
    EmptyKey,
    #[error("quoted value is missing a closing `\"`")]
    UnterminatedQuote,
    #[error("unexpected text `{0}`")]
    TrailingText(String),
    #[error("expected `[section]` or `key = value`, got `{0}`")]
    Syntax(String),
}

/// An in-memory INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ini {
    sections: BTreeMap<String, Section>,
}

impl Ini {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from a string.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut ini = Self::new();
        let mut current = GLOBAL.to_string();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let err = |kind| IniError::Parse { line, kind };

            match parse_line(raw).map_err(err)? {
                Line::Blank => {}
                Line::Header(name) => {
                    current = name.to_string();
                    ini.sections.entry(current.clone()).or_default();
                }
                Line::Entry(key, value) => {
                    let section = ini.sections.entry(current.clone()).or_default();
                    if let Some(old) = section.insert(key.to_string(), value.to_string()) {
                        log::warn!(
                            "line {line}: duplicate key `{key}` in section `{current}` \
                             (`{old}` is replaced with `{value}`)"
                        );
                    }
                }
            }
        }

        Ok(ini)
    }

    /// Reads and parses a document from `reader`.
    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Loads a document from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading INI file from '{}'", path.display());
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Writes the document to `writer`.
    ///
    /// The output parses back into an equal [`Ini`]. Names or values inserted through
    /// [`Ini::section_mut`] that the format can't represent result in
    /// [`IniError::InvalidName`], and nothing is written.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        for (name, section) in &self.sections {
            check_section_name(name)?;
            for (key, value) in section {
                check_key(key)?;
                check_value(key, value)?;
            }
        }
        write!(writer, "{self}")?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the document to a file, replacing its contents.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        log::debug!("saving INI file to '{}'", path.display());
        self.write(BufWriter::new(File::create(path)?))
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Returns an iterator over all sections and their names, in sorted order.
    ///
    /// The global section comes first, if it exists.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, sec)| (name.as_str(), sec))
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    /// Returns the value of `key`, or `default` if it doesn't exist.
    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(default)
    }

    /// Parses the value of `key` as a `T`.
    ///
    /// Returns `Ok(None)` if the key doesn't exist, and [`IniError::Value`] if it exists but
    /// can't be parsed.
    pub fn get_parsed<T>(&self, section: &str, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(section, key)
            .map(|value| {
                value
                    .parse()
                    .map_err(|e: T::Err| value_error(section, key, value, e.to_string()))
            })
            .transpose()
    }

    /// Interprets the value of `key` as a boolean.
    ///
    /// `true`, `yes`, `on` and `1` are accepted as `true`; `false`, `no`, `off` and `0` as
    /// `false`, ignoring ASCII case.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.get(section, key) else {
            return Ok(None);
        };

        const TRUE: &[&str] = &["true", "yes", "on", "1"];
        const FALSE: &[&str] = &["false", "no", "off", "0"];
        if TRUE.iter().any(|t| value.eq_ignore_ascii_case(t)) {
            Ok(Some(true))
        } else if FALSE.iter().any(|f| value.eq_ignore_ascii_case(f)) {
            Ok(Some(false))
        } else {
            Err(value_error(section, key, value, "expected a boolean".into()))
        }
    }

    /// Sets `key` in `section` to `value`, creating the section if necessary.
    ///
    /// Returns the previous value, or [`IniError::InvalidName`] if `section`, `key` or `value`
    /// couldn't be written and read back. Keys must be non-empty and must not contain `=`, start
    /// with `[`, `;` or `#`, or have surrounding whitespace. Section names must not contain `]`.
    /// Nothing may contain line breaks.
    pub fn set<V: Into<String>>(
        &mut self,
        section: &str,
        key: &str,
        value: V,
    ) -> Result<Option<String>> {
        let value = value.into();
        check_section_name(section)?;
        check_key(key)?;
        check_value(key, &value)?;
        Ok(self
            .sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value))
    }

    /// Removes `key` from `section`, returning its value.
    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        let sec = self.sections.get_mut(section)?;
        let value = sec.remove(key);
        // An empty global section has no textual representation.
        if section == GLOBAL && sec.is_empty() {
            self.sections.remove(GLOBAL);
        }
        value
    }

    pub fn remove_section(&mut self, section: &str) -> Option<Section> {
        self.sections.remove(section)
    }
}

impl FromStr for Ini {
    type Err = IniError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Ini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, section) in &self.sections {
            if name.is_empty() && section.is_empty() {
                continue;
            }
            if !first {
                f.write_str("\n")?;
            }
            first = false;

            if !name.is_empty() {
                writeln!(f, "[{name}]")?;
            }
            for (key, value) in section {
                if needs_quotes(value) {
                    writeln!(f, "{key} = \"{value}\"")?;
                } else {
                    writeln!(f, "{key} = {value}")?;
                }
            }
        }
        Ok(())
    }
}

fn value_error(section: &str, key: &str, value: &str, reason: String) -> IniError {
    IniError::Value {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

fn invalid_name(what: &'static str, name: &str, reason: &'static str) -> IniError {
    IniError::InvalidName {
        what,
        name: name.to_string(),
        reason,
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

fn check_section_name(name: &str) -> Result<()> {
    let err = |reason| Err(invalid_name("section name", name, reason));
    if name == GLOBAL {
        Ok(())
    } else if name.trim() != name {
        err("surrounding whitespace is trimmed when reading")
    } else if name.contains(']') {
        err("`]` ends the section header")
    } else if has_line_break(name) {
        err("contains a line break")
    } else {
        Ok(())
    }
}

fn check_key(key: &str) -> Result<()> {
    let err = |reason| Err(invalid_name("key", key, reason));
    if key.is_empty() {
        err("key is empty")
    } else if key.trim() != key {
        err("surrounding whitespace is trimmed when reading")
    } else if is_comment(key) {
        err("would be read as a comment")
    } else if key.starts_with('[') {
        err("would be read as a section header")
    } else if key.contains('=') {
        err("`=` separates the key from its value")
    } else if has_line_break(key) {
        err("contains a line break")
    } else {
        Ok(())
    }
}

fn check_value(key: &str, value: &str) -> Result<()> {
    if has_line_break(value) {
        Err(invalid_name("value of key", key, "contains a line break"))
    } else {
        Ok(())
    }
}

fn needs_quotes(value: &str) -> bool {
    value.trim() != value || value.starts_with('"') || value.contains([';', '#'])
}

enum Line<'a> {
    Blank,
    Header(&'a str),
    Entry(&'a str, &'a str),
}

fn is_comment(s: &str) -> bool {
    s.starts_with([';', '#'])
}

fn parse_line(raw: &str) -> Result<Line<'_>, ParseErrorKind> {
    let line = raw.trim();
    if line.is_empty() || is_comment(line) {
        return Ok(Line::Blank);
    }

    if let Some(rest) = line.strip_prefix('[') {
        let Some(end) = rest.find(']') else {
            return Err(ParseErrorKind::UnterminatedHeader);
        };
        let name = rest[..end].trim();
        if name.is_empty() {
            return Err(ParseErrorKind::EmptySectionName);
        }
        let after = rest[end + 1..].trim();
        if !after.is_empty() && !is_comment(after) {
            return Err(ParseErrorKind::TrailingText(after.to_string()));
        }
        return Ok(Line::Header(name));
    }

    let Some((key, value)) = line.split_once('=') else {
        return Err(ParseErrorKind::Syntax(line.to_string()));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseErrorKind::EmptyKey);
    }

    Ok(Line::Entry(key, parse_value(value.trim())?))
}

fn parse_value(value: &str) -> Result<&str, ParseErrorKind> {
    match value.strip_prefix('"') {
        Some(quoted) => {
            let Some(end) = quoted.rfind('"') else {
                return Err(ParseErrorKind::UnterminatedQuote);
            };
            let after = quoted[end + 1..].trim();
            if !after.is_empty() && !is_comment(after) {
                return Err(ParseErrorKind::TrailingText(after.to_string()));
            }
            Ok(&quoted[..end])
        }
        None => {
            let end = value.find([';', '#']).unwrap_or(value.len());
            Ok(value[..end].trim_end())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(s: &str) -> (usize, ParseErrorKind) {
        match Ini::parse(s) {
            Err(IniError::Parse { line, kind }) => (line, kind),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn parse() {
        let ini = Ini::parse(
            "
            top = level
            ; comment
            # another comment

            [ server ]
            host=localhost
            port = 8080 ; inline comment
            motd = \"  hello; world  \"
            empty =

            [client] # trailing comment
            retries = 3
            ",
        )
        .unwrap();

        assert_eq!(ini.get(GLOBAL, "top"), Some("level"));
        assert_eq!(ini.get("server", "host"), Some("localhost"));
        assert_eq!(ini.get("server", "port"), Some("8080"));
        assert_eq!(ini.get("server", "motd"), Some("  hello; world  "));
        assert_eq!(ini.get("server", "empty"), Some(""));
        assert_eq!(ini.get("client", "retries"), Some("3"));
        assert_eq!(ini.get("client", "host"), None);
        assert_eq!(ini.get("nope", "host"), None);

        let names = ini.sections().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, ["", "client", "server"]);
    }

    #[test]
    fn duplicates() {
        let ini = Ini::parse("[a]\nx = 1\n[b]\ny = 2\n[a]\nx = 3\nz = 4").unwrap();
        assert_eq!(ini.get("a", "x"), Some("3"));
        assert_eq!(ini.get("a", "z"), Some("4"));
        assert_eq!(ini.section("a").unwrap().len(), 2);
    }

    #[test]
    fn errors() {
        assert_eq!(parse_err("[a"), (1, ParseErrorKind::UnterminatedHeader));
        assert_eq!(parse_err("\n[  ]"), (2, ParseErrorKind::EmptySectionName));
        assert_eq!(
            parse_err("[a] b"),
            (1, ParseErrorKind::TrailingText("b".into()))
        );
        assert_eq!(parse_err("a = 1\n = 2"), (2, ParseErrorKind::EmptyKey));
        assert_eq!(parse_err("k = \"open"), (1, ParseErrorKind::UnterminatedQuote));
        assert_eq!(
            parse_err("k = \"v\" x"),
            (1, ParseErrorKind::TrailingText("x".into()))
        );
        assert_eq!(
            parse_err("[a]\n\njust text"),
            (3, ParseErrorKind::Syntax("just text".into()))
        );

        let msg = Ini::parse("x\n").unwrap_err().to_string();
        assert_eq!(msg, "line 1: expected `[section]` or `key = value`, got `x`");
    }

    #[test]
    fn typed_access() {
        let ini =
            Ini::parse("n = 42\nf = 1.5\nbad = forty\nyes = YES\noff = off\nb = maybe").unwrap();
        assert_eq!(ini.get_parsed::<u32>(GLOBAL, "n").unwrap(), Some(42));
        assert_eq!(ini.get_parsed::<f64>(GLOBAL, "f").unwrap(), Some(1.5));
        assert_eq!(ini.get_parsed::<u32>(GLOBAL, "missing").unwrap(), None);
        match ini.get_parsed::<u32>(GLOBAL, "bad") {
            Err(IniError::Value { key, value, .. }) => {
                assert_eq!(key, "bad");
                assert_eq!(value, "forty");
            }
            other => panic!("unexpected result {other:?}"),
        }

        assert_eq!(ini.get_bool(GLOBAL, "yes").unwrap(), Some(true));
        assert_eq!(ini.get_bool(GLOBAL, "off").unwrap(), Some(false));
        assert!(ini
            .get_bool(GLOBAL, "n")
            .unwrap_err()
            .to_string()
            .contains("boolean"));
        assert!(ini.get_bool(GLOBAL, "b").is_err());
        assert_eq!(ini.get_bool(GLOBAL, "missing").unwrap(), None);

        assert_eq!(ini.get_or(GLOBAL, "n", "0"), "42");
        assert_eq!(ini.get_or(GLOBAL, "missing", "0"), "0");
    }

    #[test]
    fn modify() {
        let mut ini = Ini::new();
        assert_eq!(ini.set("a", "k", "v").unwrap(), None);
        assert_eq!(
            ini.set("a", "k", String::from("w")).unwrap(),
            Some("v".to_string())
        );
        assert!(ini.contains("a", "k"));

        ini.section_mut("a").unwrap().insert("j".into(), "x".into());
        assert_eq!(ini.get("a", "j"), Some("x"));
        assert!(ini.section_mut("b").is_none());

        assert_eq!(ini.remove("a", "k"), Some("w".to_string()));
        assert_eq!(ini.remove("a", "k"), None);
        assert!(!ini.contains("a", "k"));

        ini.set(GLOBAL, "g", "1").unwrap();
        ini.remove(GLOBAL, "g");
        assert!(ini.section(GLOBAL).is_none());

        assert!(ini.remove_section("a").is_some());
        assert_eq!(ini, Ini::new());
    }

    #[test]
    fn write() {
        let mut ini = Ini::new();
        ini.set("b", "plain", "value").unwrap();
        ini.set("b", "padded", " x ").unwrap();
        ini.set("b", "comment", "a;b").unwrap();
        ini.set("b", "quoted", "\"q\"").unwrap();
        ini.set(GLOBAL, "name", "trellis").unwrap();
        ini.set("a", "empty", "").unwrap();
        ini.section_mut("a").unwrap().clear();

        let text = ini.to_string();
        assert_eq!(
            text,
            "name = trellis\n\
             \n\
             [a]\n\
             \n\
             [b]\n\
             comment = \"a;b\"\n\
             padded = \" x \"\n\
             plain = value\n\
             quoted = \"\"q\"\"\n"
        );
        assert_eq!(text.parse::<Ini>().unwrap(), ini);

        let mut buf = Vec::new();
        ini.write(&mut buf).unwrap();
        assert_eq!(Ini::read(&buf[..]).unwrap(), ini);
    }

    #[test]
    fn unwritable_names() {
        let mut ini = Ini::new();
        for key in ["#color", ";color", "[x]", " padded", "a=b", "", "two\nlines"] {
            assert!(
                matches!(
                    ini.set("s", key, "v"),
                    Err(IniError::InvalidName { what: "key", .. })
                ),
                "{key:?}"
            );
        }
        for section in ["a]b", " s", "two\nlines"] {
            assert!(ini.set(section, "k", "v").is_err(), "{section:?}");
        }
        assert!(ini.set("s", "k", "line\nbreak").is_err());
        assert_eq!(ini, Ini::new());

        // Keys that only look unusual are fine.
        ini.set("[s", "a#b", "x").unwrap();
        ini.set("s", "k[0]", "#1").unwrap();
        assert_eq!(ini.to_string().parse::<Ini>().unwrap(), ini);

        ini.section_mut("s")
            .unwrap()
            .insert("#hidden".into(), "red".into());
        let mut buf = Vec::new();
        let err = ini.write(&mut buf).unwrap_err();
        assert_eq!(
            err.to_string(),
            "key `#hidden` can't be written to an INI file: would be read as a comment"
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn empty() {
        assert_eq!(Ini::parse("").unwrap(), Ini::new());
        assert_eq!(Ini::parse("\u{feff}; only a comment\n").unwrap(), Ini::new());
        assert_eq!(Ini::new().to_string(), "");
    }
}
