//! Command-line flag parsing.
//!
//! ```
//! use trellis::flags::FlagParser;
//!
//! let parser = FlagParser::new("app")
//!     .switch("verbose", Some('v'), "Log more")
//!     .option("output", Some('o'), "PATH", "Where to write the result")
//!     .default("output", "-")
//!     .positional("INPUT", "File to read");
//!
//! let flags = parser.parse(["-v", "in.txt"]).unwrap();
//! assert!(flags.is_set("verbose"));
//! assert_eq!(flags.value("output"), Some("-"));
//! assert_eq!(flags.positionals(), ["in.txt"]);
//! ```
//!
//! Supported syntax:
//!
//! - `--long`, `--long=value`, `--long value`
//! - `-s`, `-s value`, `-svalue`, and groups of switches like `-abc`
//! - `--` makes all following arguments positional
//! - `-` on its own is a positional argument
//!
//! `-h` and `--help` make parsing fail with [`FlagError::HelpRequested`], which carries the usage
//! text.

use std::{collections::HashMap, env, fmt::Write, str::FromStr};

pub type Result<T, E = FlagError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    #[error("unknown flag `{0}`")]
    UnknownFlag(String),
    #[error("flag `{0}` requires a value")]
    MissingValue(String),
    #[error("flag `{flag}` does not take a value (got `{value}`)")]
    UnexpectedValue { flag: String, value: String },
    #[error("invalid value `{value}` for flag `--{flag}`: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },
    /// `-h` or `--help` was passed. Contains the usage text.
    #[error("{0}")]
    HelpRequested(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Switch,
    Option,
}

#[derive(Debug, Clone)]
struct FlagSpec {
    long: String,
    short: Option<char>,
    value_name: String,
    help: String,
    kind: Kind,
    default: Option<String>,
}

/// Describes the accepted flags of a program and parses arguments.
#[derive(Debug, Clone)]
pub struct FlagParser {
    program: String,
    about: Option<String>,
    flags: Vec<FlagSpec>,
    positionals: Vec<(String, String)>,
}

impl FlagParser {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            about: None,
            flags: Vec::new(),
            positionals: Vec::new(),
        }
    }

    /// Sets a description that is printed as part of the usage text.
    pub fn about(mut self, text: &str) -> Self {
        self.about = Some(text.to_string());
        self
    }

    /// Adds a boolean flag that takes no value.
    pub fn switch(self, long: &str, short: Option<char>, help: &str) -> Self {
        self.add(long, short, "", help, Kind::Switch)
    }

    /// Adds a flag that takes a value.
    pub fn option(self, long: &str, short: Option<char>, value_name: &str, help: &str) -> Self {
        self.add(long, short, value_name, help, Kind::Option)
    }

    /// Sets the value [`Flags::value`] returns when the option `long` isn't passed.
    ///
    /// # Panics
    ///
    /// Panics if `long` doesn't name a flag added with [`FlagParser::option`].
    #[track_caller]
    pub fn default(mut self, long: &str, value: &str) -> Self {
        match self.flags.iter_mut().find(|f| f.long == long) {
            Some(flag) if flag.kind == Kind::Option => flag.default = Some(value.to_string()),
            _ => panic!("`--{long}` is not an option that takes a value"),
        }
        self
    }

    /// Documents a positional argument.
    ///
    /// Positional arguments are only used for the usage text. Any number of them is accepted by
    /// [`FlagParser::parse`].
    pub fn positional(mut self, name: &str, help: &str) -> Self {
        self.positionals.push((name.to_string(), help.to_string()));
        self
    }

    #[track_caller]
    fn add(
        mut self,
        long: &str,
        short: Option<char>,
        value_name: &str,
        help: &str,
        kind: Kind,
    ) -> Self {
        assert!(
            !long.is_empty() && !long.starts_with('-') && !long.contains('='),
            "invalid flag name `{long}`"
        );
        assert!(self.find_long(long).is_none(), "flag `--{long}` was added twice");
        if let Some(c) = short {
            assert!(c != '-', "`-` can't be used as a short flag");
            assert!(self.find_short(c).is_none(), "flag `-{c}` was added twice");
        }

        self.flags.push(FlagSpec {
            long: long.to_string(),
            short,
            value_name: value_name.to_string(),
            help: help.to_string(),
            kind,
            default: None,
        });
        self
    }

    fn find_long(&self, long: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.long == long)
    }

    fn find_short(&self, short: char) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.short == Some(short))
    }

    /// Parses the arguments of the current process, skipping the program name.
    pub fn parse_env(&self) -> Result<Flags> {
        self.parse(env::args().skip(1))
    }

    /// Parses `args`, which must not include the program name.
    pub fn parse<I, S>(&self, args: I) -> Result<Flags>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut flags = Flags {
            defaults: self
                .flags
                .iter()
                .filter_map(|f| Some((f.long.clone(), f.default.clone()?)))
                .collect(),
            ..Flags::default()
        };

        let mut args = args.into_iter().map(Into::into);
        let mut flags_done = false;
        while let Some(arg) = args.next() {
            if flags_done || arg == "-" || !arg.starts_with('-') {
                flags.positionals.push(arg);
                continue;
            }
            if arg == "--" {
                flags_done = true;
                continue;
            }

            if let Some(long) = arg.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (long, None),
                };
                let display = format!("--{name}");
                let Some(spec) = self.find_long(name) else {
                    if name == "help" {
                        return Err(FlagError::HelpRequested(self.usage()));
                    }
                    return Err(FlagError::UnknownFlag(display));
                };

                match (spec.kind, inline) {
                    (Kind::Switch, None) => flags.set_switch(spec),
                    (Kind::Switch, Some(value)) => {
                        return Err(FlagError::UnexpectedValue {
                            flag: display,
                            value,
                        })
                    }
                    (Kind::Option, Some(value)) => flags.push_value(spec, value),
                    (Kind::Option, None) => {
                        let value = args.next().ok_or(FlagError::MissingValue(display))?;
                        flags.push_value(spec, value);
                    }
                }
                continue;
            }

            let cluster = &arg[1..];
            for (i, c) in cluster.char_indices() {
                let Some(spec) = self.find_short(c) else {
                    if c == 'h' {
                        return Err(FlagError::HelpRequested(self.usage()));
                    }
                    return Err(FlagError::UnknownFlag(format!("-{c}")));
                };

                match spec.kind {
                    Kind::Switch => flags.set_switch(spec),
                    Kind::Option => {
                        let rest = &cluster[i + c.len_utf8()..];
                        let value = if rest.is_empty() {
                            args.next()
                                .ok_or_else(|| FlagError::MissingValue(format!("-{c}")))?
                        } else {
                            rest.to_string()
                        };
                        flags.push_value(spec, value);
                        break;
                    }
                }
            }
        }

        Ok(flags)
    }

    /// Renders the usage text.
    pub fn usage(&self) -> String {
        let mut out = format!("Usage: {}", self.program);
        if !self.flags.is_empty() {
            out.push_str(" [OPTIONS]");
        }
        for (name, _) in &self.positionals {
            let _ = write!(out, " <{name}>");
        }
        out.push('\n');

        if let Some(about) = &self.about {
            let _ = write!(out, "\n{about}\n");
        }

        let mut rows = Vec::new();
        for (name, help) in &self.positionals {
            rows.push((true, format!("<{name}>"), help.clone()));
        }
        for flag in &self.flags {
            let mut left = match flag.short {
                Some(c) => format!("-{c}, --{}", flag.long),
                None => format!("    --{}", flag.long),
            };
            if flag.kind == Kind::Option {
                let _ = write!(left, " <{}>", flag.value_name);
            }
            let mut help = flag.help.clone();
            if let Some(default) = &flag.default {
                let _ = write!(help, " [default: {default}]");
            }
            rows.push((false, left, help));
        }
        if self.find_long("help").is_none() {
            let left = match self.find_short('h') {
                Some(_) => "    --help",
                None => "-h, --help",
            };
            rows.push((false, left.to_string(), "Print this help message".to_string()));
        }

        let width = rows
            .iter()
            .map(|(_, left, _)| left.chars().count())
            .max()
            .unwrap_or(0);
        let mut heading = None;
        for (positional, left, help) in rows {
            let title = if positional { "Arguments" } else { "Options" };
            if heading != Some(title) {
                let _ = write!(out, "\n{title}:\n");
                heading = Some(title);
            }
            let _ = writeln!(out, "  {left:width$}  {help}");
        }

        out
    }
}

/// The result of parsing arguments with a [`FlagParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    switches: HashMap<String, usize>,
    values: HashMap<String, Vec<String>>,
    defaults: HashMap<String, String>,
    positionals: Vec<String>,
}

impl Flags {
    fn set_switch(&mut self, spec: &FlagSpec) {
        *self.switches.entry(spec.long.clone()).or_default() += 1;
    }

    fn push_value(&mut self, spec: &FlagSpec, value: String) {
        self.values.entry(spec.long.clone()).or_default().push(value);
    }

    /// Returns whether the flag `long` was passed at least once.
    pub fn is_set(&self, long: &str) -> bool {
        self.switches.contains_key(long) || self.values.contains_key(long)
    }

    /// Returns how often the switch `long` was passed (eg. `-vvv` counts 3 times).
    pub fn count(&self, long: &str) -> usize {
        self.switches.get(long).copied().unwrap_or(0)
    }

    /// Returns the last value passed to `long`, or its default value.
    pub fn value(&self, long: &str) -> Option<&str> {
        self.values
            .get(long)
            .and_then(|v| v.last())
            .or_else(|| self.defaults.get(long))
            .map(String::as_str)
    }

    /// Returns every value passed to `long`, in order.
    pub fn values(&self, long: &str) -> &[String] {
        self.values.get(long).map_or(&[], Vec::as_slice)
    }

    /// Parses the value of `long` as a `T`.
    pub fn parse<T>(&self, long: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.value(long)
            .map(|value| {
                value.parse().map_err(|e: T::Err| FlagError::InvalidValue {
                    flag: long.to_string(),
                    value: value.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> FlagParser {
        FlagParser::new("tool")
            .about("Does things.")
            .switch("all", Some('a'), "Include everything")
            .switch("brief", Some('b'), "Print less")
            .switch("dry-run", None, "Don't write anything")
            .option("level", Some('l'), "N", "Compression level")
            .option("name", None, "NAME", "A name")
            .default("level", "3")
            .positional("FILE", "Input file")
    }

    #[test]
    fn long_flags() {
        let flags = parser()
            .parse(["--all", "--level=5", "--name", "x", "--name=y", "file"])
            .unwrap();
        assert!(flags.is_set("all"));
        assert!(!flags.is_set("brief"));
        assert_eq!(flags.value("level"), Some("5"));
        assert_eq!(flags.value("name"), Some("y"));
        assert_eq!(flags.values("name"), ["x", "y"]);
        assert_eq!(flags.positionals(), ["file"]);
    }

    #[test]
    fn short_flags() {
        let flags = parser().parse(["-ab", "-l9", "-", "-al", "7"]).unwrap();
        assert_eq!(flags.count("all"), 2);
        assert!(flags.is_set("brief"));
        assert_eq!(flags.values("level"), ["9", "7"]);
        assert_eq!(flags.parse::<u8>("level"), Ok(Some(7)));
        assert_eq!(flags.positionals(), ["-"]);

        let flags = parser().parse(["-l", "-a"]).unwrap();
        assert_eq!(flags.value("level"), Some("-a"));
        assert!(!flags.is_set("all"));
    }

    #[test]
    fn defaults_and_positionals() {
        let flags = parser().parse(["a", "--", "--all", "-b"]).unwrap();
        assert!(!flags.is_set("all"));
        assert!(!flags.is_set("level"));
        assert_eq!(flags.value("level"), Some("3"));
        assert!(flags.values("level").is_empty());
        assert_eq!(flags.value("name"), None);
        assert_eq!(flags.parse::<u32>("name"), Ok(None));
        assert_eq!(flags.positionals(), ["a", "--all", "-b"]);

        let flags = parser().parse(Vec::<String>::new()).unwrap();
        assert!(flags.positionals().is_empty());
    }

    #[test]
    fn errors() {
        let p = parser();
        assert_eq!(
            p.parse(["--bogus"]).unwrap_err(),
            FlagError::UnknownFlag("--bogus".into())
        );
        assert_eq!(
            p.parse(["-az"]).unwrap_err(),
            FlagError::UnknownFlag("-z".into())
        );
        assert_eq!(
            p.parse(["--level"]).unwrap_err(),
            FlagError::MissingValue("--level".into())
        );
        assert_eq!(
            p.parse(["-al"]).unwrap_err(),
            FlagError::MissingValue("-l".into())
        );
        assert_eq!(
            p.parse(["--dry-run=yes"]).unwrap_err(),
            FlagError::UnexpectedValue {
                flag: "--dry-run".into(),
                value: "yes".into()
            }
        );

        let flags = p.parse(["--level", "high"]).unwrap();
        let err = flags.parse::<u32>("level").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value `high` for flag `--level`: invalid digit found in string"
        );
    }

    #[test]
    fn help() {
        let p = parser();
        let usage = p.usage();
        assert_eq!(p.parse(["--help"]), Err(FlagError::HelpRequested(usage.clone())));
        assert_eq!(p.parse(["-bh"]), Err(FlagError::HelpRequested(usage.clone())));
        assert_eq!(
            usage,
            "\
Usage: tool [OPTIONS] <FILE>

Does things.

Arguments:
  <FILE>             Input file

Options:
  -a, --all          Include everything
  -b, --brief        Print less
      --dry-run      Don't write anything
  -l, --level <N>    Compression level [default: 3]
      --name <NAME>  A name
  -h, --help         Print this help message
"
        );
    }

    #[test]
    fn usage_aligns_non_ascii_names() {
        let usage = FlagParser::new("x")
            .switch("größe", None, "Size")
            .switch("a", None, "Short")
            .usage();
        let column = |help: &str| {
            let line = usage.lines().find(|line| line.ends_with(help)).unwrap();
            line[..line.len() - help.len()].chars().count()
        };
        assert_eq!(column("Size"), column("Short"));
        assert_eq!(column("Size"), column("Print this help message"));
    }

    #[test]
    #[should_panic(expected = "added twice")]
    fn duplicate_flag() {
        FlagParser::new("x")
            .switch("a", None, "")
            .option("a", None, "V", "");
    }

    #[test]
    #[should_panic(expected = "not an option")]
    fn default_for_switch() {
        FlagParser::new("x").switch("a", None, "").default("a", "1");
    }
}
