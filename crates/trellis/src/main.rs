//! Command-line tool for inspecting and editing INI files.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use anyhow::{bail, Context};
use trellis::{
    flags::{FlagError, FlagParser, Flags},
    ini::{self, Ini},
    profile::{self, Timer},
    semver,
};

fn parser() -> FlagParser {
    FlagParser::new("trellis")
        .about("Reads an INI file, prints or modifies values, and writes the result.")
        .option("section", Some('s'), "S", "Section to operate on")
        .option("get", Some('g'), "KEY", "Print the value of KEY and exit")
        .option("set", None, "KEY=VALUE", "Set KEY to VALUE (may be repeated)")
        .option("output", Some('o'), "PATH", "Where to write the result")
        .default("output", "-")
        .switch("verbose", Some('v'), "Log timings and other details")
        .switch("version", Some('V'), "Print version information and exit")
        .positional("FILE", "INI file to read, or `-` for stdin")
}

fn main() -> anyhow::Result<()> {
    trellis::init_logger!();

    let flags = match parser().parse_env() {
        Ok(flags) => flags,
        Err(FlagError::HelpRequested(usage)) => {
            print!("{usage}");
            return Ok(());
        }
        Err(e) => return Err(e).context("invalid command line (use `--help` for usage)"),
    };

    if flags.is_set("version") {
        println!("trellis {}", semver::crate_version());
        return Ok(());
    }
    if flags.is_set("verbose") {
        profile::set_enabled(true);
    }

    run(&flags)
}

fn run(flags: &Flags) -> anyhow::Result<()> {
    let t_load = Timer::new("load");
    let t_write = Timer::new("write");

    let path = match flags.positionals() {
        [path] => path.as_str(),
        [] => bail!("missing input file (use `--help` for usage)"),
        [_, extra, ..] => bail!("unexpected argument `{extra}`"),
    };
    let doc = t_load.time(|| match path {
        "-" => Ini::read(io::stdin().lock()),
        path => Ini::load(path),
    });
    let mut doc = doc.with_context(|| format!("failed to read INI file '{path}'"))?;
    log::debug!("{path}: {} sections", doc.sections().count());

    let section = flags.value("section").unwrap_or(ini::GLOBAL);

    if let Some(key) = flags.value("get") {
        match doc.get(section, key) {
            Some(value) => println!("{value}"),
            None => bail!("key `{key}` not found in section `{section}`"),
        }
        return Ok(());
    }

    let assignments = flags.values("set");
    if assignments.is_empty() && flags.is_set("section") {
        let Some(entries) = doc.section(section) else {
            bail!("section `{section}` not found");
        };
        for (key, value) in entries {
            println!("{key} = {value}");
        }
        return Ok(());
    }

    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        let old = doc
            .set(section, key, value)
            .with_context(|| format!("cannot set `{key}` in section `{section}`"))?;
        if let Some(old) = old {
            log::debug!("[{section}] {key}: `{old}` -> `{value}`");
        }
    }

    t_write.time(|| write_output(&doc, flags.value("output").unwrap_or("-")))?;

    if profile::is_enabled() {
        log::debug!("{t_load}, {t_write}");
    }
    Ok(())
}

fn parse_assignment(s: &str) -> anyhow::Result<(&str, &str)> {
    let Some((key, value)) = s.split_once('=') else {
        bail!("invalid assignment `{s}`, expected KEY=VALUE");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("invalid assignment `{s}`, key is empty");
    }
    Ok((key, value.trim()))
}

fn write_output(doc: &Ini, path: &str) -> anyhow::Result<()> {
    if path == "-" {
        doc.write(io::stdout().lock())?;
    } else {
        let mut file = BufWriter::new(
            File::create(path).with_context(|| format!("failed to create '{path}'"))?,
        );
        doc.write(&mut file)
            .with_context(|| format!("failed to write '{path}'"))?;
        file.flush()?;
    }
    Ok(())
}
