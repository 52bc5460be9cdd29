//! Command-line interface for jsdoc
//!
//! Usage:
//!   jsdoc parse `<path|->` [--format json|yaml|debug] [--strict] [--config `<file>`] [--set key=value]
//!   jsdoc type `<literal>`                 - Print the AST and normalized form of a type
//!   jsdoc tag `<line>` [--strict]          - Print one parsed tag
mod logger;

use clap::{Arg, ArgAction, ArgMatches, Command};
use jsdoc::{CommentParser, Loader, ParserConfig};
use std::io::Read;
use std::process;

fn main() {
    let matches = Command::new("jsdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse JSDoc and Closure Compiler documentation comments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored log output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse every doc comment in a source file")
                .arg(
                    Arg::new("path")
                        .help("Source file to read, or - for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["json", "yaml", "debug"])
                        .default_value("json"),
                )
                .arg(strict_arg())
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("TOML file layered over the built-in defaults"),
                )
                .arg(
                    Arg::new("set")
                        .long("set")
                        .help("Override one setting, e.g. --set types.max_depth=16")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("type")
                .about("Parse a type literal")
                .arg(
                    Arg::new("literal")
                        .help("Type literal without the surrounding braces")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("tag")
                .about("Parse a single tag line")
                .arg(
                    Arg::new("line")
                        .help("Tag line, e.g. '@param {string} name Who to greet'")
                        .required(true)
                        .index(1),
                )
                .arg(strict_arg()),
        )
        .get_matches();

    logger::init_logger(
        matches.get_flag("verbose"),
        matches.get_flag("quiet"),
        matches.get_flag("no-color"),
    );

    match matches.subcommand() {
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches),
        Some(("type", type_matches)) => {
            let literal = required(type_matches, "literal");
            handle_type_command(literal);
        }
        Some(("tag", tag_matches)) => {
            let line = required(tag_matches, "line");
            handle_tag_command(line, tag_matches.get_flag("strict"));
        }
        _ => unreachable!(),
    }
}

fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .help("Fail on malformed tags instead of dropping them")
        .action(ArgAction::SetTrue)
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("missing argument `{}`", id)))
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches) {
    let path = required(matches, "path");
    let format = required(matches, "format");

    let config = load_config(matches).unwrap_or_else(|e| fail(e));
    let source = read_source(path).unwrap_or_else(|e| fail(format!("reading {}: {}", path, e)));

    let parser = CommentParser::new(config);
    let batch = parser.parse(&source).unwrap_or_else(|e| fail(e));

    let output = match format {
        "yaml" => serde_yaml::to_string(&batch.comments).unwrap_or_else(|e| fail(e)),
        "debug" => format!("{:#?}\n", batch.comments),
        _ => {
            let json = serde_json::to_string_pretty(&batch.comments).unwrap_or_else(|e| fail(e));
            json + "\n"
        }
    };
    print!("{}", output);

    if !batch.failures.is_empty() {
        for failure in &batch.failures {
            eprintln!("error: line {}: {}", failure.raw.start_line, failure.error);
        }
        process::exit(1);
    }
}

fn load_config(matches: &ArgMatches) -> Result<ParserConfig, config::ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for assignment in matches.get_many::<String>("set").into_iter().flatten() {
        let Some((key, value)) = assignment.split_once('=') else {
            return Err(config::ConfigError::Message(format!(
                "expected key=value, got `{}`",
                assignment
            )));
        };
        let key = key.trim();
        let value = value.trim();
        loader = if let Ok(flag) = value.parse::<bool>() {
            loader.set_override(key, flag)?
        } else if let Ok(number) = value.parse::<i64>() {
            loader.set_override(key, number)?
        } else {
            loader.set_override(key, value)?
        };
    }
    if matches.get_flag("strict") {
        loader = loader.set_override("strict", true)?;
    }
    loader.build()
}

fn read_source(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Handle the type command
fn handle_type_command(literal: &str) {
    let parser = CommentParser::default();
    let ty = parser.parse_type(literal).unwrap_or_else(|e| fail(e));
    let json = serde_json::to_string_pretty(&ty).unwrap_or_else(|e| fail(e));
    println!("{}", json);
    println!("normalized: {}", ty);
}

/// Handle the tag command
fn handle_tag_command(line: &str, strict: bool) {
    let parser = CommentParser::builder().strict(strict).build();
    match parser.parse_tag(line) {
        Ok(Some(tag)) => {
            let json = serde_json::to_string_pretty(&tag).unwrap_or_else(|e| fail(e));
            println!("{}", json);
        }
        Ok(None) => fail("tag was dropped; rerun with --strict to see why"),
        Err(e) => fail(e),
    }
}
