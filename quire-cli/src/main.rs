// Command-line interface for quire
//
// This binary is the front end of the quire-babel export core: it accepts a Markdown file, hands
// it to the dispatcher and writes the encoded result next to the other exports.
//
// Usage:
//  quire <input> --to <format> [--out-dir <dir>] [--name <base>]          - Export (default)
//  quire export <input> --to <format> [--out-dir <dir>] [--name <base>]   - Same as above (explicit)
//  quire preview <input>                 - Print the sanitized HTML
//  quire formats [--json]                - List export formats
//  quire generate-css [--print]          - Print the HTML export (or PDF print) stylesheet
//
// Extra Parameters:
//
// Configuration keys can be overridden per run with --extra-<key> <value>.
// Example:
//  quire notes.md --to pdf --extra-scale 1 --extra-chrome-bin /usr/bin/chromium

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use quire_babel::formats::pdf::{get_print_css, ChromeRasterizer, PdfFormat};
use quire_babel::markup;
use quire_babel::{
    export_filename, read_markdown_file, Delivery, EncodedOutput, ExportFormat, ExportOutcome,
    Exporter, FormatRegistry,
};
use quire_config::{Loader, QuireConfig, LOCAL_CONFIG_FILE};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["export", "preview", "formats", "generate-css", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Markdown file (.md, .markdown, .txt)")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("quire")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export Markdown to PDF, Word, HTML, plain text and RTF")
        .long_about(
            "quire converts a Markdown file into a document in another format.\n\n\
            Commands:\n  \
            - export:       Write the document in the requested format (default command)\n  \
            - preview:      Print the sanitized HTML the HTML and PDF exports are built from\n  \
            - formats:      List the available export formats\n  \
            - generate-css: Print the stylesheet embedded in HTML exports\n\n\
            Extra Parameters:\n  \
            Use --extra-<key> [value] to override a configuration key for one run.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            quire notes.md --to docx                    # Writes ./notes.docx\n  \
            quire notes.md --to pdf --out-dir build     # Writes build/notes.pdf\n  \
            quire notes.md --to html --name index       # Writes ./index.html\n  \
            quire notes.md --to txt --extra-out-dir tmp # Writes tmp/notes.txt",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a quire.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log progress to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .about("Export a Markdown file (default command)")
                .long_about(
                    "Export a Markdown file to another format.\n\n\
                    Formats (aliases in parentheses):\n  \
                    - pdf  (paginated-document): Portable Document Format\n  \
                    - docx (word-document):      Microsoft Word Document\n  \
                    - html (html-file):          Web Page Format\n  \
                    - txt  (plain-text):         Plain Text File\n  \
                    - rtf  (rich-text):          Rich Text Format\n\n\
                    The output file is named after the input (or --name) with its\n\
                    extension replaced by the format's extension.",
                )
                .arg(input_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .value_name("DIR")
                        .help("Directory to write into (defaults to export.out_dir)")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .value_name("BASE")
                        .help("Base filename (defaults to the input file name)")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Print the sanitized HTML for a Markdown file")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("formats")
                .about("List the available export formats")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the list as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("generate-css")
                .about("Output the CSS embedded in HTML exports")
                .long_about(
                    "Outputs the stylesheet embedded into exported HTML files.\n\n\
                    With --print, outputs the fixed light-theme stylesheet used to lay\n\
                    out pages before PDF rasterization instead.\n\n\
                    Examples:\n  \
                    quire generate-css                  # Print CSS to stdout\n  \
                    quire generate-css > export.css     # Save to file",
                )
                .arg(
                    Arg::new("print")
                        .long("print")
                        .help("Output the PDF print stylesheet")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // `quire <input> --to <format>` is `quire export <input> --to <format>`
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "export".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_flag("verbose"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    if let Err(err) = apply_config_overrides(&mut config, &mut extra_params) {
        fail(&err);
    }

    match matches.subcommand() {
        Some(("export", sub_matches)) => handle_export_command(sub_matches, &config),
        Some(("preview", sub_matches)) => handle_preview_command(sub_matches, &config),
        Some(("formats", sub_matches)) => handle_formats_command(sub_matches.get_flag("json")),
        Some(("generate-css", sub_matches)) => {
            handle_generate_css_command(sub_matches.get_flag("print"))
        }
        _ => fail("Unknown subcommand. Use --help for usage information."),
    }
}

/// `--verbose` enables INFO level, otherwise use RUST_LOG (default WARN).
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Writes exports into a directory.
struct FsDelivery {
    out_dir: PathBuf,
}

impl Delivery for FsDelivery {
    fn deliver(&self, output: &EncodedOutput) -> io::Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        fs::write(self.out_dir.join(&output.filename), &output.bytes)
    }
}

/// Fix the parser configuration for this process.
fn configure_parser(config: &QuireConfig) {
    if let Err(err) = markup::configure(config.parser) {
        fail(&err.to_string());
    }
}

/// Default registry with the PDF rasterizer the config describes.
fn build_registry(config: &QuireConfig) -> FormatRegistry {
    let mut rasterizer = ChromeRasterizer::new().with_layout(config.pdf.layout());
    if let Some(bin) = &config.pdf.chrome_bin {
        rasterizer = rasterizer.with_binary(bin);
    }
    let mut registry = FormatRegistry::with_defaults();
    registry.register(PdfFormat::with_rasterizer(rasterizer));
    registry
}

fn read_input(path: &str) -> (String, String) {
    read_markdown_file(Path::new(path)).unwrap_or_else(|err| fail(&err.to_string()))
}

/// Handle the export command
fn handle_export_command(matches: &ArgMatches, config: &QuireConfig) {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let to = matches.get_one::<String>("to").expect("to is required");
    let format: ExportFormat = to.parse().unwrap_or_else(|_| {
        fail(&format!(
            "Unknown format '{to}'. Run `quire formats` to list the available formats."
        ))
    });
    let out_dir = matches
        .get_one::<String>("out-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export.out_dir.clone());

    let (source, file_name) = read_input(input);
    let base = matches
        .get_one::<String>("name")
        .cloned()
        .unwrap_or(file_name);

    tracing::info!(input = %input, %format, out_dir = %out_dir.display(), "exporting");
    configure_parser(config);
    let registry = build_registry(config);
    let exporter = Exporter::new(
        registry,
        FsDelivery {
            out_dir: out_dir.clone(),
        },
    );

    match exporter.export(format, &source, &base) {
        ExportOutcome::Success(_) => {
            println!("{}", out_dir.join(export_filename(&base, format)).display());
        }
        ExportOutcome::Failure { message, .. } => fail(&message),
        ExportOutcome::InProgress(_) | ExportOutcome::Idle => {
            fail(&format.failure_message());
        }
    }
}

/// Handle the preview command
fn handle_preview_command(matches: &ArgMatches, config: &QuireConfig) {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let (source, _) = read_input(input);
    configure_parser(config);
    let markup = markup::parse(&source).unwrap_or_else(|err| fail(&err.to_string()));
    print!("{markup}");
}

#[derive(Debug, Serialize)]
struct FormatInfo {
    name: ExportFormat,
    label: &'static str,
    extension: &'static str,
    content_type: &'static str,
    description: &'static str,
}

fn format_infos() -> Vec<FormatInfo> {
    ExportFormat::ALL
        .iter()
        .map(|format| FormatInfo {
            name: *format,
            label: format.label(),
            extension: format.extension(),
            content_type: format.content_type(),
            description: format.description(),
        })
        .collect()
}

/// Handle the formats command
fn handle_formats_command(json: bool) {
    let infos = format_infos();
    if json {
        match serde_json::to_string_pretty(&infos) {
            Ok(text) => println!("{text}"),
            Err(err) => fail(&err.to_string()),
        }
        return;
    }

    println!("Export formats:\n");
    for info in infos {
        println!(
            "  {:<5} .{:<5} {:<6} {}",
            info.name, info.extension, info.label, info.description
        );
    }
}

/// Handle the generate-css command
fn handle_generate_css_command(print: bool) {
    if print {
        print!("{}", get_print_css());
    } else {
        print!("{}", quire_babel::formats::get_default_css());
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> QuireConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Move `--extra-*` values into the configuration. Unknown keys are an error.
fn apply_config_overrides(
    config: &mut QuireConfig,
    extra_params: &mut HashMap<String, String>,
) -> Result<(), String> {
    let parser = &mut config.parser;
    for (key, field) in [
        ("hard-breaks", &mut parser.hard_breaks),
        ("tables", &mut parser.tables),
        ("strikethrough", &mut parser.strikethrough),
        ("autolinks", &mut parser.autolinks),
        ("task-lists", &mut parser.task_lists),
    ] {
        if let Some(raw) = extra_params.remove(key) {
            *field = parse_bool_arg(key, &raw)?;
        }
    }

    if let Some(raw) = take_override(extra_params, &["out-dir", "out_dir"]) {
        config.export.out_dir = PathBuf::from(raw);
    }
    if let Some(raw) = take_override(extra_params, &["chrome-bin", "chrome"]) {
        config.pdf.chrome_bin = Some(PathBuf::from(raw));
    }
    if let Some(raw) = extra_params.remove("content-width") {
        config.pdf.content_width = parse_number_arg("content-width", &raw)?;
    }
    if let Some(raw) = extra_params.remove("padding") {
        config.pdf.padding = parse_number_arg("padding", &raw)?;
    }
    if let Some(raw) = extra_params.remove("scale") {
        config.pdf.scale = parse_number_arg("scale", &raw)?;
    }

    let mut unknown: Vec<_> = extra_params.drain().map(|(key, _)| key).collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        unknown.sort();
        Err(format!("Unknown option --extra-{}", unknown.join(", --extra-")))
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| map.remove(*key))
}

fn parse_bool_arg(flag: &str, raw: &str) -> Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(format!("Invalid boolean value '{other}' for --extra-{flag}")),
    }
}

fn parse_number_arg<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("Invalid number '{raw}' for --extra-{flag}"))
}
