use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the format names accepted by `--to` (see quire_babel::ExportFormat)
// We need to duplicate this here since build scripts can't access src/ modules
const EXPORT_FORMATS: &[&str] = &[
    "pdf",
    "docx",
    "html",
    "txt",
    "rtf",
    "paginated-document",
    "word-document",
    "html-file",
    "plain-text",
    "rich-text",
];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Markdown file (.md, .markdown, .txt)")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("quire")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export Markdown to PDF, Word, HTML, plain text and RTF")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .about("Export a Markdown file")
                .arg(input_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(EXPORT_FORMATS)),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(Arg::new("name").long("name")),
        )
        .subcommand(
            Command::new("preview")
                .about("Print the sanitized HTML for a Markdown file")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("formats")
                .about("List the available export formats")
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("generate-css")
                .about("Output the CSS embedded in HTML exports")
                .arg(Arg::new("print").long("print").action(ArgAction::SetTrue)),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "quire", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "quire", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "quire", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
