//! Binary to generate and run class builders.
//!
//! Usage:
//!   `class-builder-gen generate < model.json > builders.rs`
//!   `class-builder-gen build --model model.json --class Document --input doc.yaml --yaml`
//!   `class-builder-gen check --model model.json`

use std::fs;
use std::io::{Write, read_to_string, stdin, stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use class_builder_gen::{
    BuilderGenError, ClassCollection, Compiler, GenerateSettings, TracingDiagnostics,
    generate_to_writer, parse_document, validate_model,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "class-builder-gen")]
#[command(about = "Build typed instances from JSON/YAML documents using a class model", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Emit Rust builder source for a model.
    Generate {
        /// Model file; stdin when omitted.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file; stdout when omitted.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Module path of existing target types; types are emitted when omitted.
        #[arg(long, value_name = "PATH")]
        types_module: Option<String>,

        /// File whose contents are written at the top of the output.
        #[arg(long, value_name = "FILE")]
        license: Option<PathBuf>,

        /// Value returned by the generated `version()` function.
        #[arg(long, value_name = "NAME")]
        version_name: Option<String>,

        /// Reject models that violate any invariant.
        #[arg(long)]
        strict: bool,
    },

    /// Convert a document into an instance of one class and print it as JSON.
    Build {
        #[arg(long, value_name = "FILE")]
        model: PathBuf,

        #[arg(long, value_name = "NAME")]
        class: String,

        /// Document file; stdin when omitted.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Parse the document as YAML instead of JSON.
        #[arg(long)]
        yaml: bool,

        #[arg(long)]
        strict: bool,
    },

    /// Report model issues; exits with status 1 when there are any.
    Check {
        #[arg(long, value_name = "FILE")]
        model: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_filter: &str = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter: EnvFilter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String, BuilderGenError> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => Ok(read_to_string(stdin())?),
    }
}

fn load_model(path: &Path) -> Result<ClassCollection, BuilderGenError> {
    let model_json: String = fs::read_to_string(path)?;
    ClassCollection::from_json(&model_json)
}

fn run(command: Command) -> Result<ExitCode, BuilderGenError> {
    match command {
        Command::Generate {
            input,
            output,
            types_module,
            license,
            version_name,
            strict,
        } => {
            let model_json: String = read_input(input.as_deref())?;
            let license: Option<String> = license.map(fs::read_to_string).transpose()?;
            let settings = GenerateSettings {
                deny_invalid_model: strict,
                types_module,
                license,
                version: version_name,
            };
            let mut source: Vec<u8> = Vec::new();
            generate_to_writer(&model_json, &mut source, &settings)?;
            match output {
                Some(path) => fs::write(path, source)?,
                None => stdout().write_all(&source)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Build {
            model,
            class,
            input,
            yaml,
            strict,
        } => {
            let classes: ClassCollection = load_model(&model)?;
            let settings = GenerateSettings {
                deny_invalid_model: strict,
                ..GenerateSettings::default()
            };
            let compiler = Compiler::new(&classes, &settings)?;
            let text: String = read_input(input.as_deref())?;
            let document = parse_document(&text, yaml)?;
            let instance = compiler.build(&class, &document, &mut TracingDiagnostics)?;
            if instance.is_none() {
                tracing::info!(class = %class, "document did not build");
            }
            let rendered: String = serde_json::to_string_pretty(&instance)?;
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { model } => {
            let classes: ClassCollection = load_model(&model)?;
            let issues = validate_model(&classes);
            for issue in &issues {
                println!("{issue}");
            }
            if issues.is_empty() {
                tracing::info!(classes = classes.len(), "model is valid");
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
