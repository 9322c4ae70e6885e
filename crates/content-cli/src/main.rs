mod config;
mod output;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use content_spec::{ContentLoader, FormSubmission, Manifest, content_schema};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::CliConfig;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const DEFAULT_LOG_FILTER: &str = "content_spec=warn,content=info";
const VERBOSE_LOG_FILTER: &str = "content_spec=debug,content=debug";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Inspect questionnaire content manifests",
    long_about = "Loads manifests, questions and messages from a content tree and shows how answers shape the form"
)]
struct Cli {
    /// Root of the content tree (the directory holding `frameworks/`).
    #[arg(long, global = true, value_name = "DIR")]
    content_path: Option<PathBuf>,
    /// JSON file with defaults for content_path, framework, question_set and manifest.
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,
    /// Log loader activity to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
struct ManifestArgs {
    /// Framework slug, e.g. g-cloud-7.
    #[arg(long)]
    framework: Option<String>,
    /// Question directory the manifest draws from.
    #[arg(long)]
    question_set: Option<String>,
    /// Manifest name without the .yml extension.
    #[arg(long)]
    manifest: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List the sections and numbered questions of a manifest.
    Sections {
        #[command(flatten)]
        target: ManifestArgs,
        /// JSON answers used to filter out questions whose dependencies fail.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the id of the section that follows another one.
    NextSection {
        #[command(flatten)]
        target: ManifestArgs,
        /// Current section id; omit to get the first section.
        #[arg(long)]
        current: Option<String>,
        /// Skip sections that are not editable.
        #[arg(long)]
        editable: bool,
        /// JSON answers used to filter the manifest first.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
    /// Convert a JSON form submission into typed section data.
    Extract {
        #[command(flatten)]
        target: ManifestArgs,
        /// Section id whose questions are extracted.
        #[arg(long)]
        section: String,
        /// JSON object mapping field names to a string or a list of strings.
        #[arg(long, value_name = "SUBMISSION")]
        submission: PathBuf,
    },
    /// Print a status message from a message block.
    Message {
        #[arg(long)]
        framework: Option<String>,
        /// Message block name without the .yml extension.
        #[arg(long)]
        block: String,
        /// Framework status, e.g. open.
        #[arg(long)]
        status: String,
        /// Supplier status narrowing the message, e.g. registered.
        #[arg(long)]
        supplier_status: Option<String>,
        /// JSON object used to fill message placeholders.
        #[arg(long, value_name = "CONTEXT")]
        context: Option<PathBuf>,
    },
    /// Print JSON Schemas for question, manifest and message files.
    Schema,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let content_path = config.content_path(cli.content_path);
    debug!(content_path = %content_path.display(), "resolved content path");
    let mut loader = ContentLoader::new(content_path);

    match cli.command {
        Command::Sections {
            target,
            answers,
            format,
        } => run_sections(&mut loader, &config, target, answers, format),
        Command::NextSection {
            target,
            current,
            editable,
            answers,
        } => run_next_section(&mut loader, &config, target, current, editable, answers),
        Command::Extract {
            target,
            section,
            submission,
        } => run_extract(&mut loader, &config, target, &section, &submission),
        Command::Message {
            framework,
            block,
            status,
            supplier_status,
            context,
        } => {
            let framework = config.framework(framework)?;
            run_message(
                &mut loader,
                &framework,
                &block,
                &status,
                supplier_status.as_deref(),
                context,
            )
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&content_schema()?)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_manifest(
    loader: &mut ContentLoader,
    config: &CliConfig,
    target: ManifestArgs,
) -> CliResult<Manifest> {
    let framework = config.framework(target.framework)?;
    let question_set = config.question_set(target.question_set)?;
    let manifest = config.manifest(target.manifest)?;
    loader.load_manifest(&framework, &question_set, &manifest)?;
    Ok(loader.get_builder(&framework, &manifest)?)
}

fn read_json(path: &Path) -> CliResult<Value> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}

fn read_answers(path: Option<PathBuf>) -> CliResult<Option<Value>> {
    path.map(|path| read_json(&path)).transpose()
}

fn run_sections(
    loader: &mut ContentLoader,
    config: &CliConfig,
    target: ManifestArgs,
    answers: Option<PathBuf>,
    format: OutputFormat,
) -> CliResult<()> {
    let manifest = load_manifest(loader, config, target)?;
    let manifest = match read_answers(answers)? {
        Some(answers) => manifest.filter(&answers),
        None => manifest,
    };
    match format {
        OutputFormat::Text => println!("{}", output::manifest_text(&manifest)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output::manifest_json(&manifest))?
        ),
    }
    Ok(())
}

fn run_next_section(
    loader: &mut ContentLoader,
    config: &CliConfig,
    target: ManifestArgs,
    current: Option<String>,
    editable: bool,
    answers: Option<PathBuf>,
) -> CliResult<()> {
    let manifest = load_manifest(loader, config, target)?;
    let manifest = match read_answers(answers)? {
        Some(answers) => manifest.filter(&answers),
        None => manifest,
    };
    match manifest.get_next_section_id(current.as_deref(), editable) {
        Some(section_id) => {
            println!("{section_id}");
            Ok(())
        }
        None => Err("no next section".into()),
    }
}

/// Submitted value for one field: a single string or every value of a repeated input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubmittedValue {
    One(String),
    Many(Vec<String>),
}

fn parse_submission(value: Value) -> CliResult<FormSubmission> {
    let fields: BTreeMap<String, SubmittedValue> = serde_json::from_value(value)
        .map_err(|err| format!("submission must map field names to strings: {err}"))?;
    let fields = fields
        .into_iter()
        .map(|(key, value)| {
            let values = match value {
                SubmittedValue::One(value) => vec![value],
                SubmittedValue::Many(values) => values,
            };
            let values = values
                .into_iter()
                .map(|value| value.trim().to_string())
                .collect();
            (key, values)
        })
        .collect::<BTreeMap<String, Vec<String>>>();
    Ok(FormSubmission::from(fields))
}

fn run_extract(
    loader: &mut ContentLoader,
    config: &CliConfig,
    target: ManifestArgs,
    section_id: &str,
    submission_path: &Path,
) -> CliResult<()> {
    let manifest = load_manifest(loader, config, target)?;
    let section = manifest
        .get_section(section_id)
        .ok_or_else(|| format!("section '{section_id}' is not in the manifest"))?;
    let submission = parse_submission(read_json(submission_path)?)?;
    let data = section.get_data(&submission)?;
    println!("{}", serde_json::to_string_pretty(&Value::Object(data))?);
    Ok(())
}

fn run_message(
    loader: &mut ContentLoader,
    framework: &str,
    block: &str,
    status: &str,
    supplier_status: Option<&str>,
    context: Option<PathBuf>,
) -> CliResult<()> {
    loader.load_messages(framework, [block])?;
    let context = read_answers(context)?.unwrap_or_else(|| Value::Object(Map::new()));
    match loader.render_message(framework, block, status, supplier_status, &context)? {
        Some(message) => {
            println!("{message}");
            Ok(())
        }
        None => Err(format!(
            "no message for status '{}' in block '{block}'",
            content_spec::MessageBlock::status_key(status, supplier_status)
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn submission_accepts_strings_and_lists() {
        let submission = parse_submission(json!({
            "name": "  Acme  ",
            "tags": ["a", " b "]
        }))
        .expect("submission");
        assert_eq!(submission.first("name"), Some("Acme"));
        assert_eq!(submission.all("tags"), ["a", "b"]);
    }

    #[test]
    fn submission_rejects_non_string_values() {
        assert!(parse_submission(json!({ "count": 3 })).is_err());
        assert!(parse_submission(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "content",
            "sections",
            "--framework",
            "g-cloud-7",
            "--content-path",
            "/tmp/content",
            "--format",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.content_path, Some(PathBuf::from("/tmp/content")));
        match cli.command {
            Command::Sections { target, format, .. } => {
                assert_eq!(target.framework.as_deref(), Some("g-cloud-7"));
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected sections command"),
        }
    }
}
