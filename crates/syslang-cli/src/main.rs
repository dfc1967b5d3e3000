//! Command-line interface for the SysLang systems-modeling toolkit.

use clap::{Parser, Subcommand, ValueEnum};
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use syslang_analyze::{analyze, render_html, render_json, render_text, AnalysisReport};
use syslang_check::{check_model, CheckError, CheckSummary};
use syslang_library::Library;
use syslang_model::{
    has_canonical_extension, parse_model, save_model, LoadError, ParamValue, PrincipleUse,
    SystemInfo, SystemModel, TestCase, FILE_EXTENSION,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SYSLANG_GIT_HASH"),
    " ",
    env!("SYSLANG_GIT_DATE"),
    ")"
);

/// CLI error with source context for pretty printing.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read file: {message}")]
    IoError { message: String },

    #[error("{message}")]
    #[diagnostic(code(syslang::parse_error))]
    ParseError {
        message: String,
        #[source_code]
        src: NamedSource<Arc<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("{message}")]
    #[diagnostic(code(syslang::load_error))]
    LoadError { message: String },

    #[error("{message}")]
    #[diagnostic(code(syslang::check_error))]
    CheckFailed {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        #[help]
        suggestion: Option<String>,
    },

    #[error("{message}")]
    Other { message: String },
}

impl CliError {
    fn from_load_error(e: LoadError, source: Arc<String>, filename: &str) -> Self {
        match e.location() {
            Some(location) => CliError::ParseError {
                message: e.to_string(),
                src: NamedSource::new(filename, source),
                span: (location.offset, 1).into(),
            },
            None => CliError::LoadError {
                message: e.to_string(),
            },
        }
    }

    fn from_check_error(e: CheckError) -> Self {
        let help = match &e {
            CheckError::UnknownPrinciple {
                suggestion: Some(suggestion),
                path,
                ..
            } => format!("at {path}; did you mean `{suggestion}`?"),
            other => format!("at {}", other.path()),
        };
        CliError::CheckFailed {
            message: e.to_string(),
            help: Some(help),
        }
    }
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "syslang", version = VERSION)]
#[command(about = "SysLang systems-modeling toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model file against the principle library
    Check {
        /// Input file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Exit non-zero when the check produces warnings
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Analyze a model: hypotheses, interactions, pattern suggestions
    Analyze {
        /// Input file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Exit non-zero when the analysis produces warnings
        #[arg(long)]
        deny_warnings: bool,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List library principles, or show one in detail
    Principles {
        /// Principle name
        name: Option<String>,
    },

    /// List distribution patterns, or show one in detail
    Patterns {
        /// Pattern name
        name: Option<String>,
    },

    /// Create a starter model file
    New {
        /// System name
        #[arg(long)]
        name: String,

        /// Domain the system lives in
        #[arg(long)]
        domain: String,

        /// Scale of the system
        #[arg(long, default_value = "unspecified")]
        scale: String,

        /// Output path (default: <slug>.syslang.yml)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn main() {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if matches!(&cli.command, Commands::Analyze { verbose: true, .. }) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Check {
            file,
            deny_warnings,
        } => cmd_check(&file, deny_warnings),
        Commands::Analyze {
            file,
            output,
            out,
            deny_warnings,
            verbose: _,
        } => cmd_analyze(&file, output, out.as_deref(), deny_warnings),
        Commands::Principles { name } => cmd_principles(name.as_deref()),
        Commands::Patterns { name } => cmd_patterns(name.as_deref()),
        Commands::New {
            name,
            domain,
            scale,
            output,
        } => cmd_new(&name, &domain, &scale, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

/// Read and parse a model file, mapping errors into CLI diagnostics.
fn load(file: &Path) -> CliResult<SystemModel> {
    if !has_canonical_extension(file) {
        warn!(
            "{} does not follow the {} naming convention",
            file.display(),
            FILE_EXTENSION
        );
    }
    let filename = file.display().to_string();
    let source = Arc::new(fs::read_to_string(file).map_err(|e| CliError::IoError {
        message: e.to_string(),
    })?);
    parse_model(&source).map_err(|e| CliError::from_load_error(e, source.clone(), &filename))
}

fn cmd_check(file: &Path, deny_warnings: bool) -> CliResult<()> {
    let model = load(file)?;

    info!("checking...");
    let summary = check_model(&model, Library::builtin()).map_err(CliError::from_check_error)?;

    print_summary(&summary);
    println!("check: ok");

    if deny_warnings && !summary.warnings.is_empty() {
        std::process::exit(2);
    }
    Ok(())
}

fn print_summary(summary: &CheckSummary) {
    println!(
        "  {} principles, {} components, {} relations, {} tests",
        summary.principles, summary.components, summary.relations, summary.tests
    );
    for warning in &summary.warnings {
        println!("  warning: {}", warning);
    }
}

fn cmd_analyze(
    file: &Path,
    output: OutputFormat,
    out: Option<&Path>,
    deny_warnings: bool,
) -> CliResult<()> {
    let model = load(file)?;
    let library = Library::builtin();

    info!("checking...");
    let summary = check_model(&model, library).map_err(CliError::from_check_error)?;
    for warning in &summary.warnings {
        warn!("{}", warning);
    }

    info!("analyzing...");
    let report = analyze(&model, library);
    let rendered = render_report(&report, output)?;

    match out {
        Some(path) => {
            fs::write(path, rendered).map_err(|e| CliError::IoError {
                message: e.to_string(),
            })?;
            info!("report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    if deny_warnings && !report.warnings.is_empty() {
        std::process::exit(2);
    }
    Ok(())
}

fn render_report(report: &AnalysisReport, output: OutputFormat) -> CliResult<String> {
    match output {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Html => Ok(render_html(report)),
        OutputFormat::Json => {
            let mut json = render_json(report).map_err(|e| CliError::Other {
                message: format!("failed to encode report: {e}"),
            })?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn cmd_principles(name: Option<&str>) -> CliResult<()> {
    let library = Library::builtin();

    match name {
        Some(name) => {
            let def = library.principle(name).ok_or_else(|| CliError::NotFound {
                message: format!("principle not found: {name}"),
                suggestion: library
                    .closest_principle(name)
                    .map(|close| format!("did you mean `{close}`?")),
            })?;

            println!("{}", name);
            println!("  {}", def.description);
            println!("  category: {}{}", def.category, principle_tags(def));
            if !def.parameters.is_empty() {
                println!("  parameters:");
                for (param, decl) in &def.parameters {
                    println!("    {}: {}", param, decl.description);
                    if let Some(values) = &decl.values {
                        println!("      values: {}", values.join(", "));
                    }
                    if let Some([lo, hi]) = decl.range {
                        println!("      range: [{}, {}]", lo, hi);
                    }
                }
            }
            if let Some(template) = &def.hypothesis_template {
                println!("  hypothesis: {}", template);
            }
            if let Some(threshold) = def.default_threshold {
                println!("  default threshold: {}", threshold);
            }
        }
        None => {
            for (category, description) in library.categories() {
                println!("{}: {}", category, description);
                for name in library.principles_in_category(category) {
                    let tags = library
                        .principle(name)
                        .map(principle_tags)
                        .unwrap_or_default();
                    println!("  {}{}", name, tags);
                }
                println!();
            }
        }
    }
    Ok(())
}

fn principle_tags(def: &syslang_library::PrincipleDef) -> &'static str {
    match (def.meta_principle, def.operator) {
        (true, _) => " (meta)",
        (_, true) => " (operator)",
        _ => "",
    }
}

fn cmd_patterns(name: Option<&str>) -> CliResult<()> {
    let library = Library::builtin();

    match name {
        Some(name) => {
            let def = library.pattern(name).ok_or_else(|| CliError::NotFound {
                message: format!("pattern not found: {name}"),
                suggestion: None,
            })?;

            println!("{}", name);
            println!("  {}", def.description);
            println!("  specializes: {}", def.parent_principle);
            if !def.specific_parameters.is_empty() {
                println!("  parameters:");
                for (param, decl) in &def.specific_parameters {
                    println!("    {}: {}", param, decl.description);
                    if let Some(values) = &decl.values {
                        println!("      values: {}", values.join(", "));
                    }
                    if let Some([lo, hi]) = decl.range {
                        println!("      range: [{}, {}]", lo, hi);
                    }
                }
            }
        }
        None => {
            for (name, def) in library.patterns() {
                println!("{}: {}", name, def.description);
                println!("  specializes: {}", def.parent_principle);
            }
        }
    }
    Ok(())
}

fn cmd_new(name: &str, domain: &str, scale: &str, output: Option<&Path>) -> CliResult<()> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("{}{}", slugify(name), FILE_EXTENSION)),
    };
    if path.exists() {
        return Err(CliError::Other {
            message: format!("refusing to overwrite {}", path.display()),
        });
    }

    let model = starter_model(name, domain, scale);
    save_model(&model, &path).map_err(|e| CliError::Other {
        message: e.to_string(),
    })?;

    println!("created {}", path.display());
    Ok(())
}

/// A starter model that already passes `check`: one parameterized
/// principle with a falsification test to edit.
fn starter_model(name: &str, domain: &str, scale: &str) -> SystemModel {
    SystemModel {
        system: SystemInfo {
            name: name.to_string(),
            domain: domain.to_string(),
            scale: scale.to_string(),
            description: String::new(),
        },
        principles: vec![PrincipleUse {
            name: "feedback_loop".to_string(),
            parameters: [
                ("polarity".to_string(), ParamValue::String("negative".into())),
                ("latency".to_string(), ParamValue::String("delayed".into())),
            ]
            .into_iter()
            .collect(),
            confidence: 0.5,
        }],
        components: vec![],
        relations: vec![],
        tests: vec![TestCase {
            name: "example_test".to_string(),
            principle: "feedback_loop".to_string(),
            prediction: "describe what the loop should do".to_string(),
            refuted_if: "describe the observation that would disprove it".to_string(),
        }],
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_sep = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("system");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basics() {
        assert_eq!(slugify("Coral Reef"), "coral_reef");
        assert_eq!(slugify("  K8s -- cluster!  "), "k8s_cluster");
        assert_eq!(slugify("---"), "system");
    }

    #[test]
    fn starter_model_checks_cleanly() {
        let model = starter_model("T", "d", "s");
        let summary = check_model(&model, Library::builtin()).unwrap();
        assert_eq!(summary.principles, 1);
        assert_eq!(summary.tests, 1);
    }

    #[test]
    fn check_error_help_carries_path_and_suggestion() {
        let model = parse_model("system: {name: T}\nprinciples: [{name: feedback_lop}]").unwrap();
        let err = check_model(&model, Library::builtin()).unwrap_err();
        match CliError::from_check_error(err) {
            CliError::CheckFailed { help: Some(help), .. } => {
                assert!(help.contains("principles[0].name"));
                assert!(help.contains("feedback_loop"));
            }
            other => panic!("expected CheckFailed with help, got {other:?}"),
        }
    }
}
