//! CLI: canonical data → (typed model JSON | signature listing)
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use canon_infer::{process_batch, BatchReport};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer function signatures and typed test cases from canonical exercise data
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    /// more log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print (or write) the typed exercise model as JSON
    Model(ModelOut),
    /// print one line per inferred signature
    Signatures(SignaturesOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /data/canonical)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// exit non-zero when any document produced warnings
    #[arg(long, default_value_t = false)]
    deny_warnings: bool,
}

#[derive(clap::Parser, Debug)]
struct ModelOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory, one `<slug>.json` per document (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct SignaturesOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Read and deserialize every input. Acquisition failures abort the run;
    /// document-level failures are left to the pipeline.
    fn load(&self) -> Result<Vec<(String, Value)>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        log::debug!("loading {} input file(s)", source_paths.len());
        source_paths
            .par_iter()
            .map(|path| self.load_one(path))
            .collect()
    }

    fn load_one(&self, source_path: &Path) -> Result<(String, Value)> {
        let source_path_str = source_path.to_string_lossy().to_string();
        let source = std::fs::read_to_string(source_path)
            .with_context(|| format!("failed to read source file ({source_path_str})"))?;
        let json_value = serde_json::from_str::<Value>(&source)
            .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => json_value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer {pointer} selects nothing in {source_path_str}"))?,
        };
        Ok((source_path_str, json_value))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Model(target) => {
                let report = process_batch(target.input_settings.load()?);
                for outcome in &report.outcomes {
                    let Ok(result) = &outcome.result else { continue };
                    let src = serde_json::to_string_pretty(&result.model)?;
                    match target.out.as_ref() {
                        Some(dir) => {
                            std::fs::create_dir_all(dir)
                                .with_context(|| format!("failed to create {}", dir.display()))?;
                            let file = dir.join(format!("{}.json", result.model.slug));
                            std::fs::write(&file, &src)
                                .with_context(|| format!("failed to write {}", file.display()))?;
                            log::debug!("wrote {}", file.display());
                        }
                        None => println!("{src}"),
                    }
                }
                Ok(summarize(&report, target.input_settings.deny_warnings))
            }
            Command::Signatures(target) => {
                let report = process_batch(target.input_settings.load()?);
                for outcome in &report.outcomes {
                    let Ok(result) = &outcome.result else { continue };
                    println!("{}", result.model.slug.bold());
                    for signature in &result.model.signatures {
                        println!("  {signature}");
                    }
                }
                Ok(summarize(&report, target.input_settings.deny_warnings))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Per-document status on stderr, then the exit code for the whole run.
fn summarize(report: &BatchReport, deny_warnings: bool) -> ExitCode {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(result) => {
                eprintln!("{} {} ({} cases)", "✔".green(), outcome.source, result.model.test_cases.len());
                for warning in &result.warnings {
                    eprintln!("  {} {warning}", "warning:".yellow());
                }
            }
            Err(error) => {
                eprintln!("{} {}", "✘".red(), outcome.source);
                eprintln!("  {} {error}", "error:".red());
            }
        }
    }
    eprintln!(
        "{} succeeded, {} failed, {} warning(s)",
        report.succeeded(),
        report.failed(),
        report.warning_count(),
    );

    let failed = report.failed() > 0 || (deny_warnings && report.warning_count() > 0);
    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["a/canonical-data.json", "b.json"]).unwrap();
        assert_eq!(out, [PathBuf::from("a/canonical-data.json"), PathBuf::from("b.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(err.to_string().contains("matched no files"), "{err}");
    }

    #[test]
    fn parses_model_command() {
        let cli = CommandLineInterface::try_parse_from([
            "canon-infer", "-v", "model", "-i", "x.json", "y.json", "--deny-warnings", "-o", "out",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), log::LevelFilter::Debug);
        let Command::Model(model) = &cli.cmd else { panic!("expected model command") };
        assert_eq!(model.input_settings.input, ["x.json", "y.json"]);
        assert!(model.input_settings.deny_warnings);
        assert_eq!(model.out.as_deref(), Some(Path::new("out")));
    }

    #[test]
    fn input_is_required() {
        assert!(CommandLineInterface::try_parse_from(["canon-infer", "signatures"]).is_err());
    }
}
