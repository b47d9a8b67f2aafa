use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use numeroscribe::config::Config;
use numeroscribe::export::{ExportDependencies, ExportManager, ExportSettings};
use numeroscribe::report::{self, NumerologyReport, Plan};
use numeroscribe::signature::{SIGNATURE_MIME_TYPE, SignatureSettings, StrokeScript};
use numeroscribe::util;

#[derive(Parser, Debug)]
#[command(name = "numeroscribe")]
#[command(version, about = "Signature capture and PDF export for numerology reports")]
struct Cli {
    /// Use this config file instead of ~/.config/numeroscribe/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded stroke script and emit the signature as a PNG data URL
    Sign {
        /// Stroke script (JSON) describing the pad position and pointer events
        script: PathBuf,

        /// Write the data URL here instead of printing it
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render a report as a multi-page PDF
    Export {
        /// Report JSON as returned by the report service
        report: PathBuf,

        /// Which report tier to render
        #[arg(long, value_enum, default_value_t = Plan::Free)]
        plan: Plan,

        /// Signature to embed: a data URL file or a raw PNG
        #[arg(long, value_name = "FILE")]
        signature: Option<PathBuf>,

        /// Directory for the finished PDF (overrides export.output_directory)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// File name without extension (overrides export.filename_template)
        #[arg(long)]
        name: Option<String>,

        /// Report the outcome on stderr only, without desktop notifications
        #[arg(long)]
        no_notify: bool,
    },

    /// Write the documented default config file
    InitConfig,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::get_config_path()?,
    };

    match cli.command {
        Command::InitConfig => {
            Config::create_default_file(&config_path)?;
            println!("Wrote {}", config_path.display());
        }
        Command::Sign { script, output } => {
            let config = Config::load_from(&config_path)?;
            sign(&script, output.as_deref(), &config)?;
        }
        Command::Export {
            report,
            plan,
            signature,
            output_dir,
            name,
            no_notify,
        } => {
            let config = Config::load_from(&config_path)?;
            let options = ExportOptions {
                plan,
                signature,
                output_dir,
                name,
                no_notify,
            };
            export(&report, options, &config)?;
        }
    }

    Ok(())
}

fn sign(script_path: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    let text = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read stroke script {}", script_path.display()))?;
    let script = StrokeScript::from_json(&text)
        .with_context(|| format!("Invalid stroke script {}", script_path.display()))?;

    let outcome = script.replay(SignatureSettings::from(&config.signature))?;
    log::info!(
        "Replayed {} events, save callback fired {} times",
        script.events.len(),
        outcome.save_count
    );

    let Some(data_url) = outcome.saved else {
        return Err(anyhow::anyhow!("Stroke script produced no signature"));
    };

    match output {
        Some(path) => {
            std::fs::write(path, &data_url)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote signature to {}", path.display());
        }
        None => println!("{}", data_url),
    }
    Ok(())
}

struct ExportOptions {
    plan: Plan,
    signature: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    name: Option<String>,
    no_notify: bool,
}

fn export(report_path: &Path, options: ExportOptions, config: &Config) -> Result<()> {
    let json = std::fs::read_to_string(report_path)
        .with_context(|| format!("Failed to read report {}", report_path.display()))?;
    let signature = options
        .signature
        .as_deref()
        .map(read_signature)
        .transpose()?;
    let report = NumerologyReport::from_json(&json)
        .with_context(|| format!("Invalid report {}", report_path.display()))?
        .with_signature(signature);

    let mut settings = ExportSettings::from(&config.export);
    if let Some(dir) = options.output_dir {
        settings.save.output_directory = dir;
    }
    let output_name = options
        .name
        .unwrap_or_else(|| report::output_name(&config.export.filename_template, &report));

    let pages = report::build_pages(&report, options.plan, &config.report);
    log::info!(
        "Exporting {} report ({} pages) as '{}'",
        if options.plan.is_premium() { "premium" } else { "free" },
        pages.len(),
        output_name
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let dependencies = if options.no_notify {
        ExportDependencies::without_notifications()
    } else {
        ExportDependencies::default()
    };
    let manager = ExportManager::with_dependencies(runtime.handle(), settings, dependencies);

    let result = runtime.block_on(manager.export_document(pages, &output_name))?;
    println!(
        "Saved {} pages ({} bytes) to {}",
        result.page_count,
        result.byte_size,
        result.saved_path.display()
    );
    Ok(())
}

/// Reads a signature file: either a data URL as written by `sign`, or raw PNG bytes.
fn read_signature(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read signature {}", path.display()))?;

    match std::str::from_utf8(&bytes).map(str::trim) {
        Ok(text) if text.starts_with("data:") => Ok(text.to_string()),
        _ => Ok(util::encode_data_url(SIGNATURE_MIME_TYPE, &bytes)),
    }
}
