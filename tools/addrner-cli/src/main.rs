//! Address NER Corpus Tool
//!
//! Converts annotation files, builds binary training corpora from the legacy
//! XML data, trains the lexicon model and writes misprediction reports.

use std::path::PathBuf;

use addrner_core::{DocBin, EvalConfig, LexiconModel, blank, eval, nerf, xml};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// CLI arguments
#[derive(Parser)]
#[command(name = "addrner")]
#[command(about = "Corpus tools for US address named-entity recognition")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between nerf and binary container files
    Convert {
        /// Input file
        inp: PathBuf,
        /// Output file
        out: PathBuf,
        /// Input format (nerf or spacy); inferred from the extension if omitted
        #[arg(long)]
        inp_format: Option<String>,
        /// Output format (nerf or spacy); inferred from the extension if omitted
        #[arg(long)]
        out_format: Option<String>,
    },
    /// Convert the legacy XML training corpus into a binary container
    Xml2docbin {
        /// Legacy XML file
        input: PathBuf,
        /// Binary container to write
        output: PathBuf,
        /// Tokenizer language
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Train a lexicon model from a binary container
    Lexicon {
        /// Training set
        train: PathBuf,
        /// Model directory to write
        model_dir: PathBuf,
    },
    /// Report documents the model mispredicts
    Eval {
        /// Model directory
        #[arg(long, env = "ADDRNER_MODEL")]
        model: Option<PathBuf>,
        /// Evaluation set
        #[arg(long, env = "ADDRNER_DEV_SET")]
        dev: Option<PathBuf>,
        /// HTML report to write
        #[arg(long, env = "ADDRNER_REPORT")]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "addrner_core=debug,info"
        } else {
            "info"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn eval_config(
    model: Option<PathBuf>,
    dev: Option<PathBuf>,
    output: Option<PathBuf>,
) -> EvalConfig {
    let mut config = EvalConfig::new();
    if let Some(model) = model {
        config = config.with_model_dir(model);
    }
    if let Some(dev) = dev {
        config = config.with_dev_set(dev);
    }
    if let Some(output) = output {
        config = config.with_output(output);
    }
    config
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            inp,
            out,
            inp_format,
            out_format,
        } => {
            nerf::convert_format(&inp, &out, inp_format.as_deref(), out_format.as_deref())
                .with_context(|| {
                    format!("failed to convert {} to {}", inp.display(), out.display())
                })?;
        }
        Commands::Xml2docbin {
            input,
            output,
            lang,
        } => {
            let tokenizer = blank(&lang)?;
            let docs = xml::convert_corpus(&input, &output, &tokenizer)
                .with_context(|| format!("failed to convert {}", input.display()))?;
            info!("Converted {} documents", docs);
        }
        Commands::Lexicon { train, model_dir } => {
            let docbin = DocBin::from_disk(&train)
                .with_context(|| format!("failed to read {}", train.display()))?;
            let docs = docbin.get_docs(&blank("en")?)?;
            let model = LexiconModel::fit(&docs);
            model
                .save(&model_dir)
                .with_context(|| format!("failed to save model to {}", model_dir.display()))?;
        }
        Commands::Eval { model, dev, output } => {
            let config = eval_config(model, dev, output);
            let summary = eval::run(&config).context("evaluation failed")?;
            info!(
                "{} of {} documents mispredicted, report at {}",
                summary.mispredicted,
                summary.total,
                config.output.display()
            );
        }
    }

    Ok(())
}
