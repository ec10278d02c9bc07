//! Command-line interface: search and artifact inspection

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::data::{load_jsonl, split};
use crate::encoder::EncoderRegistry;
use crate::hpo::{refit_best, HyperparameterSearch, RandomSampler, SearchSpace};
use crate::io::ModelArtifact;
use crate::metrics;

use super::logging::{log, LogLevel};

/// Hyperparameter search and fine-tuning for clinical text classification
#[derive(Debug, Parser)]
#[command(name = "afinar", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search hyperparameters, refit the winner, and save the model
    Search {
        /// JSONL file of {"text": ..., "label": ...} records
        data: PathBuf,

        /// Number of label classes
        #[arg(long, default_value_t = 2)]
        classes: usize,

        /// Trial budget for the search
        #[arg(long, default_value_t = 20)]
        trials: usize,

        /// Encoder model identifier
        #[arg(long, default_value = "hashing-256")]
        model: String,

        /// Seed for the data split and trial sampling
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output path for the model artifact
        #[arg(long, default_value = "model.json")]
        out: PathBuf,

        /// Suppress progress output
        #[arg(long, conflicts_with = "verbose")]
        quiet: bool,

        /// Print per-epoch detail
        #[arg(long)]
        verbose: bool,
    },

    /// Print the metadata of a saved model artifact
    Info {
        /// Artifact path
        artifact: PathBuf,
    },
}

/// Dispatch a parsed command.
pub fn run_command(cli: Cli) -> crate::Result<()> {
    match cli.command {
        Command::Search {
            data,
            classes,
            trials,
            model,
            seed,
            out,
            quiet,
            verbose,
        } => {
            let level = if quiet {
                LogLevel::Quiet
            } else if verbose {
                LogLevel::Verbose
            } else {
                LogLevel::Normal
            };
            run_search(&data, classes, trials, &model, seed, &out, level)
        }
        Command::Info { artifact } => run_info(&artifact),
    }
}

fn run_search(
    data: &Path,
    classes: usize,
    trials: usize,
    model: &str,
    seed: u64,
    out: &Path,
    level: LogLevel,
) -> crate::Result<()> {
    let dataset = load_jsonl(data, classes)?;
    log(
        level,
        LogLevel::Normal,
        &format!("loaded {} examples ({} classes)", dataset.len(), classes),
    );

    let (train, validation, test) = split(&dataset, 0.8, 0.1, seed)?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "split: {} train / {} validation / {} test",
            train.len(),
            validation.len(),
            test.len()
        ),
    );

    let registry = Arc::new(EncoderRegistry::new());
    let space = SearchSpace::new(model);
    let sampler = RandomSampler::new(space, seed)?;
    let mut search = HyperparameterSearch::new(trials, Box::new(sampler), Arc::clone(&registry))
        .with_log_level(level);

    let outcome = search.run(&train, &validation)?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "best trial: lr={:.3e} epochs={} batch_size={} (val accuracy {:.4})",
            outcome.best_config.lr,
            outcome.best_config.epochs,
            outcome.best_config.batch_size,
            outcome.best_score
        ),
    );

    let classifier = refit_best(&outcome, &train, &validation, registry)?;

    let predicted = classifier.predict(test.examples())?;
    let actual = test.labels();
    if classes == 2 {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "test: accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
                metrics::accuracy(&predicted, &actual),
                metrics::precision(&predicted, &actual),
                metrics::recall(&predicted, &actual),
                metrics::f1_score(&predicted, &actual)
            ),
        );
    } else {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "test: accuracy={:.4} macro_precision={:.4} macro_recall={:.4} macro_f1={:.4}",
                metrics::accuracy(&predicted, &actual),
                metrics::macro_precision(&predicted, &actual, classes),
                metrics::macro_recall(&predicted, &actual, classes),
                metrics::macro_f1(&predicted, &actual, classes)
            ),
        );
    }

    let name = data
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    let artifact = ModelArtifact::from_classifier(name, &classifier, Some(outcome.best_score))?;
    artifact.save(out)?;
    log(
        level,
        LogLevel::Normal,
        &format!("saved model artifact to {}", out.display()),
    );
    Ok(())
}

fn run_info(path: &Path) -> crate::Result<()> {
    let artifact = ModelArtifact::load(path)?;
    let meta = &artifact.metadata;

    println!("name:             {}", meta.name);
    println!("model id:         {}", meta.model_id);
    println!("classes:          {}", meta.num_classes);
    println!("created:          {}", meta.created_at.to_rfc3339());
    println!("learning rate:    {:.3e}", meta.config.lr);
    println!("epochs:           {}", meta.config.epochs);
    println!("batch size:       {}", meta.config.batch_size);
    println!("patience:         {}", meta.config.patience);
    println!("early stopping:   {}", meta.config.early_stopping);
    match meta.validation_score {
        Some(score) => println!("val accuracy:     {score:.4}"),
        None => println!("val accuracy:     unknown"),
    }
    println!("head parameters:  {}", artifact.head.params().len());
    Ok(())
}
