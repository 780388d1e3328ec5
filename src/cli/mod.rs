//! Command-line interface for training, scoring, and inspecting models

use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::artifact::ModelArtifact;
use crate::data::load_csv;
use crate::eda::{suggest_log_transform, summarize};
use crate::grids;
use crate::model::RandomForest;
use crate::pipeline::CreditPipeline;
use crate::schema::{FeatureSchema, TARGET};
use crate::server::{run_server, ServerConfig};

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

#[derive(Parser)]
#[command(name = "credit-risk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Credit-risk classification pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model on a labeled application table
    Train {
        /// Training CSV with a `loan_status` column
        #[arg(short, long)]
        data: PathBuf,

        /// Number of trees in the forest
        #[arg(long, default_value = "200")]
        trees: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Use one-hot categorical encoding (disables oversampling)
        #[arg(long)]
        one_hot: bool,

        /// Output artifact file
        #[arg(short, long, default_value = "model.json")]
        output: PathBuf,
    },

    /// Score an application table with a trained model
    Predict {
        /// Trained model artifact
        #[arg(short, long)]
        model: PathBuf,

        /// Input CSV of applications
        #[arg(short, long)]
        data: PathBuf,

        /// Output CSV; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize the numeric columns of a dataset
    Eda {
        /// Input CSV
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Show ranked feature importances of a trained model
    Importance {
        /// Trained model artifact
        #[arg(short, long)]
        model: PathBuf,

        /// Number of features to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// List the hyperparameter search grids
    Grids,

    /// Serve a trained model over HTTP
    Serve {
        /// Trained model artifact
        #[arg(short, long)]
        model: PathBuf,

        /// Bind host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Bind port
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

pub fn cmd_train(
    data: &Path,
    trees: usize,
    seed: u64,
    one_hot: bool,
    output: &Path,
) -> anyhow::Result<()> {
    section("Training");
    let started = Instant::now();

    let df = load_csv(data)?;
    step_ok(&format!("loaded {} rows from {}", df.height(), data.display()));

    let forest = RandomForest::new(trees).with_random_state(seed);
    let mut pipeline = CreditPipeline::new(FeatureSchema::credit_default(), forest)
        .with_resample_seed(seed);
    if one_hot {
        pipeline = pipeline.with_one_hot();
    }
    pipeline.fit(&df)?;
    step_ok(&format!("fitted {trees}-tree forest in {:.1?}", started.elapsed()));

    let inference = df.drop(TARGET)?;
    let predictions = pipeline.predict(&inference)?;
    let y = crate::data::target_vector(&df)?;
    let correct = predictions.iter().zip(y.iter()).filter(|(p, a)| p == a).count();
    step_ok(&format!(
        "training accuracy {:.3}",
        correct as f64 / y.len() as f64
    ));

    let report = pipeline.importance_report(10)?;
    section("Top features");
    print!("{}", report.render());

    let artifact = ModelArtifact::new(pipeline)?;
    artifact.save(output)?;
    step_ok(&format!("saved artifact to {}", output.display()));

    Ok(())
}

pub fn cmd_predict(model: &Path, data: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let artifact = ModelArtifact::<RandomForest>::load(model)?;
    let df = load_csv(data)?;

    let labels = artifact.pipeline.predict(&df)?;
    let proba = artifact.pipeline.predict_proba(&df)?;

    let mut result = df;
    result.with_column(Series::new(
        "predicted_status".into(),
        labels.to_vec(),
    ))?;
    result.with_column(Series::new(
        "default_probability".into(),
        proba.to_vec(),
    ))?;

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            CsvWriter::new(&mut file).finish(&mut result)?;
            step_ok(&format!(
                "wrote {} predictions to {}",
                result.height(),
                path.display()
            ));
        }
        None => println!("{result}"),
    }

    Ok(())
}

pub fn cmd_eda(data: &Path) -> anyhow::Result<()> {
    let df = load_csv(data)?;
    let schema = FeatureSchema::credit_default();

    // Only the base numeric columns present in the raw file
    let present: Vec<&str> = schema
        .numerical()
        .iter()
        .map(String::as_str)
        .filter(|name| df.column(name).is_ok())
        .collect();

    section("Column summaries");
    for summary in summarize(&df, &present)? {
        println!(
            "  {:28} n={:<6} missing={:>5.1}% mean={:>12.2} std={:>12.2} skew={:>6.2}",
            summary.name.bold(),
            summary.count,
            summary.missing_fraction * 100.0,
            summary.mean,
            summary.std,
            summary.skewness,
        );
    }

    let suggestions = suggest_log_transform(&df, &present)?;
    if !suggestions.is_empty() {
        section("Log-transform candidates");
        for name in suggestions {
            println!("  {name}");
        }
    }

    Ok(())
}

pub fn cmd_importance(model: &Path, top: usize) -> anyhow::Result<()> {
    let artifact = ModelArtifact::<RandomForest>::load(model)?;
    let report = artifact.pipeline.importance_report(top)?;

    section("Feature importances");
    print!("{}", report.render());
    Ok(())
}

pub fn cmd_grids() -> anyhow::Result<()> {
    let all = [
        ("random_forest", grids::random_forest_grid()),
        ("xgboost", grids::xgboost_grid()),
        ("catboost", grids::catboost_grid()),
        ("random_forest_ohe", grids::random_forest_grid_ohe()),
        ("xgboost_ohe", grids::xgboost_grid_ohe()),
        ("catboost_ohe", grids::catboost_grid_ohe()),
    ];

    section("Search grids");
    for (name, grid) in all {
        println!(
            "  {:20} {:>4} combinations over {:?}",
            name.bold(),
            grid.n_candidates(),
            grid.param_names(),
        );
    }
    Ok(())
}

pub async fn cmd_serve(model: &Path, host: &str, port: u16) -> anyhow::Result<()> {
    let artifact = ModelArtifact::<RandomForest>::load(model)?;
    let config = ServerConfig {
        host: host.to_string(),
        port,
    };
    run_server(config, artifact).await
}
