//! Credit-risk CLI entry point

use clap::Parser;
use credit_risk::cli::{
    cmd_eda, cmd_grids, cmd_importance, cmd_predict, cmd_serve, cmd_train, Cli, Commands,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credit_risk=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            trees,
            seed,
            one_hot,
            output,
        } => cmd_train(&data, trees, seed, one_hot, &output)?,
        Commands::Predict {
            model,
            data,
            output,
        } => cmd_predict(&model, &data, output.as_deref())?,
        Commands::Eda { data } => cmd_eda(&data)?,
        Commands::Importance { model, top } => cmd_importance(&model, top)?,
        Commands::Grids => cmd_grids()?,
        Commands::Serve { model, host, port } => cmd_serve(&model, &host, port).await?,
    }

    Ok(())
}
