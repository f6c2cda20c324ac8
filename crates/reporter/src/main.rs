//! Offline analysis runner.
//!
//! Reads an analysis request (JSON) from a file argument or stdin, runs
//! the classification and accuracy pass, and prints the analysis: the
//! annotated tree in flat transport form plus the rendered PGN.

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::info;

use chess_core::Game;
use reporter::classify::AnalysisOptions;
use reporter::config::ReporterConfig;
use reporter::report::{game_analysis, EstimatedRatings};
use reporter::Accuracies;
use state_tree::{build_state_tree, flatten, render_state_tree, restore, FlatStateTree};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest {
    game: Game,
    /// A pre-built tree (with engine lines attached). When absent, the
    /// tree is built from the game's PGN instead.
    #[serde(default)]
    flat_tree: Option<FlatStateTree>,
    #[serde(default)]
    options: Option<AnalysisOptions>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisResponse {
    state_tree: FlatStateTree,
    accuracies: Accuracies,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_ratings: Option<EstimatedRatings>,
    pgn: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let _ = dotenvy::dotenv();

    let config = ReporterConfig::load();
    let book = config.load_book();

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let request: AnalysisRequest = serde_json::from_str(&raw)?;

    let tree = match request.flat_tree {
        Some(flat) => restore(flat)?,
        None => build_state_tree(&request.game)?,
    };
    info!(nodes = tree.len(), "state tree ready");

    let options = request.options.unwrap_or_else(|| config.options());
    let analysis = game_analysis(tree, &book, &options);

    info!(
        white_accuracy = analysis.accuracies.white,
        black_accuracy = analysis.accuracies.black,
        "analysis complete"
    );

    let response = AnalysisResponse {
        pgn: render_state_tree(&analysis.tree, Some(&request.game)),
        state_tree: flatten(&analysis.tree),
        accuracies: analysis.accuracies,
        estimated_ratings: analysis.estimated_ratings,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
