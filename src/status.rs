// System status display: shows artifact inventory and the latest tracked run.

use std::fs;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::model::artifacts;
use crate::tracking::file::latest_run;

/// Display system status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    println!("Dataset:");
    for (what, path) in [("fake", &config.fake_csv), ("real", &config.real_csv)] {
        println!("  {what}: {}", describe_file(path));
    }

    let paths = config.artifact_paths();
    println!("\nArtifacts in {}:", config.model_dir.display());
    println!("  vectorizer: {}", describe_file(&paths.vectorizer));
    println!("  model:      {}", describe_file(&paths.model));

    if paths.both_present() {
        match artifacts::load(&config.model_dir) {
            Ok((vectorizer, model)) => {
                println!(
                    "  Vocabulary: {} terms ({}-grams, fitted on {} documents)",
                    vectorizer.vocabulary_len(),
                    vectorizer.params().ngram_label(),
                    vectorizer.n_documents()
                );
                println!(
                    "  Solver: {} iterations{}",
                    model.n_iter(),
                    if model.converged() { "" } else { " (not converged)" }
                );
            }
            Err(e) => {
                println!("  {} {e:#}", "Unusable:".red());
            }
        }
    } else {
        println!("  Run `fakenews train` to create them");
    }

    println!("\nDecision threshold: {:.2}", config.threshold);

    match latest_run(&config.tracking_dir, &config.experiment)? {
        Some(run) => {
            println!(
                "\nLast run ({}): {} [{}] started {}",
                config.experiment,
                run.meta.run_id,
                run.meta.status.as_str(),
                run.meta.started_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            for (key, value) in &run.metrics {
                println!("  {key}: {value:.4}");
            }
        }
        None => {
            println!("\nLast run: never");
        }
    }

    Ok(())
}

fn describe_file(path: &Path) -> String {
    match fs::metadata(path) {
        Ok(meta) => format!("{} ({})", path.display(), format_bytes(meta.len())),
        Err(_) => format!("{} (missing)", path.display()),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
