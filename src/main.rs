use paradiff::config::Config;
use paradiff::diff::{DiffType, calculate_stats, compare_files, group_into_rows, likely_rewrites};
use paradiff::session::Session;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: paradiff <source> <target> [--accept-all]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut accept_all = false;
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--accept-all" {
            accept_all = true;
        } else {
            paths.push(PathBuf::from(arg));
        }
    }

    let [source, target] = paths.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(1);
    };

    match run(source, target, accept_all) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}

fn run(source: &Path, target: &Path, accept_all: bool) -> paradiff::Result<()> {
    let config = Config::default();
    let comparison = compare_files(source, target, config.normalize_options())?;

    let summary = comparison.diffs.summary;
    println!(
        "{} entries: {} added, {} removed, {} unchanged",
        summary.total, summary.added, summary.removed, summary.unchanged
    );
    for entry in &comparison.diffs.entries {
        let prefix = match entry.diff_type {
            DiffType::Added => '+',
            DiffType::Removed => '-',
            DiffType::Unchanged => ' ',
        };
        for line in entry.content.lines() {
            println!("{} {}", prefix, line);
        }
    }

    let rows = group_into_rows(&comparison.diffs.entries);
    let rewrites = likely_rewrites(&rows, config.settings.rewrite_similarity);
    let stats = calculate_stats(&rows);
    println!(
        "{} likely rewrites, +{} -{} characters",
        rewrites.len(),
        stats.added_chars,
        stats.removed_chars
    );

    if accept_all {
        let mut session =
            Session::new(comparison).with_anchor_position(config.settings.anchor_position);
        let accepted = session.accept_all()?;
        session.save(source, target)?;
        println!("Applied {} replacements to {}", accepted, target.display());
    }

    Ok(())
}
