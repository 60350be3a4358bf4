//! Command-line front end for the vertexwise discovery/extraction core.
//!
//! Presentation only: every command resolves a location, runs one synchronous
//! unit of work against the library crates, and prints the plain-data result.

mod progress;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use progress::FetchProgress;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use vertexwise_repository::{
    repository_for, resolve_location, terms_for, ModelKey, RepoFormat, Repository,
};
use vertexwise_stats::{cluster_stats, compute_overlap, extract, OverlapCategory};
use vertexwise_surface::{Hemisphere, MghDecoder};

#[derive(Parser)]
#[command(name = "vertexwise", version, about = "Explore vertex-wise surface statistics")]
struct Cli {
    /// Emit JSON instead of human-readable tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RepoOpts {
    /// Local results directory or GitHub folder URL
    /// (https://github.com/user/repo/tree/branch/path)
    #[arg(long)]
    location: String,

    /// Directory layout convention: verywise or qdecr
    #[arg(long, default_value = "verywise")]
    format: String,
}

#[derive(Args)]
struct MapOpts {
    /// Model selector, group/model
    #[arg(long)]
    model: String,

    /// Stack (term) id
    #[arg(long)]
    term: u32,

    /// Surface measure, e.g. thickness
    #[arg(long)]
    measure: String,
}

#[derive(Subcommand)]
enum Command {
    /// List groups, models and (hemisphere, measure) pairs
    Scan {
        #[command(flatten)]
        repo: RepoOpts,
    },
    /// List the statistical terms available for a model/measure
    Terms {
        #[command(flatten)]
        repo: RepoOpts,
        #[arg(long)]
        model: String,
        #[arg(long)]
        measure: String,
    },
    /// Extract cluster counts and global beta statistics
    Extract {
        #[command(flatten)]
        repo: RepoOpts,
        #[command(flatten)]
        map: MapOpts,
    },
    /// Per-cluster size / mean / min / max of masked betas
    Clusters {
        #[command(flatten)]
        repo: RepoOpts,
        #[command(flatten)]
        map: MapOpts,
    },
    /// Overlap between two maps, each given as group/model:term:measure
    Overlap {
        #[command(flatten)]
        repo: RepoOpts,
        #[arg(long)]
        first: String,
        #[arg(long)]
        second: String,
    },
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan { repo } => {
            let repository = open(&repo)?;
            print_scan(&repository, cli.json)
        }
        Command::Terms {
            repo,
            model,
            measure,
        } => {
            let repository = open(&repo)?;
            let key = ModelKey::from_str(&model)?;
            let terms = terms_for(&repository, &key, &measure)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&terms)?);
            } else {
                for (id, label) in &terms {
                    println!("{id}\t{label}");
                }
            }
            Ok(())
        }
        Command::Extract { repo, map } => {
            let repository = open(&repo)?;
            let key = ModelKey::from_str(&map.model)?;
            let result = extract(&repository, &key, map.term, &map.measure, &MghDecoder)?;
            let report = ExtractReport {
                model: key.to_string(),
                term: map.term,
                measure: map.measure,
                cluster_count_left: result.cluster_counts.left,
                cluster_count_right: result.cluster_counts.right,
                global_min_beta: nullable(result.global_min_beta),
                global_max_beta: nullable(result.global_max_beta),
                global_mean_beta: nullable(result.global_mean_beta),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} term {} ({}): {} left / {} right cluster(s)",
                    report.model,
                    report.term,
                    report.measure,
                    report.cluster_count_left,
                    report.cluster_count_right
                );
                println!(
                    "beta range [{}, {}], mean {}",
                    fmt_stat(result.global_min_beta),
                    fmt_stat(result.global_max_beta),
                    fmt_stat(result.global_mean_beta)
                );
            }
            Ok(())
        }
        Command::Clusters { repo, map } => {
            let repository = open(&repo)?;
            let key = ModelKey::from_str(&map.model)?;
            let result = extract(&repository, &key, map.term, &map.measure, &MghDecoder)?;
            let rows = cluster_stats(&result.cluster_labels, &result.masked_betas)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("hemi\tcluster\tsize\tmean\tmin\tmax");
                let mut last_hemi: Option<Hemisphere> = None;
                for row in &rows {
                    if last_hemi.is_some() && last_hemi != Some(row.hemisphere) {
                        println!();
                    }
                    last_hemi = Some(row.hemisphere);
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}",
                        row.hemisphere,
                        row.cluster_id,
                        row.size,
                        fmt_stat(row.mean_beta),
                        fmt_stat(row.min_beta),
                        fmt_stat(row.max_beta)
                    );
                }
            }
            Ok(())
        }
        Command::Overlap {
            repo,
            first,
            second,
        } => {
            let repository = open(&repo)?;
            let first = Selection::from_str(&first)?;
            let second = Selection::from_str(&second)?;

            let a = extract(&repository, &first.key, first.term, &first.measure, &MghDecoder)?;
            let b = extract(&repository, &second.key, second.term, &second.measure, &MghDecoder)?;
            let (summary, _map) = compute_overlap(&a.cluster_labels, &b.cluster_labels)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for (category, label) in [
                    (OverlapCategory::OnlyFirst, "only first"),
                    (OverlapCategory::OnlySecond, "only second"),
                    (OverlapCategory::Both, "both"),
                ] {
                    let share = summary.share(category);
                    println!(
                        "{} ({}): {} vertices, {:.1}%",
                        label,
                        category.code(),
                        share.count,
                        share.percent
                    );
                }
            }
            Ok(())
        }
    }
}

fn open(opts: &RepoOpts) -> Result<std::sync::Arc<Repository>> {
    let format = RepoFormat::from_str(&opts.format)?;
    let local: PathBuf = resolve_location(&opts.location, &FetchProgress::new())?;
    Ok(repository_for(&local, format)?)
}

/// One side of an overlap comparison: `group/model:term:measure`.
struct Selection {
    key: ModelKey,
    term: u32,
    measure: String,
}

impl FromStr for Selection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let &[model, term, measure] = &parts[..] else {
            bail!("'{s}' is not of the form group/model:term:measure");
        };
        Ok(Selection {
            key: ModelKey::from_str(model)?,
            term: term.parse()?,
            measure: measure.to_string(),
        })
    }
}

#[derive(Serialize)]
struct ExtractReport {
    model: String,
    term: u32,
    measure: String,
    cluster_count_left: u32,
    cluster_count_right: u32,
    global_min_beta: Option<f32>,
    global_max_beta: Option<f32>,
    global_mean_beta: Option<f32>,
}

fn print_scan(repository: &Repository, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(repository)?);
        return Ok(());
    }

    for (group, index) in &repository.groups {
        println!("{group}/");
        for (model, entry) in &index.models {
            println!("  {model}");
            for (hemi, measure) in &entry.pairs {
                println!("    {hemi}\t{measure}");
            }
        }
    }
    Ok(())
}

/// NaN means "no significant vertex anywhere"; serialize it as null.
fn nullable(value: f32) -> Option<f32> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

fn fmt_stat(value: f32) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parses_model_term_measure() {
        let sel = Selection::from_str("grp/m1:3:thickness").expect("selection");
        assert_eq!(sel.key, ModelKey::new("grp", "m1"));
        assert_eq!(sel.term, 3);
        assert_eq!(sel.measure, "thickness");
    }

    #[test]
    fn malformed_selections_are_rejected() {
        assert!(Selection::from_str("grp/m1:thickness").is_err());
        assert!(Selection::from_str("m1:3:thickness").is_err());
        assert!(Selection::from_str("grp/m1:x:thickness").is_err());
    }
}
