mod clean;
mod combine;
mod error;
mod filter;
mod io;
mod sample;
mod settings;
mod split;
mod titles;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(name = "jobprep", about = "Batch cleanup for job-posting URL and metadata files")]
struct Cli {
    /// Settings file (default: ./jobprep.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop CSV rows whose URL contains a blocked substring
    Filter {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Keep the first URL seen for each hostname
    Sample {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Extract job titles from marker segments in URL paths
    Titles {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Number records 1..=k instead of by source line
        #[arg(long)]
        dense_ids: bool,
    },
    /// Concatenate the per-part metadata files in configured order
    Combine {
        #[arg(long)]
        input_dir: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Separate failed-fetch records from normal metadata
    Clean {
        #[arg(long)]
        input_dir: Option<PathBuf>,
        #[arg(long)]
        normal_output: Option<PathBuf>,
        #[arg(long)]
        error_output: Option<PathBuf>,
    },
    /// Split one JSON array into N near-equal chunk files
    Split {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Number of output files
        #[arg(short = 'n', long)]
        parts: Option<usize>,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = settings::load(cli.config.as_deref())?;
    debug!(settings = ?settings, "Loaded settings");

    match cli.command {
        Commands::Filter { input, output } => {
            let s = &mut settings.filter;
            override_path(&mut s.input, input);
            override_path(&mut s.output, output);
            let stats = filter::run(s)?;
            println!(
                "Cleaned file written to {} ({} kept, {} dropped)",
                s.output.display(),
                stats.kept,
                stats.dropped
            );
        }
        Commands::Sample { input, output } => {
            let s = &mut settings.sample;
            override_path(&mut s.input, input);
            override_path(&mut s.output, output);
            let stats = sample::run(s)?;
            println!(
                "Wrote {} unique domains to {} ({} skipped)",
                stats.unique,
                s.output.display(),
                stats.skipped
            );
        }
        Commands::Titles {
            input,
            output,
            dense_ids,
        } => {
            let s = &mut settings.titles;
            override_path(&mut s.input, input);
            override_path(&mut s.output, output);
            s.dense_ids |= dense_ids;
            let stats = titles::run(s)?;
            println!(
                "Wrote {} records to {} ({} skipped)",
                stats.written,
                s.output.display(),
                stats.skipped
            );
        }
        Commands::Combine { input_dir, output } => {
            let s = &mut settings.combine;
            override_path(&mut s.input_dir, input_dir);
            override_path(&mut s.output, output);
            let stats = combine::run(s)?;
            println!(
                "Done. Total records: {} ({} files merged, {} skipped)",
                stats.records, stats.merged, stats.skipped
            );
        }
        Commands::Clean {
            input_dir,
            normal_output,
            error_output,
        } => {
            let s = &mut settings.clean;
            override_path(&mut s.input_dir, input_dir);
            override_path(&mut s.normal_output, normal_output);
            override_path(&mut s.error_output, error_output);
            let stats = clean::run(s)?;
            println!(
                "Normal: {} -> {}",
                stats.normal,
                s.normal_output.display()
            );
            println!("Errors: {} -> {}", stats.errors, s.error_output.display());
            println!(
                "Files:  {} processed, {} skipped",
                stats.files_processed, stats.files_skipped
            );
            if stats.write_failures > 0 {
                println!("Writes failed: {}", stats.write_failures);
            }
        }
        Commands::Split {
            input,
            output_dir,
            parts,
        } => {
            let s = &mut settings.split;
            override_path(&mut s.input, input);
            override_path(&mut s.output_dir, output_dir);
            if let Some(n) = parts {
                s.parts = n;
            }
            let stats = split::run(s)?;
            println!(
                "Done. {} objects divided into {} files under {}",
                stats.total,
                stats.files,
                s.output_dir.display()
            );
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn override_path(slot: &mut PathBuf, value: Option<PathBuf>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn durations_roll_over_to_hours() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(7503)), "2h 5m 3s");
    }
}
