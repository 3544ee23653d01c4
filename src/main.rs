use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use podgen::{
    GenerateOptions, Id3Reader, NoopReporter, ProgressEvent, ProgressReporter, PubDateMode,
    SharedProgressReporter, generate_feed,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static TAG: Emoji<'_, '_> = Emoji("🏷️  ", "[t] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Generate a podcast RSS feed from a directory of audio files
#[derive(Parser, Debug)]
#[command(name = "podgen")]
#[command(about = "Generate a podcast RSS feed from a directory of audio files")]
#[command(version)]
struct Args {
    /// Directory containing the .mp3 files; the feed is written into it
    input_dir: PathBuf,

    /// Indent the generated XML
    #[arg(short, long)]
    pretty: bool,

    /// Channel title (defaults to the directory name)
    #[arg(short, long)]
    title: Option<String>,

    /// Base URL the directory is served under
    #[arg(short, long)]
    base_url: Option<String>,

    /// TOML file with channel and iTunes settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host name serving the directory (defaults to the system host name)
    #[arg(long)]
    host: Option<String>,

    /// User whose public_html serves the directory
    #[arg(long, env = "USER")]
    user: Option<String>,

    /// Use one-day-apart publication dates in file name order
    #[arg(long)]
    sequential_dates: bool,

    /// Quiet mode - only print the feed URL
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log informational messages
    #[arg(short, long)]
    verbose: bool,
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    multi: MultiProgress,
    main_bar: ProgressBar,
    files_bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifReporter {
    fn new() -> Self {
        let multi = MultiProgress::new();

        let main_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = multi.add(ProgressBar::new_spinner());
        main_bar.set_style(main_style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            main_bar,
            files_bar: Mutex::new(None),
        }
    }

    fn files_bar(&self, total: usize) -> ProgressBar {
        let mut slot = self.files_bar.lock().unwrap();

        if let Some(bar) = slot.as_ref() {
            return bar.clone();
        }

        let style = ProgressStyle::default_bar()
            .template(&format!("  {TAG}[{{bar:30.cyan/blue}}] {{pos}}/{{len}} {{wide_msg}}"))
            .unwrap()
            .progress_chars("█▓░");

        let bar = self.multi.add(ProgressBar::new(total as u64));
        bar.set_style(style);
        *slot = Some(bar.clone());
        bar
    }

    fn finish_files_bar(&self) {
        if let Some(bar) = self.files_bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::ScanningDirectory { path } => {
                self.main_bar.set_message(format!(
                    "{SEARCH}Scanning {}",
                    path.display().to_string().cyan()
                ));
            }

            ProgressEvent::ScanCompleted { eligible_files } => {
                self.main_bar.set_message(format!(
                    "{SEARCH}{} audio files found",
                    eligible_files.to_string().cyan()
                ));
            }

            ProgressEvent::ReadingTags {
                file_name,
                index,
                total,
            } => {
                let bar = self.files_bar(total);
                bar.set_position(index as u64 + 1);
                bar.set_message(truncate_title(&file_name, 40));
            }

            ProgressEvent::TagsUnavailable { file_name, error } => {
                self.multi
                    .println(format!(
                        "  {WARNING}{} - {}",
                        truncate_title(&file_name, 30).yellow(),
                        error.dimmed()
                    ))
                    .ok();
            }

            ProgressEvent::FileSkipped { file_name, error } => {
                self.multi
                    .println(format!(
                        "  {CROSS}{} - {}",
                        truncate_title(&file_name, 30).red(),
                        error.red()
                    ))
                    .ok();
            }

            ProgressEvent::NoEpisodesFound {
                path,
                skipped_files,
            } => {
                let message = if skipped_files == 0 {
                    "No .mp3 files found in".to_string()
                } else {
                    format!("All {skipped_files} .mp3 files were skipped in")
                };
                self.multi
                    .println(format!("{WARNING}{} {}", message.yellow(), path.display()))
                    .ok();
            }

            ProgressEvent::FeedWritten {
                path, item_count, ..
            } => {
                self.finish_files_bar();
                self.main_bar.finish_and_clear();
                println!(
                    "\n{SUCCESS}{} {} episodes",
                    "Feed written:".bold().green(),
                    item_count.to_string().green().bold(),
                );
                println!("{FOLDER}{}", path.display().to_string().cyan());
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let truncated: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podgen".bold().magenta(),
            "- Podcast Feed Generator".dimmed()
        );
    }

    let options = GenerateOptions {
        title: args.title.clone(),
        base_url: args.base_url.clone(),
        host: args.host.clone(),
        user: args.user.clone(),
        config_file: args.config.clone(),
        pretty: args.pretty,
        pub_dates: if args.sequential_dates {
            PubDateMode::Sequential
        } else {
            PubDateMode::Modified
        },
    };

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let result = generate_feed(&Id3Reader, &args.input_dir, &options, reporter)
        .inspect_err(|e| tracing::error!(error = %e, "Feed generation failed"))
        .context("Failed to generate feed")?;

    if !args.quiet && !result.skipped_files.is_empty() {
        println!("\n{}", "Skipped files:".red().bold());
        for (file_name, error) in &result.skipped_files {
            println!(
                "  {}{} - {}",
                CROSS,
                file_name.yellow(),
                error.to_string().dimmed()
            );
        }
        println!();
    }

    println!("{}", result.feed_url);

    Ok(())
}
