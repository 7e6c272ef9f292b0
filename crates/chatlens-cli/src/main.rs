//! Chatlens CLI
//!
//! Command-line interface for:
//! - Parsing chat exports into records (JSON, JSONL, canonical text)
//! - Activity, emoji, word, sentiment, response-time and network reports
//! - Filtering records by participant, date and topic

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chatlens_analytics::{
    daily_message_counts, hourly_heatmap, interaction_edges, mean_polarity, message_kind_counts,
    response_time_histogram, sentiment_series, top_emojis_per_user, user_activity,
    word_frequencies, AnalyticsConfig, ChatQuery, ChatSummary, DateRange, DerivedTable, WEEKDAYS,
};
use chatlens_parser::{format_timestamp, parse_chat_log_with_diagnostics, ParsedChat};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod config;
mod logging;
mod output;

use config::Config;
use output::RecordFormat;

#[derive(Parser)]
#[command(name = "chatlens")]
#[command(author, version, about = "Chatlens: chat export parser and analyzer")]
struct Cli {
    /// TOML configuration file (default: ./chatlens.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// tracing filter, e.g. `info` or `chatlens_parser=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an export and emit its records
    Parse {
        /// Input export file
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "json")]
        format: RecordFormat,
        /// Order records by timestamp (stable)
        #[arg(long)]
        sort: bool,
    },

    /// Overview: participants, time span, media share, busiest user and day
    Summary { input: PathBuf },

    /// Messages per participant, per day, and per weekday × hour
    Activity { input: PathBuf },

    /// Most used emojis per participant
    Emojis {
        input: PathBuf,
        /// Emojis per participant (default: config `top_emojis`)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Most frequent words
    Words {
        input: PathBuf,
        /// Words to list (default: config `top_words`)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Message polarity over time
    Sentiment {
        input: PathBuf,
        /// First date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Histogram of gaps between consecutive messages
    Responses {
        input: PathBuf,
        /// Number of bins (default: config `histogram_bins`)
        #[arg(long)]
        bins: Option<usize>,
    },

    /// Who replies to whom
    Network { input: PathBuf },

    /// Records matching people, dates and topics
    Filter {
        input: PathBuf,
        /// Sender substring, case-insensitive (repeatable)
        #[arg(long = "person")]
        people: Vec<String>,
        /// Calendar date YYYY-MM-DD (repeatable)
        #[arg(long = "date")]
        dates: Vec<NaiveDate>,
        /// Message substring, case-insensitive (repeatable)
        #[arg(long = "topic")]
        topics: Vec<String>,
        #[arg(long, value_enum, default_value = "json")]
        format: RecordFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    logging::init_tracing(&config.log);

    let analytics = &config.analytics;
    match cli.command {
        Commands::Parse {
            input,
            out,
            format,
            sort,
        } => cmd_parse(&input, out.as_deref(), format, sort),
        Commands::Summary { input } => cmd_summary(&input, analytics),
        Commands::Activity { input } => cmd_activity(&input, analytics),
        Commands::Emojis { input, top } => {
            cmd_emojis(&input, top.unwrap_or(analytics.top_emojis))
        }
        Commands::Words { input, top } => {
            let config = AnalyticsConfig {
                top_words: top.unwrap_or(analytics.top_words),
                ..analytics.clone()
            };
            cmd_words(&input, &config)
        }
        Commands::Sentiment { input, from, to } => cmd_sentiment(&input, from, to, analytics),
        Commands::Responses { input, bins } => {
            cmd_responses(&input, bins.unwrap_or(analytics.histogram_bins), analytics)
        }
        Commands::Network { input } => cmd_network(&input),
        Commands::Filter {
            input,
            people,
            dates,
            topics,
            format,
            out,
        } => {
            let query = ChatQuery {
                people,
                dates,
                topics,
            };
            cmd_filter(&input, &query, format, out.as_deref())
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Read and parse an export. Invalid UTF-8 is rejected, not replaced.
fn load_chat(input: &Path) -> Result<ParsedChat> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", input.display()))?;
    let parsed = parse_chat_log_with_diagnostics(&text)
        .with_context(|| format!("parsing {}", input.display()))?;
    tracing::info!(
        input = %input.display(),
        records = parsed.log.len(),
        skipped = parsed.diagnostics.skipped_count(),
        "chat loaded"
    );
    Ok(parsed)
}

fn heading(verb: &str, input: &Path) {
    println!("{} {}", verb.green().bold(), input.display());
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_parse(input: &Path, out: Option<&Path>, format: RecordFormat, sort: bool) -> Result<()> {
    let parsed = load_chat(input)?;
    let log = if sort {
        parsed.log.sorted_by_time()
    } else {
        parsed.log
    };
    output::emit(&output::render(&log, format)?, out)?;
    if let Some(path) = out {
        eprintln!("  {} {}", "→".cyan(), path.display());
        eprintln!(
            "  {} {} records, {} lines skipped",
            "→".yellow(),
            log.len(),
            parsed.diagnostics.skipped_count()
        );
    }
    Ok(())
}

fn cmd_summary(input: &Path, config: &AnalyticsConfig) -> Result<()> {
    heading("Summarizing", input);
    let parsed = load_chat(input)?;
    let summary = ChatSummary::from_log(&parsed.log, config);

    println!("  {} {} records", "→".cyan(), summary.records);
    println!(
        "  {} {} participants: {}",
        "→".cyan(),
        summary.participants.len(),
        summary.participants.join(", ")
    );
    if let (Some(first), Some(last)) = (summary.first, summary.last) {
        println!(
            "  {} {} .. {}",
            "→".cyan(),
            format_timestamp(&first),
            format_timestamp(&last)
        );
    }
    println!(
        "  {} {} text, {} media, {} multi-line, {} notices",
        "→".cyan(),
        summary.text_messages,
        summary.media_messages,
        summary.continued,
        summary.notices
    );
    if let Some(user) = &summary.busiest_user {
        println!(
            "  {} busiest user: {} ({} messages)",
            "→".yellow(),
            user.user.bold(),
            user.messages
        );
    }
    if let Some((day, count)) = summary.busiest_day {
        println!("  {} busiest day: {} ({} records)", "→".yellow(), day, count);
    }

    let skipped = parsed.diagnostics.skipped_count();
    if skipped > 0 {
        println!(
            "  {} {} of {} lines skipped",
            "!".red().bold(),
            skipped,
            parsed.diagnostics.lines_scanned
        );
        for line in parsed.diagnostics.skipped.iter().take(5) {
            println!("      line {}: {}", line.line_no, line.reason);
        }
    }
    Ok(())
}

fn cmd_activity(input: &Path, config: &AnalyticsConfig) -> Result<()> {
    heading("Activity", input);
    let log = load_chat(input)?.log;

    println!("{}", "Messages per participant".bold());
    for row in user_activity(&log) {
        println!("  {} {:<24} {:>6}", "→".cyan(), row.user, row.messages);
    }

    println!("{}", "Messages per day".bold());
    for (day, count) in daily_message_counts(&log) {
        println!("  {} {} {:>6}", "→".cyan(), day, count);
    }

    let table = DerivedTable::compute(&log, config);
    let kinds = message_kind_counts(&table);
    println!("{}", "Message kinds".bold());
    println!(
        "  {} text {} ({:.1}%), media {} ({:.1}%)",
        "→".cyan(),
        kinds.text,
        kinds.text_share(),
        kinds.media,
        kinds.media_share()
    );

    let heatmap = hourly_heatmap(&log);
    println!("{}", "Weekday × hour".bold());
    let hours: String = (0..24).map(|h| format!("{h:>3}")).collect();
    println!("      {hours}");
    for weekday in WEEKDAYS {
        let cells: String = heatmap
            .row(weekday)
            .iter()
            .map(|c| format!("{c:>3}"))
            .collect();
        println!("  {weekday}{cells}");
    }
    if let Some((weekday, hour, count)) = heatmap.peak() {
        println!(
            "  {} peak: {} {:02}:00 ({} records)",
            "→".yellow(),
            weekday,
            hour,
            count
        );
    }
    Ok(())
}

fn cmd_emojis(input: &Path, top: usize) -> Result<()> {
    heading("Emojis", input);
    let log = load_chat(input)?.log;
    let ranking = top_emojis_per_user(&log, top);
    if ranking.is_empty() {
        println!("  {} no emojis", "→".yellow());
    }
    for user in ranking {
        let top: Vec<String> = user
            .top
            .iter()
            .map(|e| format!("{} ×{}", e.emoji, e.count))
            .collect();
        println!("  {} {}: {}", "→".cyan(), user.user.bold(), top.join("  "));
    }
    Ok(())
}

fn cmd_words(input: &Path, config: &AnalyticsConfig) -> Result<()> {
    heading("Words", input);
    let log = load_chat(input)?.log;
    for word in word_frequencies(&log, config) {
        println!("  {} {:<20} {:>6}", "→".cyan(), word.word, word.count);
    }
    Ok(())
}

fn cmd_sentiment(
    input: &Path,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    config: &AnalyticsConfig,
) -> Result<()> {
    heading("Sentiment", input);
    let log = load_chat(input)?.log;

    let range = match (from, to) {
        (None, None) => None,
        (from, to) => {
            let (first, last) = log.span().map(|(f, l)| (f.date(), l.date())).unzip();
            let start = from.or(first).unwrap_or(NaiveDate::MIN);
            let end = to.or(last).unwrap_or(NaiveDate::MAX);
            Some(DateRange::new(start, end)?)
        }
    };

    let table = DerivedTable::compute(&log, config);
    let series = sentiment_series(&log, &table, range);
    for point in &series {
        let polarity = format!("{:+.2}", point.polarity);
        let polarity = if point.polarity > 0.0 {
            polarity.green()
        } else if point.polarity < 0.0 {
            polarity.red()
        } else {
            polarity.normal()
        };
        println!(
            "  {} {} {}",
            "→".cyan(),
            format_timestamp(&point.timestamp),
            polarity
        );
    }
    match mean_polarity(&series) {
        Some(mean) => println!(
            "  {} mean polarity {:+.3} over {} messages",
            "→".yellow(),
            mean,
            series.len()
        ),
        None => println!("  {} no messages in range", "→".yellow()),
    }
    Ok(())
}

fn cmd_responses(input: &Path, bins: usize, config: &AnalyticsConfig) -> Result<()> {
    heading("Response times", input);
    let log = load_chat(input)?.log;
    let table = DerivedTable::compute(&log, config);
    let histogram = response_time_histogram(&table, bins)?;
    if histogram.is_empty() {
        println!("  {} fewer than two messages", "→".yellow());
        return Ok(());
    }
    let widest = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &histogram.bins {
        let bar = "#".repeat(bin.count * 40 / widest);
        println!(
            "  {:>9.1} - {:<9.1} min {:>6} {}",
            bin.lower,
            bin.upper,
            bin.count,
            bar.cyan()
        );
    }
    println!(
        "  {} {} gaps, bin width {:.2} min",
        "→".yellow(),
        histogram.total(),
        histogram.bin_width_minutes
    );
    Ok(())
}

fn cmd_network(input: &Path) -> Result<()> {
    heading("Interactions", input);
    let log = load_chat(input)?.log;
    let edges = interaction_edges(&log);
    if edges.is_empty() {
        println!("  {} no interactions", "→".yellow());
    }
    for edge in edges {
        println!(
            "  {} {} → {} {:>6}",
            "→".cyan(),
            edge.from.bold(),
            edge.to.bold(),
            edge.count
        );
    }
    Ok(())
}

fn cmd_filter(
    input: &Path,
    query: &ChatQuery,
    format: RecordFormat,
    out: Option<&Path>,
) -> Result<()> {
    let log = load_chat(input)?.log;
    let hits = query.apply(&log);
    output::emit(&output::render(&hits, format)?, out)?;
    if let Some(path) = out {
        eprintln!("  {} {}", "→".cyan(), path.display());
        eprintln!(
            "  {} {} of {} records matched",
            "→".yellow(),
            hits.len(),
            log.len()
        );
    }
    Ok(())
}
