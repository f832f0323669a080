mod render;

use analytics::{
    available_tags, emotion_breakdown, AnalyticsEngine, EmotionCount, PerformanceReport, TagFilter,
};
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use configuration::{init_tracing, load_config, GoalDefaults, OutputFormat};
use core_types::{Emotion, Trade};
use ingest::CsvImporter;
use journal::{Account, AccountBook, AnnotationEdit, GoalProgress, Goals, JsonStore, View};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// The main entry point for the TradePulse journal.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the config layers have defaults.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging)?;

    let app = App {
        store: JsonStore::new(&config.storage.path),
        engine: AnalyticsEngine::new(),
        format: cli.format.unwrap_or(config.display.format),
        utc_offset_minutes: config.ingest.utc_offset_minutes,
        default_goals: goals_from_defaults(&config.goals),
        block_hours: config.display.heatmap_block_hours,
    };

    match cli.command {
        Commands::Import(args) => handle_import(&app, args),
        Commands::Accounts => handle_accounts(&app),
        Commands::Report(args) => handle_report(&app, args),
        Commands::Trades(args) => handle_trades(&app, args),
        Commands::Journal(args) => handle_journal(&app, args),
        Commands::Goals(args) => handle_goals(&app, args),
        Commands::Tags(args) => handle_tags(&app, args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A trading journal: import closed trades and analyse their performance.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults to `config.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format, overriding `display.format`.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a CSV export of closed trades as a new account.
    Import(ImportArgs),
    /// List imported accounts.
    Accounts,
    /// Show the performance report for an account or the whole portfolio.
    Report(ReportArgs),
    /// List trades with their running balance, or show one trade's journal.
    Trades(TradesArgs),
    /// Attach notes, emotions and tags to a trade.
    Journal(JournalArgs),
    /// Show or set the performance goals of an account.
    Goals(GoalsArgs),
    /// List the tags in use.
    Tags(ViewArgs),
}

#[derive(Args)]
struct ImportArgs {
    /// The CSV file to import.
    #[arg(required_unless_present = "sample")]
    file: Option<PathBuf>,

    /// Import the bundled sample history instead of a file.
    #[arg(long, conflicts_with = "file")]
    sample: bool,

    /// Account name. Defaults to `Account N`.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args)]
struct ViewArgs {
    /// Account name or id. Defaults to the whole portfolio.
    #[arg(long, conflicts_with = "portfolio")]
    account: Option<String>,

    /// Merge every account into one report.
    #[arg(long)]
    portfolio: bool,
}

impl ViewArgs {
    fn view(&self) -> View {
        match &self.account {
            Some(selector) if !self.portfolio => View::Account(selector.clone()),
            _ => View::Portfolio,
        }
    }
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Only include trades carrying this tag. Repeat to require several.
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Shorthand for `--format json`.
    #[arg(long)]
    json: bool,

    /// Width of the intraday heatmap blocks in hours.
    #[arg(long)]
    block_hours: Option<u32>,
}

#[derive(Args)]
struct TradesArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Only list trades carrying this tag. Repeat to require several.
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Show the full journal of this ticket instead of the list.
    #[arg(long)]
    ticket: Option<i64>,
}

#[derive(Args)]
struct JournalArgs {
    /// Account name or id.
    account: String,

    /// Ticket number of the trade.
    ticket: i64,

    /// Free-text journal entry. An empty value removes it.
    #[arg(long, conflicts_with = "clear_note")]
    note: Option<String>,

    /// Remove the journal entry.
    #[arg(long)]
    clear_note: bool,

    /// Emotion before entering the trade.
    #[arg(long, conflicts_with = "clear_before")]
    before: Option<Emotion>,

    /// Remove the emotion recorded before the trade.
    #[arg(long)]
    clear_before: bool,

    /// Emotion after closing the trade.
    #[arg(long, conflicts_with = "clear_after")]
    after: Option<Emotion>,

    /// Remove the emotion recorded after the trade.
    #[arg(long)]
    clear_after: bool,

    /// Add a tag. Repeatable.
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Remove a tag. Repeatable.
    #[arg(long = "untag")]
    untags: Vec<String>,

    /// Notes on the news around the trade. An empty value removes them.
    #[arg(long, conflicts_with = "clear_news")]
    news: Option<String>,

    /// Remove the news notes.
    #[arg(long)]
    clear_news: bool,
}

#[derive(Args)]
struct GoalsArgs {
    /// Account name or id.
    account: String,

    /// Total profit target.
    #[arg(long)]
    profit: Option<Decimal>,

    /// Win rate target in percent.
    #[arg(long)]
    win_rate: Option<Decimal>,

    /// Maximum drawdown limit in percent.
    #[arg(long)]
    max_drawdown: Option<Decimal>,

    /// Remove every goal before applying the ones given.
    #[arg(long)]
    clear: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

struct App {
    store: JsonStore,
    engine: AnalyticsEngine,
    format: OutputFormat,
    utc_offset_minutes: i32,
    default_goals: Goals,
    block_hours: u32,
}

fn goals_from_defaults(defaults: &GoalDefaults) -> Goals {
    Goals {
        total_profit: defaults.total_profit,
        win_rate: defaults.win_rate,
        max_drawdown_pct: defaults.max_drawdown_pct,
    }
}

fn handle_import(app: &App, args: ImportArgs) -> anyhow::Result<()> {
    let importer = CsvImporter::with_utc_offset_minutes(app.utc_offset_minutes)?;
    let trades = match &args.file {
        Some(path) if !args.sample => importer
            .parse_file(path)
            .with_context(|| format!("Failed to import {}", path.display()))?,
        _ => ingest::sample_trades(&importer)?,
    };

    let book = app.store.load()?;
    let name = args
        .name
        .unwrap_or_else(|| book.next_account_name(args.sample));
    let account = Account::new(name, trades, app.default_goals.clone());
    let summary = format!(
        "Imported {} trades into '{}' ({})",
        account.trades.len(),
        account.name,
        account.id
    );

    let book = book.with_account(account);
    app.store.save(&book)?;
    println!("{summary}");
    Ok(())
}

fn handle_accounts(app: &App) -> anyhow::Result<()> {
    let book = app.store.load()?;
    let reports: Vec<PerformanceReport> = book
        .accounts()
        .iter()
        .map(|a| a.report(&app.engine))
        .collect();

    match app.format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct AccountSummary<'a> {
                id: String,
                name: &'a str,
                trades: usize,
                total_profit: Decimal,
                win_rate: Decimal,
            }
            let summaries: Vec<AccountSummary> = book
                .accounts()
                .iter()
                .zip(&reports)
                .map(|(a, r)| AccountSummary {
                    id: a.id.to_string(),
                    name: &a.name,
                    trades: r.total_trades,
                    total_profit: r.total_profit,
                    win_rate: r.win_rate,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Table => {
            if book.is_empty() {
                println!("No accounts yet. Run `tradepulse import <file>` or `tradepulse import --sample`.");
            } else {
                println!("{}", render::accounts(book.accounts(), &reports));
            }
        }
    }
    Ok(())
}

/// Everything `report --format json` prints.
#[derive(Serialize)]
struct ReportOutput<'a> {
    filter: &'a BTreeSet<String>,
    available_tags: BTreeSet<String>,
    report: &'a PerformanceReport,
    emotions: Vec<EmotionCount>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    goals: Vec<GoalProgress>,
}

fn handle_report(app: &App, args: ReportArgs) -> anyhow::Result<()> {
    let block_hours = args.block_hours.unwrap_or(app.block_hours);
    if block_hours == 0 || 24 % block_hours != 0 {
        bail!("--block-hours must divide 24, got {block_hours}");
    }

    let book = app.store.load()?;
    let view = args.view.view();
    let filter = TagFilter::new(args.tags);
    let base = book.report(&app.engine, &view, &TagFilter::default())?;
    let report = filter.apply(&app.engine, &base);
    let emotions = emotion_breakdown(&report.trades);
    let goals = match &view {
        View::Account(selector) => book.find(selector)?.goals.progress(&report),
        View::Portfolio => Vec::new(),
    };

    if args.json || app.format == OutputFormat::Json {
        let output = ReportOutput {
            filter: filter.tags(),
            available_tags: available_tags(&base),
            report: &report,
            emotions,
            goals,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", view_title(&book, &view)?);
    if !filter.is_empty() {
        let tags: Vec<&str> = filter.tags().iter().map(String::as_str).collect();
        println!("Filtered by tags: {}", tags.join(", "));
    }
    println!("{}", render::summary(&report));
    if report.total_trades == 0 {
        return Ok(());
    }
    println!("{}", render::symbols(&report));
    println!("{}", render::weekdays(&report));
    println!("{}", render::intraday(&report, block_hours));
    println!("{}", render::periods("Week", &report.weekly));
    println!("{}", render::periods("Month", &report.monthly));
    println!("{}", render::periods("Year", &report.yearly));
    if emotions.iter().any(|e| e.before + e.after > 0) {
        println!("{}", render::emotions(&emotions));
    }
    if !goals.is_empty() {
        println!("{}", render::goals(&goals));
    }
    Ok(())
}

fn view_title(book: &AccountBook, view: &View) -> anyhow::Result<String> {
    Ok(match view {
        View::Account(selector) => format!("Account: {}", book.find(selector)?.name),
        View::Portfolio => format!("Portfolio: {} accounts", book.accounts().len()),
    })
}

fn handle_trades(app: &App, args: TradesArgs) -> anyhow::Result<()> {
    let book = app.store.load()?;
    let view = args.view.view();
    let report = book.report(&app.engine, &view, &TagFilter::new(args.tags))?;

    if let Some(ticket) = args.ticket {
        // Tickets are only unique per account, so a portfolio view may hold several.
        let matching: Vec<&Trade> = report
            .trades
            .iter()
            .filter(|t| t.ticket == ticket)
            .collect();
        if matching.is_empty() {
            bail!("No trade #{ticket} in this view");
        }
        match app.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matching)?),
            OutputFormat::Table => {
                for trade in matching {
                    println!("{}", render::trade_detail(trade));
                }
            }
        }
        return Ok(());
    }

    match app.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.trades)?),
        OutputFormat::Table => {
            println!("{}", view_title(&book, &view)?);
            println!("{}", render::trades(&report));
        }
    }
    Ok(())
}

fn handle_journal(app: &App, args: JournalArgs) -> anyhow::Result<()> {
    let edit = AnnotationEdit {
        journal: args.note,
        clear_journal: args.clear_note,
        emotion_before: args.before,
        clear_emotion_before: args.clear_before,
        emotion_after: args.after,
        clear_emotion_after: args.clear_after,
        news_analysis: args.news,
        clear_news_analysis: args.clear_news,
        add_tags: args.tags.into_iter().collect(),
        remove_tags: args.untags.into_iter().collect(),
    };

    let book = app
        .store
        .load()?
        .with_trade_edit(&args.account, args.ticket, &edit)?;
    app.store.save(&book)?;
    println!("Updated trade #{} in '{}'", args.ticket, book.find(&args.account)?.name);
    Ok(())
}

fn handle_goals(app: &App, args: GoalsArgs) -> anyhow::Result<()> {
    let mut book = app.store.load()?;
    let current = book.find(&args.account)?.goals.clone();

    let changed = args.clear
        || args.profit.is_some()
        || args.win_rate.is_some()
        || args.max_drawdown.is_some();
    if changed {
        if let Some(win_rate) = args.win_rate {
            if win_rate < Decimal::ZERO || win_rate > Decimal::ONE_HUNDRED {
                bail!("--win-rate must be between 0 and 100, got {win_rate}");
            }
        }
        let base = if args.clear { Goals::default() } else { current };
        let goals = Goals {
            total_profit: args.profit.or(base.total_profit),
            win_rate: args.win_rate.or(base.win_rate),
            max_drawdown_pct: args.max_drawdown.or(base.max_drawdown_pct),
        };
        book = book.with_goals(&args.account, goals)?;
        app.store.save(&book)?;
    }

    let account = book.find(&args.account)?;
    let progress = account.goals.progress(&account.report(&app.engine));
    match app.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&progress)?),
        OutputFormat::Table if progress.is_empty() => {
            println!("No goals set for '{}'", account.name)
        }
        OutputFormat::Table => println!("{}", render::goals(&progress)),
    }
    Ok(())
}

fn handle_tags(app: &App, args: ViewArgs) -> anyhow::Result<()> {
    let book = app.store.load()?;
    let report = book.report(&app.engine, &args.view(), &TagFilter::default())?;
    let tags = available_tags(&report);

    match app.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tags)?),
        OutputFormat::Table => {
            for tag in &tags {
                println!("{tag}");
            }
        }
    }
    Ok(())
}
