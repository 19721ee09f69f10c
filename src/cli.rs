//! CLI definition and dispatch.

use chrono::DateTime;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart::format_chart_svg;
use crate::domain::chart::{render_chart, ChartConfig, ChartLayout, ChartStyle};
use crate::domain::error::FinchartError;
use crate::domain::indicator::{compute_indicators, IndicatorSet};
use crate::domain::ledger::{safe_to_spend, LedgerInput};
use crate::domain::settings::{RiskTolerance, SettingsStore, SettingsUpdate};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "finchart", about = "Market chart and indicator engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a chart for a symbol to an SVG file
    Render {
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "1h")]
        interval: String,
        #[arg(long, default_value_t = 200)]
        limit: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        /// Chart style: candlestick, line, or bar
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        ma7: bool,
        #[arg(long)]
        ma25: bool,
        #[arg(long)]
        ema20: bool,
        #[arg(long)]
        bollinger: bool,
        /// Draw computed support/resistance levels
        #[arg(long)]
        levels: bool,
        #[arg(long)]
        no_volume: bool,
        #[arg(long)]
        support: Option<f64>,
        #[arg(long)]
        resistance: Option<f64>,
        #[arg(long)]
        growth_target: Option<f64>,
    },
    /// Compute indicators for a symbol (or the configured watchlist)
    Indicators {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long, default_value = "1h")]
        interval: String,
        #[arg(long, default_value_t = 200)]
        limit: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show the stored time range for a symbol
    Info {
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "1h")]
        interval: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Safe-to-Spend budget calculation
    Ledger {
        #[arg(long)]
        income: f64,
        #[arg(long)]
        expenses: f64,
        #[arg(long)]
        budget: f64,
        #[arg(long)]
        json: bool,
    },
    /// Show or update runtime settings
    Settings {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        auto_balance: Option<bool>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        risk_tolerance: Option<String>,
        /// Comma-separated watchlist, e.g. BTC,ETH,AAPL
        #[arg(long)]
        watch: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Render {
            symbol,
            interval,
            limit,
            config,
            data_dir,
            output,
            style,
            ma7,
            ma25,
            ema20,
            bollinger,
            levels,
            no_volume,
            support,
            resistance,
            growth_target,
        } => run_render(RenderArgs {
            symbol,
            interval,
            limit,
            config,
            data_dir,
            output,
            style,
            ma7,
            ma25,
            ema20,
            bollinger,
            levels,
            no_volume,
            support,
            resistance,
            growth_target,
        }),
        Command::Indicators {
            symbol,
            interval,
            limit,
            config,
            data_dir,
            json,
        } => run_indicators(symbol, &interval, limit, config.as_ref(), data_dir, json),
        Command::ListSymbols { config, data_dir } => run_list_symbols(config.as_ref(), data_dir),
        Command::Info {
            symbol,
            interval,
            config,
            data_dir,
        } => run_info(&symbol, &interval, config.as_ref(), data_dir),
        Command::Ledger {
            income,
            expenses,
            budget,
            json,
        } => run_ledger(income, expenses, budget, json),
        Command::Settings {
            config,
            auto_balance,
            notifications,
            risk_tolerance,
            watch,
            json,
        } => run_settings(
            config.as_ref(),
            auto_balance,
            notifications,
            risk_tolerance,
            watch,
            json,
        ),
    }
}

struct RenderArgs {
    symbol: String,
    interval: String,
    limit: usize,
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    output: PathBuf,
    style: Option<String>,
    ma7: bool,
    ma25: bool,
    ema20: bool,
    bollinger: bool,
    levels: bool,
    no_volume: bool,
    support: Option<f64>,
    resistance: Option<f64>,
    growth_target: Option<f64>,
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, FinchartError> {
    FileConfigAdapter::from_file(path).map_err(|e| FinchartError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<Option<FileConfigAdapter>, FinchartError> {
    path.map(load_config).transpose()
}

fn resolve_data_dir(flag: Option<PathBuf>, config: Option<&FileConfigAdapter>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    config
        .and_then(|c| c.get_string("data", "dir"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn resolve_layout(config: Option<&FileConfigAdapter>) -> ChartLayout {
    let defaults = ChartLayout::default();
    match config {
        Some(c) => ChartLayout {
            width: c.get_double("chart", "width", defaults.width),
            height: c.get_double("chart", "height", defaults.height),
            padding: c.get_double("chart", "padding", defaults.padding),
        },
        None => defaults,
    }
}

fn resolve_chart_config(args: &RenderArgs, config: Option<&FileConfigAdapter>) -> Result<ChartConfig, FinchartError> {
    let defaults = ChartConfig::default();

    let style_name = args
        .style
        .clone()
        .or_else(|| config.and_then(|c| c.get_string("chart", "style")));
    let style = match style_name {
        Some(name) => name.parse::<ChartStyle>()?,
        None => defaults.style,
    };

    let from_config = |key: &str, default: bool| -> bool {
        config
            .map(|c| c.get_bool("chart", key, default))
            .unwrap_or(default)
    };
    let from_levels = |key: &str| -> Option<f64> {
        config.and_then(|c| {
            c.get_string("levels", key)
                .map(|_| c.get_double("levels", key, 0.0))
        })
    };

    Ok(ChartConfig {
        style,
        show_volume: !args.no_volume && from_config("volume", defaults.show_volume),
        show_ma7: args.ma7 || from_config("ma7", defaults.show_ma7),
        show_ma25: args.ma25 || from_config("ma25", defaults.show_ma25),
        show_ema20: args.ema20 || from_config("ema20", defaults.show_ema20),
        show_bollinger: args.bollinger || from_config("bollinger", defaults.show_bollinger),
        show_support_resistance: args.levels
            || from_config("support_resistance", defaults.show_support_resistance),
        manual_support: args.support.or_else(|| from_levels("support")),
        manual_resistance: args.resistance.or_else(|| from_levels("resistance")),
        manual_growth_target: args.growth_target.or_else(|| from_levels("growth_target")),
    })
}

fn fail(err: FinchartError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

fn run_render(args: RenderArgs) -> ExitCode {
    let config = match load_optional_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let chart_config = match resolve_chart_config(&args, config.as_ref()) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let layout = resolve_layout(config.as_ref());

    let data_dir = resolve_data_dir(args.data_dir.clone(), config.as_ref());
    let adapter = CsvAdapter::new(data_dir);

    eprintln!(
        "Fetching {} {} bars for {}",
        args.limit, args.interval, args.symbol
    );
    let bars = match adapter.fetch_bars(&args.symbol, &args.interval, args.limit) {
        Ok(b) => b,
        Err(e) => return fail(e),
    };

    eprintln!("Computing indicators over {} bars", bars.len());
    let indicators = compute_indicators(&bars);

    let geometry = render_chart(&bars, &indicators, &chart_config, &layout);
    let svg = format_chart_svg(geometry.as_ref(), &layout);

    if let Err(e) = fs::write(&args.output, svg) {
        return fail(FinchartError::Io(e));
    }

    eprintln!("Wrote {}", args.output.display());
    ExitCode::SUCCESS
}

fn run_indicators(
    symbol: Option<String>,
    interval: &str,
    limit: usize,
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    json: bool,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let symbols = match symbol {
        Some(s) => vec![s],
        None => {
            let store = match &config {
                Some(c) => SettingsStore::from_config(c as &dyn ConfigPort),
                None => SettingsStore::new(),
            };
            store.current().watch_symbols
        }
    };

    let adapter = CsvAdapter::new(resolve_data_dir(data_dir, config.as_ref()));

    let mut sets: Vec<(String, IndicatorSet)> = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let bars = match adapter.fetch_bars(symbol, interval, limit) {
            Ok(b) => b,
            Err(e) => return fail(e),
        };
        sets.push((symbol.clone(), compute_indicators(&bars)));
    }

    if json {
        let map: serde_json::Map<String, serde_json::Value> = sets
            .iter()
            .map(|(symbol, set)| {
                (
                    symbol.clone(),
                    serde_json::to_value(set).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();
        match serde_json::to_string_pretty(&map) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                return fail(FinchartError::Data {
                    reason: format!("JSON encoding failed: {e}"),
                })
            }
        }
    } else {
        for (symbol, set) in &sets {
            print_indicator_summary(symbol, set);
        }
    }

    ExitCode::SUCCESS
}

fn print_indicator_summary(symbol: &str, set: &IndicatorSet) {
    let last = |series: &[Option<f64>]| -> String {
        match series.last().copied().flatten() {
            Some(v) => format!("{v:.4}"),
            None => "n/a".to_string(),
        }
    };
    let level = |value: Option<f64>| -> String {
        match value {
            Some(v) => format!("{v:.4}"),
            None => "n/a".to_string(),
        }
    };

    println!("{symbol} ({} bars)", set.ma7.len());
    println!(
        "  MA7 {}  MA25 {}  EMA20 {}",
        last(&set.ma7),
        last(&set.ma25),
        last(&set.ema20)
    );
    println!(
        "  BOLL {} / {} / {}",
        last(&set.boll_lower),
        last(&set.boll_mid),
        last(&set.boll_upper)
    );
    println!("  RSI14 {}", last(&set.rsi14));
    println!(
        "  MACD {}  signal {}  hist {}",
        last(&set.macd),
        last(&set.macd_signal),
        last(&set.macd_hist)
    );
    println!(
        "  support {}  resistance {}",
        level(set.support),
        level(set.resistance)
    );

    let hints: Vec<String> = set.hints.iter().map(|h| h.to_string()).collect();
    if hints.is_empty() {
        println!("  hints: none");
    } else {
        println!("  hints: {}", hints.join(", "));
    }
}

fn run_list_symbols(config_path: Option<&PathBuf>, data_dir: Option<PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let adapter = CsvAdapter::new(resolve_data_dir(data_dir, config.as_ref()));
    match adapter.list_symbols() {
        Ok(symbols) => {
            for symbol in symbols {
                println!("{symbol}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_info(
    symbol: &str,
    interval: &str,
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let adapter = CsvAdapter::new(resolve_data_dir(data_dir, config.as_ref()));
    match adapter.data_range(symbol, interval) {
        Ok(Some((first, last, count))) => {
            println!(
                "{symbol} {interval}: {count} bars, {} .. {}",
                format_time(first),
                format_time(last)
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("{symbol} {interval}: no data");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn format_time(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{epoch_ms}ms"),
    }
}

fn run_ledger(income: f64, expenses: f64, budget: f64, json: bool) -> ExitCode {
    let input = match LedgerInput::new(income, expenses, budget) {
        Ok(i) => i,
        Err(e) => return fail(e),
    };

    let result = safe_to_spend(&input);

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                return fail(FinchartError::Data {
                    reason: format!("JSON encoding failed: {e}"),
                })
            }
        }
    } else {
        println!("safe to spend:      {:.2}", result.safe_to_spend);
        println!("remaining budget:   {:.2}", result.remaining_budget);
        println!("savings potential:  {:.2}", result.savings_potential);
        println!("budget utilization: {:.2}%", result.budget_utilization);
        println!("status: {} - {}", result.status, result.status_message);
    }

    ExitCode::SUCCESS
}

fn run_settings(
    config_path: Option<&PathBuf>,
    auto_balance: Option<bool>,
    notifications: Option<bool>,
    risk_tolerance: Option<String>,
    watch: Option<String>,
    json: bool,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let mut store = match &config {
        Some(c) => SettingsStore::from_config(c as &dyn ConfigPort),
        None => SettingsStore::new(),
    };

    let risk_tolerance = match risk_tolerance {
        Some(raw) => match raw.parse::<RiskTolerance>() {
            Ok(v) => Some(v),
            Err(e) => {
                return fail(FinchartError::ConfigInvalid {
                    section: "settings".into(),
                    key: "risk_tolerance".into(),
                    reason: e.to_string(),
                })
            }
        },
        None => None,
    };

    let watch_symbols = watch.map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
    });

    let update = SettingsUpdate {
        auto_balance,
        notifications,
        risk_tolerance,
        watch_symbols,
    };

    let has_update = update.auto_balance.is_some()
        || update.notifications.is_some()
        || update.risk_tolerance.is_some()
        || update.watch_symbols.is_some();

    let snapshot = if has_update {
        store.apply(update)
    } else {
        store.current()
    };

    if json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                return fail(FinchartError::Data {
                    reason: format!("JSON encoding failed: {e}"),
                })
            }
        }
    } else {
        println!("auto_balance:   {}", snapshot.auto_balance);
        println!("notifications:  {}", snapshot.notifications);
        println!("risk_tolerance: {}", snapshot.risk_tolerance);
        println!("watch_symbols:  {}", snapshot.watch_symbols.join(", "));
        if !snapshot.updated_at.is_empty() {
            println!("updated_at:     {}", snapshot.updated_at);
        }
    }

    ExitCode::SUCCESS
}
