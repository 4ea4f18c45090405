use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use dash_core::common::enums::StdConvention;
use dash_core::common::time::to_str;
use dash_core::common::utils::fmt_opt;
use dash_core::data::indicators::INDICATORS;
use dash_core::data::{CompanyListSource, DataSource, PriceCsvSource, PriceProvider, WdiSource};
use dash_core::panels::world_bank::year_slider;
use dash_core::{BandConfig, BandResult, TimeSeries};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print rolling mean and bands of the close price
    Bands {
        /// Directory holding one <TICKER>.csv per ticker
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long, required = true, num_args = 1..)]
        ticker: Vec<String>,
        /// JSON file with band parameters; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        window: Option<usize>,
        #[arg(long)]
        num_std: Option<f64>,
        /// Divide by n instead of n - 1
        #[arg(long, default_value_t = false)]
        population: bool,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// List ticker symbols of a company list
    Tickers {
        #[arg(long)]
        companies: PathBuf,
    },
    /// List the indicator catalog
    Indicators,
    /// Show the selectable years of an indicator
    Years {
        #[arg(long)]
        wdi: PathBuf,
        #[arg(long)]
        indicator: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
struct BandRow {
    ticker: String,
    date: String,
    close: Option<f64>,
    mean: Option<f64>,
    upper: Option<f64>,
    lower: Option<f64>,
}

fn band_rows(ticker: &str, closes: &TimeSeries, bands: &BandResult) -> Vec<BandRow> {
    bands
        .timestamps
        .iter()
        .zip(closes.values())
        .enumerate()
        .map(|(i, (ts, &close))| BandRow {
            ticker: ticker.to_string(),
            date: to_str(ts),
            close,
            mean: bands.mean[i],
            upper: bands.upper[i],
            lower: bands.lower[i],
        })
        .collect()
}

fn write_csv<W: Write>(rows: &[BandRow], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
    log::debug!("Parsed arguments: {:?}", cli);

    match cli.command {
        Command::Bands {
            data_dir,
            ticker,
            config,
            window,
            num_std,
            population,
            start,
            end,
            format,
        } => {
            let mut conf = match config {
                Some(path) => BandConfig::from_json_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => BandConfig::default(),
            };
            conf.window_size = window.unwrap_or(conf.window_size);
            conf.num_std = num_std.unwrap_or(conf.num_std);
            if population {
                conf.std_convention = StdConvention::Population;
            }
            conf.start = start.unwrap_or(conf.start);
            conf.end = end.unwrap_or(conf.end);
            conf.validate()?;

            let mut source = PriceCsvSource::new(&data_dir);
            source.load()?;
            for t in &ticker {
                print_bands(&source, t, &conf, format)?;
            }
        }
        Command::Tickers { companies } => {
            let mut source = CompanyListSource::new(&companies);
            source.load()?;
            for t in source.tickers()? {
                println!("{}", t);
            }
        }
        Command::Indicators => {
            for (category, names) in INDICATORS {
                println!("{}", category);
                for name in names.iter() {
                    println!("  {}", name);
                }
            }
        }
        Command::Years { wdi, indicator } => {
            let mut source = WdiSource::new(&wdi);
            source.load()?;
            let slider = year_slider(source.table()?, &indicator)?;
            println!("{}", serde_json::to_string_pretty(&slider)?);
        }
    }

    Ok(())
}

fn print_bands(source: &PriceCsvSource, ticker: &str, conf: &BandConfig, format: Format) -> Result<()> {
    let history = source.history(ticker)?.between(conf.start, conf.end);
    if history.is_empty() {
        bail!("{} has no prices between {} and {}", ticker, conf.start, conf.end);
    }
    let closes = history.close_series()?;
    let bands = conf.estimator().compute(&closes)?;
    let rows = band_rows(ticker, &closes, &bands);
    log::info!(
        "{}: {} points, {} with bands",
        ticker,
        rows.len(),
        bands.present_count()
    );

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        Format::Csv => write_csv(&rows, std::io::stdout().lock())?,
        Format::Table => {
            println!("{} - bollinger bands", ticker);
            println!("{:<12} {:>10} {:>10} {:>10} {:>10}", "date", "close", "mean", "upper", "lower");
            for r in &rows {
                println!(
                    "{:<12} {:>10} {:>10} {:>10} {:>10}",
                    r.date,
                    fmt_opt(r.close, 2),
                    fmt_opt(r.mean, 2),
                    fmt_opt(r.upper, 2),
                    fmt_opt(r.lower, 2)
                );
            }
        }
    }
    Ok(())
}
