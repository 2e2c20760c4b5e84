use crate::config::{self, AirQualityConfig, PollenConfig};
use crate::error::{AppError, Result};
use crate::models::{AirQualitySnapshot, CallStatus, CallTiming, PollenSnapshot};
use crate::sensor::{AirQualitySensor, PollenSensor};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Table};
use std::env;
use tracing::error;

/// CLI tool polling the Google Air Quality and Pollen APIs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll current air quality conditions and the hourly forecast
    Air(AirArgs),

    /// Poll the 5-day pollen forecast
    Pollen(PollenArgs),
}

#[derive(Args, Debug)]
pub struct AirArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    /// Hours between current-conditions calls (1-24)
    #[arg(long, default_value_t = config::DEFAULT_INTERVAL_HOURS)]
    pub interval: u32,

    /// Hours between forecast calls (1-24)
    #[arg(long, default_value_t = config::DEFAULT_FORECAST_INTERVAL_HOURS)]
    pub forecast_interval: u32,

    /// Requested forecast window in hours (1-96)
    #[arg(long, default_value_t = config::DEFAULT_FORECAST_LENGTH_HOURS)]
    pub forecast_length: u32,

    /// Keep pollutant sources/effects text in the output
    #[arg(long)]
    pub additional_info: bool,

    /// Re-poll every N seconds instead of exiting after one refresh
    #[arg(long, value_name = "SECONDS")]
    pub watch: Option<u64>,
}

#[derive(Args, Debug)]
pub struct PollenArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    /// Hours between forecast calls (1-24)
    #[arg(long, default_value_t = config::DEFAULT_FORECAST_INTERVAL_HOURS)]
    pub forecast_interval: u32,

    /// Re-poll every N seconds instead of exiting after one refresh
    #[arg(long, value_name = "SECONDS")]
    pub watch: Option<u64>,
}

/// CLI application. The binary is the "host": it owns the tick schedule
/// (`--watch`) and the display; the sensors own everything else.
pub struct App;

impl App {
    pub async fn run(cli: Cli) -> Result<()> {
        // Load environment variables
        dotenv::dotenv().ok();

        let api_key = env::var("GOOGLE_API_KEY").map_err(|e| {
            error!("GOOGLE_API_KEY environment variable not set: {}", e);
            AppError::Env(e)
        })?;

        match cli.command {
            Commands::Air(args) => Self::run_air(api_key, args).await,
            Commands::Pollen(args) => Self::run_pollen(api_key, args).await,
        }
    }

    async fn run_air(api_key: String, args: AirArgs) -> Result<()> {
        let config = AirQualityConfig {
            api_key,
            latitude: args.latitude,
            longitude: args.longitude,
            interval_hours: args.interval,
            forecast_interval_hours: args.forecast_interval,
            forecast_length_hours: args.forecast_length,
            include_additional_info: args.additional_info,
        };
        let mut sensor = AirQualitySensor::new(config)?;

        loop {
            sensor.refresh(Utc::now()).await;
            print_air_snapshot(sensor.snapshot());

            match args.watch {
                Some(secs) => tokio::time::sleep(std::time::Duration::from_secs(secs)).await,
                None => break,
            }
        }

        Ok(())
    }

    async fn run_pollen(api_key: String, args: PollenArgs) -> Result<()> {
        let config = PollenConfig {
            api_key,
            latitude: args.latitude,
            longitude: args.longitude,
            forecast_interval_hours: args.forecast_interval,
        };
        let mut sensor = PollenSensor::new(config)?;

        loop {
            sensor.refresh(Utc::now()).await;
            print_pollen_snapshot(sensor.snapshot());

            match args.watch {
                Some(secs) => tokio::time::sleep(std::time::Duration::from_secs(secs)).await,
                None => break,
            }
        }

        Ok(())
    }
}

fn status_label(status: CallStatus) -> ColoredString {
    match status {
        CallStatus::Successful => status.as_str().green(),
        CallStatus::Error => status.as_str().red(),
        CallStatus::Unknown => status.as_str().yellow(),
    }
}

fn format_timing(timing: &CallTiming) -> String {
    let last = timing
        .last_call_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    let next = timing
        .next_call_due_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    format!("last call {}, next due {}", last, next)
}

fn print_air_snapshot(snapshot: &AirQualitySnapshot) {
    println!("\n{}", "Google Air Quality".cyan().bold());
    println!(
        "current  [{}] {}",
        status_label(snapshot.current_status),
        format_timing(&snapshot.current_timing)
    );
    println!(
        "forecast [{}] {}",
        status_label(snapshot.forecast_status),
        format_timing(&snapshot.forecast_timing)
    );

    if let Some(region) = &snapshot.region {
        println!("Region: {}", region);
    }
    if let Some(last_update) = &snapshot.last_update {
        println!("Measured at: {}", last_update);
    }
    if let Some(pm25) = snapshot.pm25 {
        println!("PM2.5: {:.2} µg/m³", pm25);
    }

    if !snapshot.indices.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Index", "AQI", "Category", "Dominant pollutant"]);
        for index in &snapshot.indices {
            table.add_row(vec![
                index.code.clone(),
                index.aqi.map(|v| v.to_string()).unwrap_or_default(),
                index.category.clone().unwrap_or_default(),
                index.dominant_pollutant.clone().unwrap_or_default(),
            ]);
        }
        println!("{table}");
    }

    if !snapshot.pollutants.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Pollutant", "Value", "Units"]);
        let mut codes: Vec<_> = snapshot.pollutants.keys().collect();
        codes.sort();
        for code in codes {
            let pollutant = &snapshot.pollutants[code];
            table.add_row(vec![
                pollutant.code.clone(),
                format!("{:.2}", pollutant.value),
                pollutant.units.clone(),
            ]);
        }
        println!("{table}");
    }

    if !snapshot.forecast.is_empty() {
        println!("Forecast: {} hourly slots", snapshot.forecast.len());
        for entry in snapshot.forecast.iter().take(12) {
            println!(
                "  {}  aqi {}  dominant {}",
                entry.datetime.as_deref().unwrap_or("-"),
                entry
                    .aqi
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                entry.dominant_pollutant.as_deref().unwrap_or("-"),
            );
        }
        if snapshot.forecast.len() > 12 {
            println!("  ... and {} more", snapshot.forecast.len() - 12);
        }
    }
}

fn print_pollen_snapshot(snapshot: &PollenSnapshot) {
    println!("\n{}", "Google Pollen".cyan().bold());
    println!(
        "forecast [{}] {}",
        status_label(snapshot.forecast_status),
        format_timing(&snapshot.forecast_timing)
    );

    if let Some(today) = &snapshot.today {
        println!(
            "Today ({}): grass {} / tree {} / weed {}",
            today.date.as_deref().unwrap_or("-"),
            format_level(today.grass),
            format_level(today.tree),
            format_level(today.weed),
        );
    }

    if !snapshot.forecast.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Date", "Grass", "Tree", "Weed"]);
        for entry in &snapshot.forecast {
            table.add_row(vec![
                entry.date.clone().unwrap_or_else(|| "-".to_string()),
                format_level(entry.grass),
                format_level(entry.tree),
                format_level(entry.weed),
            ]);
        }
        println!("{table}");
    }
}

fn format_level(value: Option<f64>) -> String {
    value.map(|v| format!("{:.0}", v)).unwrap_or_else(|| "-".to_string())
}
