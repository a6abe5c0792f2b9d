use aether::config::AetherConfig;
use aether::logging::init_tracing;
use aether::models::weather::wind_direction_to_cardinal;
use aether::units::format_temperature;
use aether::{FetchOrchestrator, Session, SubmitOutcome, TemperatureUnit};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// Look up current weather, the past week and air quality for a place
#[derive(Parser, Debug)]
#[command(name = "aether", version)]
struct Args {
    /// Configuration file (defaults to <config dir>/aether/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
    /// Temperature unit: c or f
    #[arg(long)]
    unit: Option<TemperatureUnit>,
    /// Location to look up (defaults to the configured city)
    location: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => AetherConfig::load_from_path(Some(path)),
        None => AetherConfig::load(),
    }
    .context("Failed to load configuration")?;
    init_tracing(&config.logging, args.verbose)?;

    let unit = args.unit.unwrap_or_else(|| config.display_unit());
    let query = args.location.unwrap_or_else(|| config.defaults.city.clone());
    debug!("Searching for '{}' in °{}", query, unit);

    let orchestrator =
        FetchOrchestrator::from_config(&config).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let outcome = orchestrator
        .submit(&query)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let SubmitOutcome::Completed(session) = outcome else {
        bail!("Search for '{query}' was superseded");
    };

    print_session(&session, unit);
    print_quick_cities(&config.defaults.quick_cities, &session.query);
    Ok(())
}

fn print_session(session: &Session, unit: TemperatureUnit) {
    let location = &session.location;
    let current = &session.current;

    println!("{} ({})", location.display_name(), location.format_coordinates());
    if !location.timezone_id.is_empty() {
        println!("Timezone: {}", location.timezone_id);
    }
    println!();

    let source = if current.is_synthetic { " [simulated]" } else { "" };
    println!(
        "{}  {}{}",
        format_temperature(current.temperature, unit),
        current.description,
        source
    );
    println!(
        "Feels like {} - {}",
        format_temperature(current.feels_like, unit),
        current.feels_like_comparison().message()
    );
    let wind_direction = if current.wind_direction.is_empty() {
        wind_direction_to_cardinal(current.wind_degree)
    } else {
        current.wind_direction.as_str()
    };
    println!(
        "Humidity {}%  Wind {} km/h {}  Pressure {} hPa",
        current.humidity, current.wind_speed, wind_direction, current.pressure
    );
    println!(
        "Cloud cover {}%  Precipitation {} mm  Visibility {} km  UV {} ({})",
        current.cloud_cover,
        current.precipitation,
        current.visibility,
        current.uv_index,
        current.uv_label()
    );
    println!("Theme: {}", session.condition.as_str());

    if let Some(history) = session.history.resolved() {
        println!();
        let strip: Vec<String> = history
            .ascending()
            .iter()
            .map(|day| {
                format!(
                    "{} {}",
                    day.date.format("%a"),
                    format_temperature(day.max_temperature, unit)
                )
            })
            .collect();
        println!("Past week: {}", strip.join(" | "));

        for day in history.descending() {
            let wind = day
                .wind_speed
                .map(|speed| format!("  wind {speed} km/h"))
                .unwrap_or_default();
            println!(
                "  {}  {:<14} high {}  low {}  avg {}{}",
                day.date.format("%a %d %b"),
                day.description,
                format_temperature(day.max_temperature, unit),
                format_temperature(day.min_temperature, unit),
                format_temperature(day.avg_temperature, unit),
                wind
            );
        }
    }

    println!();
    match session.air_quality_sample() {
        Some(sample) => println!(
            "Air quality: US AQI {} ({})  PM2.5 {}  PM10 {}  NO2 {}  O3 {}  SO2 {}",
            sample.us_aqi,
            sample.category().label(),
            concentration(sample.pm2_5),
            concentration(sample.pm10),
            concentration(sample.nitrogen_dioxide),
            concentration(sample.ozone),
            concentration(sample.sulphur_dioxide)
        ),
        None => println!("Air quality unavailable"),
    }

    for notice in &session.notices {
        eprintln!("! {}", notice.message());
    }
}

fn concentration(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn print_quick_cities(cities: &[String], current: &str) {
    let others: Vec<&str> = cities
        .iter()
        .map(String::as_str)
        .filter(|city| !city.eq_ignore_ascii_case(current))
        .collect();
    if !others.is_empty() {
        println!();
        println!("Try also: {}", others.join(", "));
    }
}
