use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use forecast_core::{Config, ForecastResult, ForecastService, ProviderId, TemperatureUnit};
use inquire::Password;
use std::{fmt::Write as _, path::PathBuf};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast for any location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider ("google" or "darksky").
    Configure {
        /// Provider short name.
        provider: String,
    },

    /// Show the forecast for a location.
    Show {
        /// Address or location name.
        location: String,

        /// Temperature unit: celsius or fahrenheit. Defaults to the configured unit.
        #[arg(long, short)]
        unit: Option<TemperatureUnit>,
    },

    /// Serve the web front end.
    Serve {
        #[arg(long, short, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Extra directory served under /static.
        #[arg(long)]
        assets: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { location, unit } => show(&location, unit).await,
            Command::Serve { port, assets } => {
                let config = Config::load()?;
                let service = ForecastService::from_config(&config)?;
                crate::web::run(service, config.unit(), port, assets).await
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id} ({}):", id.role()))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let replaced = store_api_key(&mut config, id, &api_key)?;
    config.save()?;

    let verb = if replaced { "Replaced" } else { "Saved" };
    println!("{verb} {id} API key in {}", Config::config_file_path()?.display());
    Ok(())
}

/// Store a trimmed API key. Returns whether a key was already configured.
fn store_api_key(config: &mut Config, id: ProviderId, api_key: &str) -> anyhow::Result<bool> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    let replaced = config.is_provider_configured(id);
    config.upsert_provider_api_key(id, api_key.to_string());
    Ok(replaced)
}

async fn show(location: &str, unit: Option<TemperatureUnit>) -> anyhow::Result<()> {
    let location = location.trim();
    if location.is_empty() {
        return Err(anyhow!("Location must not be empty"));
    }

    let config = Config::load()?;
    let service = ForecastService::from_config(&config)?;
    let unit = unit.unwrap_or_else(|| config.unit());

    match service.forecast(location, unit).await {
        Ok(forecast) => {
            print!("{}", render_forecast(&forecast));
            Ok(())
        }
        Err(e) => Err(anyhow!(e.user_message())),
    }
}

/// Plain-text rendering of a forecast for the terminal.
pub fn render_forecast(forecast: &ForecastResult) -> String {
    let unit = forecast.temp_unit;
    let today = &forecast.today;
    let now = &today.conditions;
    let mut out = String::new();

    let _ = writeln!(out, "{}", forecast.place_name);
    let _ = writeln!(out, "{}  {}", today.current_date, today.current_time);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Now: {}°{unit} (feels like {}°{unit}), {}",
        now.temperature, now.apparent_temperature, now.summary
    );
    let _ = writeln!(
        out,
        "High {}°{unit} / Low {}°{unit}, rain {}%, humidity {}%, wind {}",
        now.high, now.low, now.precip_probability, now.humidity, now.wind_speed
    );
    let _ = writeln!(out, "{}", forecast.week_summary);
    let _ = writeln!(out);

    for day in &forecast.days {
        let _ = writeln!(
            out,
            "{:<3} {:<6}  {:>4}°{unit} / {:>4}°{unit}  rain {:>3}%  {}",
            day.day_of_week, day.date, day.high, day.low, day.precip_probability, day.summary
        );
    }

    out
}
