use std::io::IsTerminal;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use kweather_core::{
    CitySource, CityTable, Config, Dashboard, DashboardOutcome, IpGeolocator,
    provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "kweather", version, about = "Weather dashboard for Korean cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather, air quality and forecast for a city.
    Show {
        /// City name in Korean or English, e.g. 서울 or Seoul.
        /// If absent, the city is detected from your IP address.
        city: Option<String>,
    },

    /// Find supported cities by partial Korean or English name.
    Search {
        text: String,
    },

    /// List every supported city.
    Cities,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let cities = CityTable::builtin();

        match self.command {
            Command::Show { city } => show(city).await,
            Command::Search { text } => {
                let found = cities.search(&text);
                if found.is_empty() {
                    println!("일치하는 도시가 없습니다. (No matching city found.)");
                } else {
                    println!("검색 결과 (Search Results):");
                    for entry in found {
                        println!("- {} ({})", entry.korean, entry.english);
                    }
                }
                Ok(())
            }
            Command::Cities => {
                for entry in cities.entries() {
                    println!("{}\t{}", entry.korean, entry.english);
                }
                Ok(())
            }
        }
    }
}

async fn show(city: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let locator =
        IpGeolocator::from_config(&config).context("Failed to build geolocation client")?;
    let dashboard = Dashboard::new(provider, Box::new(locator), CityTable::builtin());

    let mut outcome = dashboard.build(city.as_deref()).await;

    if let Some(notice) = manual_entry_notice(&outcome) {
        eprintln!("{notice}");
        let Some(input) = prompt_for_city(dashboard.cities())? else {
            bail!(notice);
        };
        outcome = dashboard.build(Some(&input)).await;
    }

    match outcome {
        DashboardOutcome::Report(report) => {
            print!("{}", render::report(&report));
            Ok(())
        }
        DashboardOutcome::Unsupported { input, source: CitySource::Input, supported } => bail!(
            "지원되지 않는 도시입니다: {input}. 아래 리스트에서 선택해 주세요. \
             (Unsupported city. Please select from the list below.)\n{supported}"
        ),
        other => bail!(manual_entry_notice(&other).unwrap_or_default()),
    }
}

/// The warning to show when the user has to type a city themselves: nothing
/// was given and detection failed, or the detected city is not supported.
fn manual_entry_notice(outcome: &DashboardOutcome) -> Option<String> {
    match outcome {
        DashboardOutcome::NoCity => Some(
            "도시를 입력하거나 지원 도시를 선택해 주세요. \
             (Please enter a city or select from the supported list.)"
                .to_string(),
        ),
        DashboardOutcome::Unsupported { input, source: CitySource::Detected, .. } => Some(format!(
            "자동 감지된 도시({input})가 지원 리스트에 없습니다. 도시명을 입력해 주세요. \
             (Auto-detected city is not supported. Please enter a city name.)"
        )),
        _ => None,
    }
}

/// Ask for a city on a terminal; `None` when not interactive or skipped.
fn prompt_for_city(cities: &CityTable) -> anyhow::Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let input = inquire::Text::new("도시 찾기 (Search City: Korean or English, e.g. 서울/Seoul):")
        .with_help_message(&cities.supported_list())
        .prompt_skippable()
        .context("Failed to read city name")?;

    Ok(input.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}
