use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use enum_dispatch::enum_dispatch;
use itertools::Itertools;
use log::{debug, info, warn};
use macrodash::{
    cache::{self, DatasetCache},
    config::{Config, DashboardConfig, DataSource},
    entities::{self, PeerGroup},
    error::MacrodashError,
    Macrodash,
};
use spinners::{Spinner, Spinners};

use crate::display::{display_entities, display_report};
use crate::error::MacrodashCliResult;

const DEFAULT_PROGRESS_SPINNER: Spinners = Spinners::Dots;
const COMPLETE_PROGRESS_STRING: &str = "✔";
const RUNNING_TAIL_STRING: &str = "...";
const QUIT_STRING: &str = "q";

fn start_spinner(quiet: bool, message: &str) -> Option<Spinner> {
    (!quiet).then(|| {
        Spinner::with_timer(
            DEFAULT_PROGRESS_SPINNER,
            message.to_string() + RUNNING_TAIL_STRING,
        )
    })
}

fn stop_spinner(sp: Option<Spinner>) {
    if let Some(mut s) = sp {
        s.stop_with_symbol(COMPLETE_PROGRESS_STRING);
    }
}

/// Trait that defines what to run when a given subcommand is invoked.
#[enum_dispatch]
pub trait RunCommand {
    async fn run(&self, config: Config) -> MacrodashCliResult<()>;
}

/// The Countries command lists the countries the dashboard knows about.
#[derive(Args, Debug)]
pub struct CountriesCommand;

impl RunCommand for CountriesCommand {
    async fn run(&self, _config: Config) -> MacrodashCliResult<()> {
        info!("Running `countries` subcommand");
        println!("\nThe following countries are available:");
        display_entities(&entities::all(), &PeerGroup::eu());
        Ok(())
    }
}

/// The Download command fetches every country over the window and overwrites the cache file.
#[derive(Args, Debug)]
pub struct DownloadCommand {
    #[arg(short = 'w', long, help = "Number of years before the current year to fetch")]
    window_years: Option<u16>,
    #[arg(short = 'c', long, help = "Path of the CSV cache file to write")]
    cache_path: Option<String>,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for DownloadCommand {
    async fn run(&self, mut config: Config) -> MacrodashCliResult<()> {
        info!("Running `download` subcommand");
        if let Some(window_years) = self.window_years {
            config.dashboard.window_years = window_years;
        }
        if let Some(cache_path) = &self.cache_path {
            config.cache_path = cache_path.clone();
        }
        let macrodash = Macrodash::new_with_config(config);
        let years = macrodash.window(&macrodash.config.dashboard);

        let sp = start_spinner(self.quiet, &format!("Downloading {years}"));
        let written = macrodash.refresh_cache(years).await;
        stop_spinner(sp);

        let written = written?;
        println!(
            "\nSaved {written} observations to {}",
            macrodash.config.cache_path
        );
        Ok(())
    }
}

/// The Dashboard command renders the unemployment panel for one country, or for each country
/// entered at the prompt.
#[derive(Args, Debug)]
pub struct DashboardCommand {
    #[arg(
        short = 'c',
        long,
        help = "Country code or name (case-insensitive). Prompts repeatedly when omitted"
    )]
    country: Option<String>,
    #[arg(
        short = 's',
        long,
        value_name = "live|cached",
        value_parser = DataSource::from_str,
        help = "Where to load observations from: the World Bank API or the CSV cache written by `download`"
    )]
    source: Option<DataSource>,
    #[arg(short = 'w', long, help = "Number of years before the current year to show")]
    window_years: Option<u16>,
    #[arg(long = "no-comparison", help = "Skip the peer-group average and comparison")]
    no_comparison: bool,
    #[arg(
        short = 'o',
        long,
        help = "Write the chart series (Year, value, group average) as CSV to this file"
    )]
    output_file: Option<String>,
    #[arg(from_global)]
    quiet: bool,
}

impl DashboardCommand {
    fn dashboard_config(&self, defaults: &DashboardConfig) -> DashboardConfig {
        DashboardConfig {
            source: self.source.unwrap_or(defaults.source),
            window_years: self.window_years.unwrap_or(defaults.window_years),
            compute_comparison: defaults.compute_comparison && !self.no_comparison,
        }
    }

    async fn render_one(
        &self,
        macrodash: &Macrodash,
        dashboard: &DashboardConfig,
        cache: &mut DatasetCache,
        selection: &str,
    ) -> MacrodashCliResult<()> {
        let entity = entities::lookup(selection)?;
        let sp = (!cache.holds(dashboard.source, macrodash.window(dashboard)))
            .then(|| start_spinner(self.quiet, &format!("Loading {} data", dashboard.source)))
            .flatten();
        let report = macrodash.render(dashboard, &entity, cache).await;
        stop_spinner(sp);
        let report = report?;
        debug!("{report:#?}");

        display_report(&report);
        if let Some(output_file) = &self.output_file {
            cache::write_chart(output_file, &report)
                .with_context(|| format!("Failed to write output to {output_file}"))?;
            println!("\nChart series written to {output_file}");
        }
        Ok(())
    }

    fn prompt() -> io::Result<Option<String>> {
        print!("\nCountry (code or name, empty or `{QUIT_STRING}` to quit): ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(parse_selection(&line))
    }
}

/// `None` ends the interactive session.
fn parse_selection(line: &str) -> Option<String> {
    let selection = line.trim();
    (!selection.is_empty() && !selection.eq_ignore_ascii_case(QUIT_STRING))
        .then(|| selection.to_string())
}

impl RunCommand for DashboardCommand {
    async fn run(&self, config: Config) -> MacrodashCliResult<()> {
        info!("Running `dashboard` subcommand");
        let dashboard = self.dashboard_config(&config.dashboard);
        debug!("dashboard: {dashboard:?}");
        let macrodash = Macrodash::new_with_config(config);
        let mut cache = DatasetCache::new();

        if let Some(country) = &self.country {
            return self
                .render_one(&macrodash, &dashboard, &mut cache, country)
                .await;
        }

        println!(
            "\nAvailable countries: {}",
            entities::all().iter().map(|e| &e.name).join(", ")
        );
        while let Some(selection) = Self::prompt()? {
            match self
                .render_one(&macrodash, &dashboard, &mut cache, &selection)
                .await
            {
                // An unknown name should not end the session
                Err(crate::error::MacrodashCliError::MacrodashError(
                    MacrodashError::UnknownEntity(name),
                )) => {
                    warn!("unknown country '{name}'");
                    println!("\nUnknown country '{name}', try one of the names listed above.");
                }
                other => other?,
            }
        }
        Ok(())
    }
}

/// The entrypoint for the CLI.
#[derive(Parser, Debug)]
#[command(version, about="Macrodash compares a country's unemployment rate with the EU average", long_about = None, name="macrodash")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[arg(
        short = 'q',
        long = "quiet",
        help = "\
            Do not print progress spinners to stdout. Prompts, results and logs (when `RUST_LOG`\n\
            is set) will still be printed.",
        global = true
    )]
    quiet: bool,
}

/// Commands contains the list of subcommands available for use in the CLI.
/// Each command implements the RunCommand trait.
#[derive(Subcommand, Debug)]
#[enum_dispatch(RunCommand)]
pub enum Commands {
    /// List the countries and whether they count towards the EU average
    Countries(CountriesCommand),
    /// Fetch all countries from the World Bank and write the CSV cache
    Download(DownloadCommand),
    /// Show the unemployment dashboard for a country
    Dashboard(DashboardCommand),
}
