//! `cshelf` - CLI for coinshelf
//!
//! This binary provides the command-line interface for creating coin
//! collections, marking finds, and keeping the database current with the
//! coin catalog.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use coinshelf::cli::{
    Cli, Command, ConfigCommand, CreateCommand, DeleteCommand, ListCommand, MarkCommand,
    OutputFormat, SeriesCommand, ShowCommand, StatsCommand, UpgradeCommand,
};
use coinshelf::{init_logging, series, Config, Error, StorageWorker};

/// Exit status for rejected user input, as opposed to runtime faults.
const EXIT_VALIDATION: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            match err.downcast_ref::<Error>() {
                Some(e) if e.is_validation() => ExitCode::from(EXIT_VALIDATION),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // series and config never touch the database
    match cli.command {
        Command::Series(cmd) => return handle_series(&cmd),
        Command::Config(cmd) => return handle_config(&config, cmd),
        _ => {}
    }

    let worker = StorageWorker::spawn(config.database_path())
        .with_context(|| format!("opening database at {}", config.database_path().display()))?;

    // Catch up with the catalog before serving the command
    if config.upgrade.auto && !matches!(cli.command, Command::Upgrade(_)) {
        let report = worker.upgrade()?;
        if !report.is_noop() {
            info!(
                rows_added = report.rows_added,
                to_version = report.to_version,
                "Catalog upgrade applied"
            );
        }
    }

    match cli.command {
        Command::Create(cmd) => handle_create(&worker, &cmd),
        Command::List(cmd) => handle_list(&worker, &config, &cmd),
        Command::Show(cmd) => handle_show(&worker, &config, &cmd),
        Command::Collect(cmd) => handle_mark(&worker, &cmd, true),
        Command::Uncollect(cmd) => handle_mark(&worker, &cmd, false),
        Command::Delete(cmd) => handle_delete(&worker, &cmd),
        Command::Upgrade(cmd) => handle_upgrade(&worker, &cmd),
        Command::Stats(cmd) => handle_stats(&worker, &cmd),
        Command::Series(_) | Command::Config(_) => unreachable!("handled above"),
    }
}

fn handle_series(cmd: &SeriesCommand) -> anyhow::Result<()> {
    if let Some(name) = &cmd.name {
        let series =
            series::find(name).ok_or_else(|| Error::unknown_series(name.clone()))?;
        let defaults = series.default_parameters();

        if cmd.json {
            let detail = serde_json::json!({
                "name": series.name(),
                "slug": series.slug(),
                "start_year": series.start_year(),
                "stop_year": series.stop_year(),
                "edit_date_range": defaults.edit_date_range,
                "show_mint_marks": defaults.show_mint_marks,
                "mint_marks": defaults.mint_marks,
                "options": defaults.checkboxes,
            });
            println!("{}", serde_json::to_string_pretty(&detail)?);
            return Ok(());
        }

        println!("{}", series.name());
        println!("  Slug:        {}", series.slug());
        println!(
            "  Years:       {} to {}",
            series.start_year(),
            series.stop_year()
        );
        println!(
            "  Date range:  {}",
            if defaults.edit_date_range {
                "adjustable"
            } else {
                "fixed"
            }
        );
        if defaults.show_mint_marks {
            for mark in &defaults.mint_marks {
                println!(
                    "  Mint {}:      {} ({})",
                    mark.mark,
                    mark.label,
                    if mark.enabled { "default" } else { "optional" }
                );
            }
        } else {
            println!("  Mint marks:  not tracked");
        }
        for option in &defaults.checkboxes {
            println!("  Option:      --with {} ({})", option.key, option.label);
        }
        return Ok(());
    }

    if cmd.json {
        let list: Vec<_> = series::all()
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.name(),
                    "slug": s.slug(),
                    "start_year": s.start_year(),
                    "stop_year": s.stop_year(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for series in series::all() {
        println!(
            "{} ({} to {})",
            series.name(),
            series.start_year(),
            series.stop_year()
        );
    }
    Ok(())
}

fn handle_create(worker: &StorageWorker, cmd: &CreateCommand) -> anyhow::Result<()> {
    let series =
        series::find(&cmd.series).ok_or_else(|| Error::unknown_series(cmd.series.clone()))?;
    let mut params = series.default_parameters();

    if cmd.start_year.is_some() || cmd.stop_year.is_some() {
        if !params.edit_date_range {
            return Err(Error::DateRangeNotEditable {
                series: series.name().to_string(),
            }
            .into());
        }
        if let Some(year) = cmd.start_year {
            params.start_year = year;
        }
        if let Some(year) = cmd.stop_year {
            params.stop_year = year;
        }
    }

    if let Some(marks) = cmd.mint_mark_list() {
        if !params.show_mint_marks {
            bail!("{} does not track mint marks", series.name());
        }
        params.clear_marks();
        for mark in &marks {
            if !params.set_mark(mark, true) {
                bail!("{} has no '{}' mint", series.name(), mark);
            }
        }
    }

    for key in &cmd.with {
        if !params.set_checkbox(key, true) {
            bail!("unknown option '{}' for {}", key, series.name());
        }
    }
    for key in &cmd.without {
        if !params.set_checkbox(key, false) {
            bail!("unknown option '{}' for {}", key, series.name());
        }
    }

    let slots = series.populate(&params)?;
    let inserted = worker.create_collection(cmd.name.as_str(), series.name(), slots)?;
    println!(
        "Created '{}' ({}) with {} slots.",
        cmd.name,
        series.name(),
        inserted
    );
    Ok(())
}

fn handle_list(worker: &StorageWorker, config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let collections = worker.list_collections()?;
    let format = cmd
        .format
        .unwrap_or_else(|| OutputFormat::from_config(&config.display.format));

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&collections)?);
        }
        OutputFormat::Plain => {
            for c in &collections {
                println!(
                    "{}\t{}\t{}/{}",
                    c.name, c.series, c.collected_slots, c.total_slots
                );
            }
        }
        OutputFormat::Table => {
            if collections.is_empty() {
                println!("No collections yet. Create one with 'cshelf create'.");
                return Ok(());
            }
            let name_width = collections
                .iter()
                .map(|c| c.name.len())
                .max()
                .unwrap_or(0)
                .max("Name".len());
            let series_width = collections
                .iter()
                .map(|c| c.series.len())
                .max()
                .unwrap_or(0)
                .max("Series".len());
            println!(
                "{:name_width$}  {:series_width$}  Progress",
                "Name", "Series"
            );
            for c in &collections {
                println!(
                    "{:name_width$}  {:series_width$}  {}/{}",
                    c.name, c.series, c.collected_slots, c.total_slots
                );
            }
        }
    }
    Ok(())
}

fn handle_show(worker: &StorageWorker, config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let mut slots = worker.slots(cmd.name.as_str())?;
    if cmd.missing {
        slots.retain(|s| !s.collected);
    }
    if cmd.collected {
        slots.retain(|s| s.collected);
    }

    let format = cmd
        .format
        .unwrap_or_else(|| OutputFormat::from_config(&config.display.format));

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
        OutputFormat::Plain => {
            for slot in &slots {
                let marker = if slot.collected {
                    &config.display.collected_marker
                } else {
                    &config.display.missing_marker
                };
                println!("{marker} {}", slot.label());
            }
        }
        OutputFormat::Table => {
            let collected = slots.iter().filter(|s| s.collected).count();
            println!("{} ({collected}/{} collected)", cmd.name, slots.len());
            for slot in &slots {
                let marker = if slot.collected {
                    &config.display.collected_marker
                } else {
                    &config.display.missing_marker
                };
                println!("  [{marker}] {}", slot.label());
            }
        }
    }
    Ok(())
}

fn handle_mark(worker: &StorageWorker, cmd: &MarkCommand, collected: bool) -> anyhow::Result<()> {
    let mint_mark = cmd.mint_mark.clone().unwrap_or_default();
    worker.set_collected(
        cmd.name.as_str(),
        cmd.identifier.as_str(),
        mint_mark.as_str(),
        collected,
    )?;

    let label = if mint_mark.is_empty() {
        cmd.identifier.clone()
    } else {
        format!("{} {mint_mark}", cmd.identifier)
    };
    if collected {
        println!("Marked {label} as collected in '{}'.", cmd.name);
    } else {
        println!("Marked {label} as missing in '{}'.", cmd.name);
    }
    Ok(())
}

fn handle_delete(worker: &StorageWorker, cmd: &DeleteCommand) -> anyhow::Result<()> {
    if !worker.collection_exists(cmd.name.as_str())? {
        return Err(Error::CollectionNotFound {
            name: cmd.name.clone(),
        }
        .into());
    }

    if !cmd.yes {
        print!(
            "Delete collection '{}' and all its progress? [y/N] ",
            cmd.name
        );
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    worker.delete_collection(cmd.name.as_str())?;
    println!("Deleted '{}'.", cmd.name);
    Ok(())
}

fn handle_upgrade(worker: &StorageWorker, cmd: &UpgradeCommand) -> anyhow::Result<()> {
    let report = worker.upgrade()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_noop() {
        println!(
            "Catalog is already current (version {}).",
            report.to_version
        );
    } else {
        println!(
            "Upgraded catalog from version {} to {}.",
            report.from_version, report.to_version
        );
        println!(
            "Added {} slots across {} collections.",
            report.rows_added, report.collections_updated
        );
    }
    Ok(())
}

fn handle_stats(worker: &StorageWorker, cmd: &StatsCommand) -> anyhow::Result<()> {
    let stats = worker.stats()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Collections:      {}", stats.total_collections);
    println!("Slots:            {}", stats.total_slots);
    println!("Collected:        {}", stats.collected_slots);
    println!("Catalog version:  {}", stats.catalog_version);
    println!("Database size:    {} bytes", stats.db_size_bytes);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:     {}", config.database_path().display());
                println!();
                println!("[Display]");
                println!("  Format:            {}", config.display.format);
                println!(
                    "  Collected marker:  {}",
                    config.display.collected_marker
                );
                println!("  Missing marker:    {}", config.display.missing_marker);
                println!();
                println!("[Upgrade]");
                println!("  Auto upgrade:      {}", config.upgrade.auto);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
