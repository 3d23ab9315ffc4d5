use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::Input;

use crate::config::{self, Config};
use crate::core::report::{self, ReportLimits};
use crate::core::resolver::FlacReader;
use crate::models::Report;

#[derive(Parser)]
#[command(name = "flacwrap", about = "Listening statistics from a playback log and local FLAC files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print listening statistics for a playback log
    Report {
        /// Playback log (XML)
        log: PathBuf,
        /// Number of top songs
        #[arg(long)]
        songs: Option<usize>,
        /// Number of top artists
        #[arg(long)]
        artists: Option<usize>,
        /// Number of top albums
        #[arg(long)]
        albums: Option<usize>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the upload page
    Serve {
        /// Address to listen on (default from config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Edit default settings
    Config,
}

/// Dispatch a parsed command. Flags override the config file.
pub fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_config();

    match cli.command {
        Some(Commands::Report {
            log,
            songs,
            artists,
            albums,
            json,
        }) => {
            let defaults = cfg.report.limits();
            let limits = ReportLimits {
                songs: songs.unwrap_or(defaults.songs),
                artists: artists.unwrap_or(defaults.artists),
                albums: albums.unwrap_or(defaults.albums),
            };
            cmd_report(&log, limits, json)
        }
        Some(Commands::Serve { bind }) => {
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            cmd_serve(&bind, cfg.report.limits())
        }
        Some(Commands::Config) => cmd_config(cfg),
        None => {
            println!("usage: flacwrap <command>");
            println!("run flacwrap --help for details.");
            Ok(())
        }
    }
}

/// Run the pipeline on a log file and print tables or JSON.
fn cmd_report(log: &Path, limits: ReportLimits, json: bool) -> Result<()> {
    let data = std::fs::read(log)
        .with_context(|| format!("cannot read playback log {}", log.display()))?;
    let report = report::generate_from_bytes(&data, &FlacReader, limits)
        .with_context(|| format!("cannot process {}", log.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Console tables for the three rankings, then the summary lines.
fn print_report(report: &Report) {
    if report.top_songs.is_empty() {
        println!("No readable FLAC files in this log.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["#", "Title", "Artist", "Album", "Plays", "First played", "Last played"]);
        for song in &report.top_songs {
            table.add_row(vec![
                Cell::new(song.rank),
                Cell::new(&song.title),
                Cell::new(&song.artist),
                Cell::new(&song.album),
                Cell::new(song.plays),
                Cell::new(song.first_played.as_deref().unwrap_or("N/A")),
                Cell::new(song.last_played.as_deref().unwrap_or("N/A")),
            ]);
        }
        println!("Top songs\n{table}\n");

        let mut table = Table::new();
        table.set_header(vec!["#", "Artist", "Plays"]);
        for artist in &report.top_artists {
            table.add_row(vec![
                Cell::new(artist.rank),
                Cell::new(&artist.artist),
                Cell::new(artist.plays),
            ]);
        }
        println!("Top artists\n{table}\n");

        let mut table = Table::new();
        table.set_header(vec!["#", "Album", "Artist", "Plays"]);
        for album in &report.top_albums {
            table.add_row(vec![
                Cell::new(album.rank),
                Cell::new(&album.album),
                Cell::new(&album.artist),
                Cell::new(album.plays),
            ]);
        }
        println!("Top albums\n{table}\n");
    }

    let summary = &report.summary;
    println!(
        "Listened {} minutes ({} hours) across {} plays",
        report.total_time_minutes, report.total_time_hours, summary.total_plays
    );
    println!("Distinct tracks add up to {} minutes", report.library_minutes);
    println!(
        "FLAC files: {} (read: {}, errors: {}), skipped non-FLAC entries: {}",
        summary.total_files, summary.successful_reads, summary.files_with_errors, report.skipped_files,
    );
}

/// Start the upload server.
#[cfg(feature = "web")]
fn cmd_serve(bind: &str, limits: ReportLimits) -> Result<()> {
    crate::web::launch(bind, limits)
}

#[cfg(not(feature = "web"))]
fn cmd_serve(_bind: &str, _limits: ReportLimits) -> Result<()> {
    anyhow::bail!("web support is not enabled. rebuild with: cargo build --features web");
}

/// Prompt for each setting, prefilled with the current value, and save.
fn cmd_config(mut cfg: Config) -> Result<()> {
    println!("flacwrap settings\n");

    cfg.report.top_songs = Input::new()
        .with_prompt("Top songs")
        .default(cfg.report.top_songs)
        .interact_text()?;

    cfg.report.top_artists = Input::new()
        .with_prompt("Top artists")
        .default(cfg.report.top_artists)
        .interact_text()?;

    cfg.report.top_albums = Input::new()
        .with_prompt("Top albums")
        .default(cfg.report.top_albums)
        .interact_text()?;

    cfg.server.bind = Input::new()
        .with_prompt("Server address")
        .with_initial_text(cfg.server.bind.clone())
        .interact_text()?;

    let path = config::save_config(&cfg)?;
    println!("\nSaved to {}", path.display());
    Ok(())
}
