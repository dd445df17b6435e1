// SPDX-License-Identifier: MPL-2.0
//! `flix` command line: scans library roots and prints the folder-grouped
//! video list.

use chrono::{DateTime, Local};
use flix::app::persisted_state::AppState;
use flix::application::port::MediaCatalog;
use flix::application::query::{group_display_name, GroupedVideos};
use flix::config;
use flix::domain::media::{GroupKey, VideoRecord};
use flix::gallery::GalleryState;
use flix::infrastructure::{FfmpegProbe, FsCatalog};
use flix::navigation::{Navigator, Route};
use std::path::PathBuf;
use std::sync::Arc;

const HELP: &str = "\
flix - local video library

USAGE:
  flix [OPTIONS] [ROOT...]

OPTIONS:
  --data-dir DIR     Override the data directory
  --config-dir DIR   Override the config directory
  --folder KEY       Only list the videos of one folder
  --watch            Keep running and print the library on every change
  -h, --help         Print this help

ROOT directories replace the library roots from settings.toml.
";

struct Args {
    data_dir: Option<String>,
    config_dir: Option<String>,
    folder: Option<String>,
    watch: bool,
    roots: Vec<PathBuf>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    Ok(Some(Args {
        data_dir: args.opt_value_from_str("--data-dir")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        folder: args.opt_value_from_str("--folder")?,
        watch: args.contains("--watch"),
        roots: args.finish().into_iter().map(PathBuf::from).collect(),
    }))
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return;
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    flix::app::paths::init_cli_overrides(args.data_dir, args.config_dir);

    let config = config::load().unwrap_or_else(|e| {
        log::warn!("using default settings: {}", e);
        config::Config::default()
    });
    let roots = if args.roots.is_empty() {
        config.library_roots.clone()
    } else {
        args.roots
    };
    if roots.is_empty() {
        eprintln!("no library roots: pass ROOT directories or set library_roots in settings.toml");
        std::process::exit(2);
    }

    let (mut state, warning) = AppState::load();
    if let Some(warning) = warning {
        log::warn!("{}", warning);
    }
    let mut navigator = Navigator::restore(&state);
    if let Some(folder) = &args.folder {
        let key = GroupKey::new(folder.clone());
        navigator.open_folder(key.clone(), group_display_name(&key, &roots));
    }
    navigator.persist(&mut state);
    if let Some(warning) = state.save() {
        log::warn!("{}", warning);
    }

    let catalog: Arc<dyn MediaCatalog> =
        Arc::new(FsCatalog::new(roots.clone()).with_probe(Arc::new(FfmpegProbe::new())));
    let gallery = Arc::new(GalleryState::new(Arc::clone(&catalog), roots));

    if let Err(e) = gallery.fetch_all().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    let mut grouped = gallery.grouped();
    print_library(&grouped.borrow_and_update(), navigator.current());

    if !args.watch {
        return;
    }
    let watch = match catalog.watch() {
        Ok(watch) => watch,
        Err(e) => {
            eprintln!("error: cannot watch library: {e}");
            std::process::exit(1);
        }
    };
    let _listener = gallery.listen_for_changes(watch);
    while grouped.changed().await.is_ok() {
        println!();
        print_library(&grouped.borrow_and_update(), navigator.current());
    }
}

fn print_library(grouped: &GroupedVideos, route: &Route) {
    match route {
        Route::Folder { key, name } => {
            println!("{name}");
            for video in grouped.get(key).into_iter().flatten() {
                print_video(video);
            }
        }
        Route::Videos | Route::Albums => {
            for (key, videos) in grouped {
                let name = videos.first().map_or(key.as_str(), |v| v.group_name.as_str());
                println!("{name} ({} videos)", videos.len());
                for video in videos {
                    print_video(video);
                }
            }
        }
    }
}

fn print_video(video: &VideoRecord) {
    let added = DateTime::from_timestamp(video.date_added_secs, 0)
        .map(|date| date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!(
        "  {:<40} {:>5}x{:<5} {:>8} {}",
        video.display_name,
        video.width,
        video.height,
        format_duration(video.duration_ms),
        added
    );
}

fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
