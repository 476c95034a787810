use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use shapeboard::config::Config;
use shapeboard::session::{self, SessionOptions};
use shapeboard::ShapeStore;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "shapeboard")]
#[command(
    version,
    about = "Shape editing core with selection, transforms and undo/redo history"
)]
struct Cli {
    /// Show where the saved session lives and what it contains
    #[arg(long, group = "command", action = ArgAction::SetTrue)]
    session_info: bool,

    /// Delete the saved session, its backup and lock file
    #[arg(long, group = "command", action = ArgAction::SetTrue)]
    clear_session: bool,

    /// Write the saved canvas to PATH as plain JSON
    #[arg(long, group = "command", value_name = "PATH")]
    export: Option<PathBuf>,

    /// Validate an exported canvas at PATH and make it the saved session
    #[arg(long, group = "command", value_name = "PATH")]
    import: Option<PathBuf>,

    /// Write a documented default config file
    #[arg(long, group = "command", action = ArgAction::SetTrue)]
    init_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created default config at {}", path.display());
        return Ok(());
    }

    let config = Config::load()?;
    let config_path = Config::get_config_path()?;
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let options = session::options_from_config(&config, config_dir)?;

    if cli.session_info {
        print_session_info(&options)?;
    } else if cli.clear_session {
        let outcome = session::clear_session(&options)?;
        if outcome.removed_session || outcome.removed_backup || outcome.removed_lock {
            println!("Cleared session data in {}", options.base_dir.display());
        } else {
            println!("No session data found in {}", options.base_dir.display());
        }
    } else if let Some(path) = cli.export {
        let frame = session::load_snapshot(&options)?.unwrap_or_default();
        let bytes = session::export_state(&frame)?;
        fs::write(&path, bytes)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        println!("Exported {} shapes to {}", frame.len(), path.display());
    } else if let Some(path) = cli.import {
        let bytes =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let mut store = ShapeStore::from_config(&config);
        store
            .import_state(&bytes)
            .with_context(|| format!("failed to import {}", path.display()))?;
        if !options.persist {
            log::warn!("Session persistence is disabled; import validated but not saved");
        }
        session::save_snapshot(store.frame(), &options)?;
        println!(
            "Imported {} shapes into {}",
            store.shapes().len(),
            options.session_file_path().display()
        );
    } else {
        println!("shapeboard: Shape editing core with undo/redo history");
        println!();
        println!("Usage:");
        println!("  shapeboard --session-info     Show the saved session");
        println!("  shapeboard --clear-session    Delete the saved session");
        println!("  shapeboard --export <PATH>    Export the saved canvas as JSON");
        println!("  shapeboard --import <PATH>    Import a canvas as the saved session");
        println!("  shapeboard --init-config      Create ~/.config/shapeboard/config.toml");
        println!("  shapeboard --help             Show help");
    }

    Ok(())
}

fn print_session_info(options: &SessionOptions) -> Result<()> {
    let info = session::inspect_session(options)?;

    if !info.exists {
        println!("No session file at {}", info.session_path.display());
        return Ok(());
    }

    println!("Session file: {}", info.session_path.display());
    if let Some(size) = info.size_bytes {
        println!("  Size: {} bytes", size);
    }
    if let Some(modified) = info.modified {
        let modified: chrono::DateTime<chrono::Local> = modified.into();
        println!("  Modified: {}", modified.to_rfc3339());
    }
    println!("  Compressed: {}", if info.compressed { "yes" } else { "no" });
    println!("  Shapes: {}", info.shape_count.unwrap_or(0));
    match info.selected {
        Some(id) => println!("  Selected: {}", id),
        None => println!("  Selected: none"),
    }
    if info.backup_exists {
        println!(
            "  Backup: {} ({} bytes)",
            info.backup_path.display(),
            info.backup_size_bytes.unwrap_or(0)
        );
    }
    if !info.persist {
        println!("  Persistence is disabled in the config");
    }
    Ok(())
}
