use std::path::{Path, PathBuf};

use pomocourse_core::state::export_file_name;
use serde_json::json;

use super::{open_container, print_json, Clock, CmdResult};

/// Write the document to `out`, or stdout when no path is given.
///
/// A directory gets a timestamped backup file inside it.
pub fn export(out: Option<PathBuf>, clock: &Clock) -> CmdResult {
    let container = open_container(clock)?;
    let json = container.export_json()?;

    match out {
        None => println!("{json}"),
        Some(path) => {
            let path = if path.is_dir() {
                path.join(export_file_name(clock.now))
            } else {
                path
            };
            std::fs::write(&path, json)?;
            print_json(&json!({ "exported": path }))?;
        }
    }
    Ok(())
}

pub fn import(file: &Path, clock: &Clock) -> CmdResult {
    let json = std::fs::read_to_string(file)?;
    let mut container = open_container(clock)?;
    container.import_json(&json)?;
    print_json(&json!({
        "imported": file,
        "days": container.state().schedule.len(),
        "points": container.state().gamification.points,
    }))
}
