use clap::Subcommand;
use pomocourse_core::SettingsPatch;

use super::{open_container, print_json, Clock, CmdResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the timer settings as JSON
    Show,
    /// Change one or more timer settings
    Set {
        /// Work phase length in minutes
        #[arg(long)]
        work_min: Option<u32>,
        /// Short break length in minutes
        #[arg(long)]
        short_break_min: Option<u32>,
        /// Long break length in minutes
        #[arg(long)]
        long_break_min: Option<u32>,
        /// Work phases per long break
        #[arg(long)]
        long_break_after: Option<u32>,
    },
}

pub fn run(action: SettingsAction, clock: &Clock) -> CmdResult {
    let mut container = open_container(clock)?;
    match action {
        SettingsAction::Show => print_json(&container.state().settings)?,
        SettingsAction::Set {
            work_min,
            short_break_min,
            long_break_min,
            long_break_after,
        } => {
            let patch = SettingsPatch {
                work_min,
                short_break_min,
                long_break_min,
                long_break_after,
            };
            if patch.is_empty() {
                return Err("nothing to set; pass at least one --*-min/--long-break-after flag".into());
            }
            let settings = container.update_settings(&patch)?;
            print_json(settings)?;
        }
    }
    Ok(())
}
