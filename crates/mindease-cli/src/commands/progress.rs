use clap::Subcommand;

use super::open_companion;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Streak, tier and weekly exercise count
    Summary,
    /// Every recorded check-in and exercise
    History,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let companion = open_companion()?;

    match action {
        ProgressAction::Summary => {
            let summary = companion.summary();
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ProgressAction::History => {
            let state = companion.progress().state();
            println!("{}", serde_json::to_string_pretty(state)?);
        }
    }
    Ok(())
}
