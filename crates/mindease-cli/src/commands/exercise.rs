use clap::Args;

use super::{open_companion, print_events};

#[derive(Args)]
pub struct ExerciseArgs {
    /// Minutes or sessions completed
    #[arg(long, default_value = "1")]
    duration: u32,
    #[arg(long)]
    json: bool,
}

pub fn run(args: ExerciseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut companion = open_companion()?;
    let events = companion.record_exercise(args.duration)?;
    print_events(&events, args.json)?;
    Ok(())
}
