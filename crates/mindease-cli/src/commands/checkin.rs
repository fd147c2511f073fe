use clap::Args;
use mindease_core::Mood;

use super::{open_companion, print_events};

#[derive(Args)]
pub struct CheckinArgs {
    /// Happy, Calm, Stressed or Anxious
    mood: String,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

pub fn run(args: CheckinArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut companion = open_companion()?;
    let mood = Mood::from(args.mood);
    if !mood.is_known() {
        tracing::warn!(%mood, "unrecognized mood, checking in without styling");
    }
    let selection = companion.select_mood(mood);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        println!("{}", selection.feedback);
        print_events(&selection.events[1..], false)?;
    }
    Ok(())
}
