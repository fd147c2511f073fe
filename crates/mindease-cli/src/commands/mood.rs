use clap::Subcommand;
use mindease_core::Mood;

use super::{open_companion, print_events};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Set the current mood without checking in
    Set {
        /// Happy, Calm, Stressed or Anxious
        mood: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the current mood
    Show,
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut companion = open_companion()?;

    match action {
        MoodAction::Set { mood, json } => {
            let event = companion.set_mood(Mood::from(mood));
            print_events(&[event], json)?;
        }
        MoodAction::Show => match companion.current_mood() {
            Some(mood) => match mood.color() {
                Some(color) => println!("{mood} ({color})"),
                None => println!("{mood}"),
            },
            None => println!("unset"),
        },
    }
    Ok(())
}
