use clap::Subcommand;

use super::{open_companion, print_events};

#[derive(Subcommand)]
pub enum SoundAction {
    /// Flip sound cues on or off
    Toggle,
    /// Print whether sound cues are on
    Status,
}

pub fn run(action: SoundAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut companion = open_companion()?;

    match action {
        SoundAction::Toggle => {
            let event = companion.toggle_sound();
            print_events(&[event], false)?;
        }
        SoundAction::Status => {
            let on = companion.audio().sound_enabled();
            println!("{}", if on { "On" } else { "Off" });
        }
    }
    Ok(())
}
