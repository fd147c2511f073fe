use clap::Args;
use mindease_core::chat;

#[derive(Args)]
pub struct ChatArgs {
    /// What you want to say
    #[arg(required = true, trailing_var_arg = true)]
    message: Vec<String>,
}

pub fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let message = args.message.join(" ");
    match chat::respond(&message, &mut rand::thread_rng()) {
        Some(reply) => println!("{reply}"),
        None => return Err("message is empty".into()),
    }
    Ok(())
}
