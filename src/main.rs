use clap::Parser;
use std::env;

mod blogger;
mod config;
mod error;
mod helpers;
mod logging;
mod openaiapi;
mod pipeline;
mod prompt;


use config::{Cli, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Cli::parse();
	logging::init_logging()?;

	let config = Config::resolve(args, |name| env::var(name).ok())?;

	let outcome = pipeline::run(&config).await?;
	println!("{}", outcome.success_line());
	Ok(())
}
