#[macro_use]
extern crate lazy_static;

use std::error::Error;

use log::info;

use crate::repl::Repl;

mod config;
mod error;
mod render;
mod repl;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config: config::Config = config::figment().extract()?;
    let repl = Repl::new(&config);

    // Arguments are treated as a single line to evaluate
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        println!("{}", repl.respond(&args.join(" "))?);
        return Ok(());
    }

    info!("Starting repl with max depth {}", config.parser.max_depth);
    repl.run()?;
    info!("Exiting");
    Ok(())
}
