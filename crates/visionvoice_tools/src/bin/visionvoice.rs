#![forbid(unsafe_code)]

use std::env;
use std::io::{self, Read};

use visionvoice_tools::order_cli::run_order;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 1 || args[0] != "order" {
        return Err("usage: visionvoice order < tokens.json".to_string());
    }

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| e.to_string())?;

    let output = run_order(&input)?;
    println!("{output}");
    Ok(())
}
