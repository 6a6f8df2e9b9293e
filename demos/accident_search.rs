//! Accident subgroup search example
//!
//! Loads the Belo Horizonte accident reports, derives the period-of-day and
//! year columns, and searches for the subgroup with the fewest accidents.
//!
//! Usage: `cargo run --example accident_search -- [path/to/acidentes.csv]`

use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Write};

use subgroup_mcts::{accidents, find_subgroup, Dataset, MCTSConfig, SubgroupConfig, Value};

const DEFAULT_PATH: &str = "./data/acidentes.csv";

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    println!("MCTS Accident Subgroup Search");
    println!("=============================");
    println!();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_PATH.to_string());
    let dataset = load_reports(&path)?;
    println!(
        "Loaded {} reports with {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        path
    );

    let dataset = accidents::prepare(&dataset)?;

    let rollouts = loop {
        print!("Number of rollouts [100]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim();
        if input.is_empty() {
            break 100;
        }
        match input.parse::<usize>() {
            Ok(n) if n > 0 => break n,
            _ => println!("Invalid count! Enter a positive number."),
        }
    };

    let config = SubgroupConfig::default().with_mcts(
        MCTSConfig::default()
            .with_exploration_constant(1.414)
            .with_max_iterations(rollouts),
    );

    println!("Searching...");
    let report = find_subgroup(dataset, &config)?;

    println!();
    println!("{}", report);
    println!();
    println!("Principal path:");
    for (depth, conditions) in report.principal_path.iter().enumerate() {
        println!("{}{}", "  ".repeat(depth), conditions);
    }
    println!();
    println!("{}", report.statistics.summary());

    Ok(())
}

/// Reads an ISO-8859-1 encoded, comma separated report file
fn load_reports(path: &str) -> Result<Dataset, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    // Latin-1 maps every byte to the code point of the same value.
    let text: String = bytes.iter().map(|&b| b as char).collect();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Value::parse).collect());
    }

    Ok(Dataset::new(columns, rows)?)
}
