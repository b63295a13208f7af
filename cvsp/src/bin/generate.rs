use std::fs::File;
use std::io::{self, Write};

use clap::{App, Arg, ArgMatches};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cvsp::generator;
use sepgraph::SepGraph;

fn main() {
    let matches = App::new("generate")
        .version("0.1.0")
        .about("Generates a random graph and exports its definition to a file.")
        .arg(
            Arg::with_name("nodes")
                .short("n")
                .long("nodes")
                .takes_value(true)
                .help("number of nodes for a random graph (default 20)"),
        )
        .arg(
            Arg::with_name("probability")
                .short("p")
                .long("probability")
                .takes_value(true)
                .help("edge probability for a random graph (default 0.2)"),
        )
        .arg(
            Arg::with_name("grid")
                .long("grid")
                .takes_value(true)
                .conflicts_with_all(&["nodes", "probability", "seed"])
                .help("generate a ROWSxCOLS grid graph instead, e.g. '5x5'"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("seed the random generator for reproducible output"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output-file")
                .takes_value(true)
                .help("write the definition to OUTPUT_FILE instead of stdout"),
        )
        .get_matches();

    if let Err(message) = run(&matches) {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let graph = build_graph(matches)?;

    match matches.value_of("output") {
        Some(output) => {
            let mut file = File::create(output).map_err(|e| e.to_string())?;
            graph.write_definition(&mut file).map_err(|e| e.to_string())?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            graph.write_definition(&mut handle).map_err(|e| e.to_string())?;
            handle.flush().map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

fn build_graph(matches: &ArgMatches) -> Result<SepGraph, String> {
    if let Some(shape) = matches.value_of("grid") {
        let dimensions: Vec<&str> = shape.split('x').collect();
        if dimensions.len() != 2 {
            return Err(format!("grid shape '{}' is not of the form ROWSxCOLS", shape));
        }
        let rows: usize = dimensions[0]
            .parse()
            .map_err(|_| format!("bad row count '{}'", dimensions[0]))?;
        let cols: usize = dimensions[1]
            .parse()
            .map_err(|_| format!("bad column count '{}'", dimensions[1]))?;
        if rows == 0 || cols == 0 {
            return Err(String::from("grid dimensions must be positive"));
        }
        return generator::grid(rows, cols).map_err(|e| e.to_string());
    }

    let nodes: usize = matches
        .value_of("nodes")
        .unwrap_or("20")
        .parse()
        .map_err(|_| String::from("the node count must be a number"))?;
    let probability: f64 = matches
        .value_of("probability")
        .unwrap_or("0.2")
        .parse()
        .map_err(|_| String::from("the edge probability must be a number"))?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(String::from("the edge probability must lie in [0, 1]"));
    }

    let mut rng = match matches.value_of("seed") {
        Some(seed) => {
            let seed: u64 = seed
                .parse()
                .map_err(|_| String::from("the seed must be a number"))?;
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    generator::gnp(nodes, probability, &mut rng).map_err(|e| e.to_string())
}
