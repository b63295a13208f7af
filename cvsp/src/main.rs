use std::fs::File;
use std::io::Write;
use std::path::Path;

use clap::{App, Arg, ArgMatches};

use cvsp::{cvsp_solver, Library};
use sepgraph::SepGraph;

const DEF_INPUT_FILE: &str = "./data/graph1.txt";
const DEF_LIBRARY: &str = "z3";
const DEF_FORMULATION: &str = "1";
const DEF_K_VALUE: &str = "3";
const DEF_B_VALUE: &str = "3";

fn main() {
    let matches = App::new("cvsp")
        .version("0.1.0")
        .about(
            "Calculates the optimal solution to the Capacitated Vertex Separator \
             Problem (CVSP) on a graph through various formulations using integer \
             optimization approaches.",
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input-file")
                .takes_value(true)
                .help("import graph's definition from INPUT_FILE"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output-file")
                .takes_value(true)
                .help("export the solution to OUTPUT_FILE"),
        )
        .arg(
            Arg::with_name("library")
                .short("l")
                .long("library")
                .takes_value(true)
                .help("optimization library to use: 'highs' or 'z3'"),
        )
        .arg(
            Arg::with_name("formulation")
                .short("f")
                .long("formulation")
                .takes_value(true)
                .help("problem formulation to use: [1-4] for highs, [1-8] for z3"),
        )
        .arg(
            Arg::with_name("k")
                .short("k")
                .long("k-value")
                .takes_value(true)
                .help("number of remaining shores"),
        )
        .arg(
            Arg::with_name("b")
                .short("b")
                .long("b-value")
                .takes_value(true)
                .help("max number of nodes on the remaining shores"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("suppress all normal cli output"),
        )
        .get_matches();

    if let Err(message) = run(&matches) {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let input = matches.value_of("input").unwrap_or(DEF_INPUT_FILE);
    let library: Library = matches
        .value_of("library")
        .unwrap_or(DEF_LIBRARY)
        .parse()?;
    let formulation: usize = matches
        .value_of("formulation")
        .unwrap_or(DEF_FORMULATION)
        .parse()
        .map_err(|_| String::from("the formulation index must be a number"))?;
    if formulation == 0 {
        return Err(String::from("formulation indices start at 1"));
    }
    let k_value: u32 = matches
        .value_of("k")
        .unwrap_or(DEF_K_VALUE)
        .parse()
        .map_err(|_| String::from("k must be a positive number"))?;
    let b_value: u32 = matches
        .value_of("b")
        .unwrap_or(DEF_B_VALUE)
        .parse()
        .map_err(|_| String::from("b must be a positive number"))?;
    let quiet = matches.is_present("quiet");

    let graph = SepGraph::from_path(input).map_err(|e| e.to_string())?;
    if !quiet {
        println!(
            "Loaded '{}': {} nodes, {} edges",
            input,
            graph.node_count(),
            graph.edge_count()
        );
    }

    let solution = cvsp_solver(&graph, library, formulation - 1, k_value, b_value, quiet)
        .map_err(|e| e.to_string())?;

    let solution = match solution {
        Some(solution) => solution,
        None => return Ok(()),
    };

    let rendered = solution.to_display(&graph);
    if !quiet {
        println!("\nSolution: {}", rendered);
    }

    let output = matches
        .value_of("output")
        .map(str::to_owned)
        .unwrap_or_else(|| default_output(input));
    let mut file = File::create(&output).map_err(|e| e.to_string())?;
    writeln!(file, "{}", rendered).map_err(|e| e.to_string())?;
    if !quiet {
        println!("Solution exported to '{}'", output);
    }

    Ok(())
}

fn default_output(input: &str) -> String {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("graph");
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
        _ => String::from("."),
    };
    format!(
        "{}/{}_solution_{}.txt",
        parent,
        stem,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    )
}
