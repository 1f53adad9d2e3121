#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(missing_debug_implementations)]

//! # Cspsolve
//!
//! `cspsolve` solves constraint satisfaction problems over finite integer
//! domains by arc consistency with domain splitting. A problem is a
//! bipartite graph of variables and constraints; the solver prunes variable
//! domains until every branch is decided and reports every consistent
//! assignment it finds.

use colored::*;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::{
    fs::File,
    io,
    time::Instant,
};

use cspsolve::configuration::{DemoRegistry, Run, SolverOptions};
use cspsolve::creator;
use cspsolve::graph::CspGraph;
use cspsolve::metrics::Metrics;
use cspsolve::solver::CspSolver;
use cspsolve::vertex::VariableVertex;

/// Print error message to stderr and terminate
fn error(message: &str) -> ! {
    eprintln!("{} {}", "Error:".red(), message);
    std::process::exit(1);
}

/// Solves one graph, prints every assignment and records the run.
fn solve_and_report(problem: &str, graph: CspGraph) {
    let mut metrics = Metrics::new(problem);

    let start = Instant::now();
    let solutions = CspSolver::arc_consistency(graph);
    metrics.solve_time = start.elapsed();
    metrics.solutions = solutions.len();

    metrics.print();
    for solution in &solutions {
        println!("\t{}", render(solution));
    }
    if let Err(e) = metrics.write() {
        eprintln!("Couldn't write to file: {}", e);
    }
}

/// One assignment on one line.
fn render(solution: &[VariableVertex]) -> String {
    solution
        .iter()
        .map(|vv| vv.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn run(options: SolverOptions) -> io::Result<()> {
    match options.run {
        Run::Interactive => {
            let graph = creator::start()?;
            println!("> Solving the graph you built...");
            solve_and_report("interactive", graph);
        }

        Run::Demo => {
            if let Some(name) = &options.demo {
                if name == "all" {
                    DemoRegistry::all()
                        .par_iter()
                        .for_each(|(demo, build)| solve_and_report(demo, build()));
                } else if let Ok(build) = DemoRegistry::get(name) {
                    solve_and_report(name, build());
                }
            }
        }

        Run::Dot => {
            if let (Some(name), Some(path)) = (&options.demo, &options.dot) {
                if let Ok(build) = DemoRegistry::get(name) {
                    let mut file = File::create(path)?;
                    build().write_dot(&mut file);
                    println!("{}", format!("✔ Wrote {} to {}!", name, path).green());
                }
            }
        }
    }
    Ok(())
}

fn main() {
    let options = match SolverOptions::parse() {
        Ok(options) => options,
        Err(ref e) => error(&e.to_string()),
    };

    match run(options) {
        Ok(_) => {}
        Err(e) => error(&e.to_string()),
    }
}
