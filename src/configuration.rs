#![allow(missing_docs)]
#![allow(missing_debug_implementations)]
//! Command line configuration of the solver binary.
use std::error::Error;
use std::fmt;
use std::ops::Deref;

use clap::{App, Arg};
use lazy_static::lazy_static;
use std::sync::{RwLock, RwLockReadGuard};

use crate::graph::CspGraph;
use crate::vertex::ConstraintVertex;

/// A set of options for the solver binary.
pub struct SolverOptions {
    /// Name of the built-in demo problem to solve, or `all`
    pub demo: Option<String>,

    /// Name of the file the graph will be written to (in dot format)
    pub dot: Option<String>,

    /// How the program should run
    pub run: Run,
}

#[derive(Debug)]
pub enum OptionsError {
    /// No demo problem registered with that name
    DemoNotFound,
    /// Neither an interactive session nor a demo was requested
    NothingToDo,
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OptionsError::DemoNotFound => {
                write!(f, "No demo problem registered with that name")
            }
            OptionsError::NothingToDo => {
                write!(f, "Nothing to do, pass --interactive or --demo")
            }
        }
    }
}

impl Error for OptionsError {}

#[derive(Debug)]
pub enum Run {
    /// Build a graph in a command line dialogue, then solve it
    Interactive,

    /// Solve one or all of the built-in demo problems
    Demo,

    /// Write a demo graph to dot-format instead of solving it
    Dot,
}

impl SolverOptions {
    pub fn parse() -> Result<SolverOptions, OptionsError> {
        let args = App::new("Cspsolve")
            .version("1.0")
            .about("An arc-consistency solver for CSPs over finite integer domains.")
            .arg(
                Arg::with_name("interactive")
                    .short("i")
                    .long("interactive")
                    .conflicts_with("demo")
                    .help("Build a graph in a command line dialogue, then solve it"),
            )
            .arg(
                Arg::with_name("demo")
                    .short("p")
                    .long("demo")
                    .takes_value(true)
                    .value_name("NAME")
                    .help("Solve the demo problem NAME, or every one with 'all'"),
            )
            .arg(
                Arg::with_name("dot")
                    .short("D")
                    .long("dot")
                    .requires("demo")
                    .takes_value(true)
                    .value_name("FILE")
                    .help("Write the demo graph to FILE (in dot format) instead of solving"),
            )
            .arg(
                Arg::with_name("data")
                    .short("d")
                    .long("data")
                    .value_name("PATH")
                    .default_value("data")
                    .help("Where to store solve results")
                    .takes_value(true),
            )
            .get_matches();

        let demo = args.value_of("demo").map(|s| s.to_string());
        if let Some(name) = demo.as_ref() {
            if name != "all" {
                DemoRegistry::get(name)?;
            }
        }
        let dot = args.value_of("dot").map(|s| s.to_string());

        let run = if args.is_present("dot") {
            Run::Dot
        } else if args.is_present("interactive") {
            Run::Interactive
        } else if args.is_present("demo") {
            Run::Demo
        } else {
            return Err(OptionsError::NothingToDo);
        };

        let data = args.value_of("data").unwrap_or("data").to_string();
        Globals::set(Globals { data });

        Ok(SolverOptions { demo, dot, run })
    }
}

#[derive(Default)]
pub struct Globals {
    pub data: String,
}

lazy_static! {
    static ref GLOBALS: RwLock<Option<Globals>> = RwLock::new(Some(Globals {
        data: String::new()
    }));
}

impl Globals {
    pub fn new(data: &str) -> Self {
        Globals { data: data.into() }
    }

    pub fn get() -> impl Deref<Target = Globals> {
        struct Guard(RwLockReadGuard<'static, Option<Globals>>);
        impl Deref for Guard {
            type Target = Globals;
            fn deref(&self) -> &Globals {
                self.0.as_ref().expect("Initialize globals first")
            }
        }
        Guard(GLOBALS.read().expect("RwLock is poisoned"))
    }

    pub fn set(value: Globals) {
        *GLOBALS.write().expect("RwLock is poisoned") = Some(value);
    }
}

/// The built-in demo problems, each a function building a fresh graph.
pub struct DemoRegistry;

impl DemoRegistry {
    pub fn get(demo: &str) -> Result<fn() -> CspGraph, OptionsError> {
        match demo {
            "forced" => Ok(forced),
            "infeasible" => Ok(infeasible),
            "pair" => Ok(pair),
            "permutation" => Ok(permutation),
            "roles" => Ok(roles),
            &_ => Err(OptionsError::DemoNotFound),
        }
    }

    pub fn all() -> Vec<(&'static str, fn() -> CspGraph)> {
        vec![
            ("forced", forced as fn() -> CspGraph),
            ("infeasible", infeasible),
            ("pair", pair),
            ("permutation", permutation),
            ("roles", roles),
        ]
    }
}

// one variable, one unary constraint that pins it
fn forced() -> CspGraph {
    let mut g = CspGraph::new();
    g.add_variable("V", vec![0, 10]);
    g.add_constraint("OneZero", ConstraintVertex::exactly(0, 1), "exactly one zero");
    g.add_edge("V", "OneZero");
    g
}

// as `forced`, with an empty domain: no assignment exists
fn infeasible() -> CspGraph {
    let mut g = CspGraph::new();
    g.add_variable("V", vec![]);
    g.add_constraint("OneZero", ConstraintVertex::exactly(0, 1), "exactly one zero");
    g.add_edge("V", "OneZero");
    g
}

// two variables fighting over a single one
fn pair() -> CspGraph {
    let mut g = CspGraph::new();
    g.add_variable("A", vec![0, 1]);
    g.add_variable("B", vec![0, 1]);
    g.add_constraint("OneOne", ConstraintVertex::exactly(1, 1), "exactly one one");
    g.add_edge("A", "OneOne");
    g.add_edge("B", "OneOne");
    g
}

// four squares, each value used exactly once: the 24 permutations
fn permutation() -> CspGraph {
    let mut g = CspGraph::new();
    for k in 1..=4 {
        g.add_constraint(
            &format!("OnlyOne{}", k),
            ConstraintVertex::exactly(k, 1),
            &format!("only one square holds {}", k),
        );
    }
    for i in 1..=4 {
        g.add_variable(&format!("Square {}", i), 1..=4);
        for k in 1..=4 {
            g.add_edge(&format!("Square {}", i), &format!("OnlyOne{}", k));
        }
    }
    g
}

// a crew of four: one captain, at least one engineer, at most two doctors
fn roles() -> CspGraph {
    let mut g = CspGraph::new();
    g.add_constraint("OneCaptain", ConstraintVertex::exactly(0, 1), "exactly one captain");
    g.add_constraint(
        "SomeEngineer",
        ConstraintVertex::greater_or_equal(1, 1),
        "at least one engineer",
    );
    g.add_constraint(
        "FewDoctors",
        ConstraintVertex::less_or_equal(2, 2),
        "at most two doctors",
    );
    for i in 1..=4 {
        let name = format!("Crew {}", i);
        g.add_variable(&name, vec![0, 1, 2]);
        g.add_edge(&name, "OneCaptain");
        g.add_edge(&name, "SomeEngineer");
        g.add_edge(&name, "FewDoctors");
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::CspSolver;

    #[test]
    fn registry_knows_every_demo() {
        for (name, _) in DemoRegistry::all() {
            assert!(DemoRegistry::get(name).is_ok());
        }
        assert!(DemoRegistry::get("unheard-of").is_err());
    }

    #[test]
    fn demo_problems_solve_as_advertised() {
        assert_eq!(CspSolver::arc_consistency(forced()).len(), 1);
        assert!(CspSolver::arc_consistency(infeasible()).is_empty());
        assert_eq!(CspSolver::arc_consistency(pair()).len(), 2);
        assert_eq!(CspSolver::arc_consistency(permutation()).len(), 24);
    }

    #[test]
    fn roles_demo_always_staffs_the_ship() {
        let solutions = CspSolver::arc_consistency(roles());
        assert!(!solutions.is_empty());
        for solution in &solutions {
            let values = solution
                .iter()
                .map(|vv| *vv.domain().iter().next().unwrap())
                .collect::<Vec<_>>();
            assert_eq!(values.iter().filter(|&&v| v == 0).count(), 1);
            assert!(values.iter().any(|&v| v == 1));
            assert!(values.iter().filter(|&&v| v == 2).count() <= 2);
        }
    }
}
