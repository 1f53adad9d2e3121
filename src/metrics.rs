//! Bookkeeping about solve runs.
use std::fs::OpenOptions;
use std::io::{Error, Write};
use std::time::Duration;

use colored::Colorize;
use humantime::format_duration;

use crate::configuration::Globals;

/// Metrics is a struct which allows to store some information about one
/// solve run.
#[derive(Debug)]
pub struct Metrics {
    pub problem: String,
    pub solutions: usize,
    pub solve_time: Duration,
}

impl Metrics {
    pub fn new(problem: &str) -> Metrics {
        Metrics {
            problem: String::from(problem),
            solutions: 0,
            solve_time: Duration::default(),
        }
    }

    /// Appends the run as one CSV line under the configured data directory.
    pub fn write(&self) -> Result<(), Error> {
        let path = format!("{}/solve_runs.csv", Globals::get().data);

        if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
            writeln!(
                file,
                "{},{},{:?}",
                self.problem, self.solutions, self.solve_time
            )?;
        }
        Ok(())
    }

    pub fn print(&self) {
        if self.solutions > 0 {
            let msg = format!(
                "\t✔ {} has {} solution(s)!",
                self.problem, self.solutions
            );
            println!("{}", msg.green());
        } else {
            let msg = format!("\t✘ {} has no solution!", self.problem);
            println!("{}", msg.red());
        };
        println!("\tsolve_time: {}", format_duration(self.solve_time));
    }
}
