//! Interactive, line-oriented construction of a CSP graph.
//!
//! The dialogue recognises short and long command tokens, case-insensitive:
//! `AC`/`ADDCONSTRAINT`, `AV`/`ADDVARIABLE`, `AE`/`ADDEDGE`,
//! `RV`/`REMOVEVERTEX`, `RE`/`REMOVEEDGE` and `E`/`EXIT`/`END`. The current
//! graph is echoed after each command so mistakes surface immediately.
use std::io::{self, BufRead, Write};

use crate::graph::CspGraph;
use crate::vertex::{ConstraintVertex, Predicate};

/// Builds a [`CspGraph`] from a line-oriented dialogue over any pair of
/// input/output streams.
pub struct CspGraphCreator<R, W> {
    input: R,
    output: W,
}

/// Runs the graph-creation dialogue on stdin/stdout.
pub fn start() -> io::Result<CspGraph> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    CspGraphCreator::new(stdin.lock(), stdout.lock()).run()
}

impl<R: BufRead, W: Write> CspGraphCreator<R, W> {
    /// Creates a creator reading commands from `input` and prompting on
    /// `output`.
    pub fn new(input: R, output: W) -> CspGraphCreator<R, W> {
        CspGraphCreator { input, output }
    }

    /// Runs the dialogue until `E`/`EXIT`/`END` or end of input, returning
    /// the graph built so far.
    pub fn run(mut self) -> io::Result<CspGraph> {
        let mut graph = CspGraph::new();
        writeln!(self.output, "Initiating graph creation.")?;

        loop {
            write!(self.output, "APP > ")?;
            self.output.flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => break,
            };
            if line.is_empty() {
                continue;
            }

            match line.to_uppercase().as_str() {
                "AC" | "ADDCONSTRAINT" => {
                    self.add_constraint(&mut graph)?;
                    writeln!(self.output, "{}", graph)?;
                }
                "AV" | "ADDVARIABLE" => {
                    self.add_variable(&mut graph)?;
                    writeln!(self.output, "{}", graph)?;
                }
                "AE" | "ADDEDGE" => {
                    self.add_edge(&mut graph)?;
                    writeln!(self.output, "{}", graph)?;
                }
                "RV" | "REMOVEVERTEX" => {
                    self.remove_vertex(&mut graph)?;
                    writeln!(self.output, "{}", graph)?;
                }
                "RE" | "REMOVEEDGE" => {
                    self.remove_edge(&mut graph)?;
                    writeln!(self.output, "{}", graph)?;
                }
                "E" | "EXIT" | "END" => break,
                _ => {
                    writeln!(
                        self.output,
                        "Unrecognised command: {}. Known commands: AC, AV, AE, RV, RE, E.",
                        line
                    )?;
                }
            }
        }

        writeln!(self.output, "Goodbye.")?;
        Ok(graph)
    }

    fn add_constraint(&mut self, graph: &mut CspGraph) -> io::Result<()> {
        let name = self.prompt("Constraint name?")?;
        let factory: fn(i32, i32) -> Predicate = loop {
            let comparator = self.prompt("Comparator? (<=, >= or =)")?;
            match comparator.to_uppercase().as_str() {
                "<=" | "LE" => break ConstraintVertex::less_or_equal,
                ">=" | "GE" => break ConstraintVertex::greater_or_equal,
                "=" | "==" | "EQ" => break ConstraintVertex::exactly,
                _ => writeln!(self.output, "Unrecognised comparator: {}", comparator)?,
            }
        };
        let checked = self.prompt_int("Checked value?")?;
        let n = self.prompt_int("Threshold n?")?;
        let description = self.prompt("Description?")?;

        if !graph.add_constraint(&name, factory(checked, n), &description) {
            writeln!(self.output, "The name {} is already taken, nothing added.", name)?;
        }
        Ok(())
    }

    fn add_variable(&mut self, graph: &mut CspGraph) -> io::Result<()> {
        let name = self.prompt("Variable name?")?;
        let mut domain = Vec::new();
        while self.prompt_yes_no("Add a domain value? (Y/N)")? {
            domain.push(self.prompt_int("Value?")?);
        }
        if !graph.add_variable(&name, domain) {
            writeln!(self.output, "The name {} is already taken, nothing added.", name)?;
        }
        Ok(())
    }

    fn add_edge(&mut self, graph: &mut CspGraph) -> io::Result<()> {
        let vv_name = self.prompt("Variable name?")?;
        let cv_name = self.prompt("Constraint name?")?;
        if !graph.add_edge(&vv_name, &cv_name) {
            writeln!(
                self.output,
                "No edge added between {} and {}.",
                vv_name, cv_name
            )?;
        }
        Ok(())
    }

    fn remove_vertex(&mut self, graph: &mut CspGraph) -> io::Result<()> {
        let name = self.prompt("Vertex name?")?;
        if !graph.remove_vertex(&name) {
            writeln!(self.output, "No vertex named {}.", name)?;
        }
        Ok(())
    }

    fn remove_edge(&mut self, graph: &mut CspGraph) -> io::Result<()> {
        let name1 = self.prompt("First endpoint?")?;
        let name2 = self.prompt("Second endpoint?")?;
        if !graph.remove_edge(&name1, &name2) {
            writeln!(self.output, "No edge between {} and {}.", name1, name2)?;
        }
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> io::Result<String> {
        writeln!(self.output, "{}", message)?;
        match self.read_line()? {
            Some(line) => Ok(line),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended mid-dialogue",
            )),
        }
    }

    fn prompt_int(&mut self, message: &str) -> io::Result<i32> {
        loop {
            let line = self.prompt(message)?;
            match line.parse::<i32>() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Not an integer: {}", line)?,
            }
        }
    }

    fn prompt_yes_no(&mut self, message: &str) -> io::Result<bool> {
        loop {
            let answer = self.prompt(message)?;
            match answer.to_uppercase().as_str() {
                "Y" | "YES" => return Ok(true),
                "N" | "NO" => return Ok(false),
                _ => writeln!(self.output, "Please answer Y or N.")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from(line.trim())))
    }
}
