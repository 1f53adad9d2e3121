//! Arc consistency with domain splitting over a [`CspGraph`].
use std::io;

use crate::arc::Arc;
use crate::creator;
use crate::frontier::Frontier;
use crate::graph::CspGraph;
use crate::vertex::VariableVertex;

/// The solver. Takes a CSP graph by value, repeatedly refines the variable
/// domains one arc at a time and splits on an undecided variable when the
/// refinement gets stuck, until every reachable branch is classified.
pub struct CspSolver;

impl CspSolver {
    /// Runs arc consistency and returns every consistent assignment, one
    /// `Vec` of singleton-domain variables per solution. The result is
    /// empty when the problem is infeasible; branches are appended in
    /// split order and not deduplicated.
    pub fn arc_consistency(graph: CspGraph) -> Vec<Vec<VariableVertex>> {
        let mut frontier = Frontier::new();
        Self::all_to_do_arcs(&mut frontier, &graph);
        Self::arc_consistency_trampoline(frontier, graph)
    }

    /// Runs DFS with pruning and returns every consistent assignment.
    ///
    /// Reserved: nothing is enumerated yet and the graph is left untouched.
    pub fn depth_first_search_with_pruning(_graph: CspGraph) -> Vec<Vec<VariableVertex>> {
        Vec::new()
    }

    /// Saves a created CSP graph.
    ///
    /// Not implemented yet; the predicates are opaque closures and there is
    /// no way to serialise them so far.
    pub fn save_csp_graph(_graph: &CspGraph, _save_dir: &str) {}

    /// Loads a CSP graph.
    ///
    /// Not implemented yet, see [`CspSolver::save_csp_graph`].
    pub fn load_csp_graph(_load_dir: &str) -> Option<CspGraph> {
        None
    }

    /// Builds a CSP graph interactively on stdin/stdout.
    pub fn create_csp_graph() -> io::Result<CspGraph> {
        creator::start()
    }

    // Seeds the frontier with every arc derivable from the graph: for each
    // constraint, each variable neighbour once as the focal variable, the
    // remaining neighbours in order.
    fn all_to_do_arcs(frontier: &mut Frontier, graph: &CspGraph) {
        for cv_name in graph.all_constraint_names() {
            let neighbours = graph
                .variable_neighbours(&cv_name)
                .iter()
                .map(|vv| String::from(vv.name()))
                .collect::<Vec<_>>();
            for focal in &neighbours {
                let others = neighbours
                    .iter()
                    .filter(|name| *name != focal)
                    .cloned()
                    .collect::<Vec<_>>();
                frontier.push(Arc::new(focal, others, &cv_name));
            }
        }
    }

    // After the domain of `arc.main_var` shrank under `arc.constraint`,
    // queues every check whose verdict may have changed: all arcs of the
    // *other* constraints adjacent to the shrunk variable, with any other
    // neighbour as the focal variable. The arc just checked does not
    // re-queue itself.
    //
    // Only `arc.main_var` and the edges are consulted, so a synthetic arc
    // with an empty constraint name seeds the re-checks after a domain
    // split just as well.
    fn all_check_again_arcs(frontier: &mut Frontier, graph: &CspGraph, arc: &Arc) {
        for cv in graph.constraint_neighbours(&arc.main_var) {
            if cv.name() == arc.constraint {
                continue;
            }
            let neighbours = graph
                .variable_neighbours(cv.name())
                .iter()
                .map(|vv| String::from(vv.name()))
                .collect::<Vec<_>>();
            for focal in &neighbours {
                if *focal == arc.main_var {
                    continue;
                }
                let others = neighbours
                    .iter()
                    .filter(|name| *name != focal)
                    .cloned()
                    .collect::<Vec<_>>();
                frontier.push(Arc::new(focal, others, cv.name()));
            }
        }
    }

    // One refinement step: pop an arc, drop every focal value its
    // constraint rejects against the current domains of the other
    // variables, and on any removal queue the affected re-checks.
    fn single_step(graph: &mut CspGraph, frontier: &mut Frontier) {
        let arc = match frontier.pop() {
            Some(arc) => arc,
            None => return,
        };

        let to_remove = {
            let constraint = match graph.get_constraint(&arc.constraint) {
                Some(cv) => cv,
                None => return,
            };
            let main_var = match graph.get_variable(&arc.main_var) {
                Some(vv) => vv,
                None => return,
            };
            let others = arc
                .other_vars
                .iter()
                .filter_map(|name| graph.get_variable(name))
                .collect::<Vec<_>>();

            main_var
                .domain()
                .iter()
                .cloned()
                .filter(|&value| !constraint.is_met(value, &others))
                .collect::<Vec<_>>()
        };

        if to_remove.is_empty() {
            return;
        }
        if let Some(main_var) = graph.get_variable_mut(&arc.main_var) {
            main_var.remove_all_from_domain(to_remove);
        }
        Self::all_check_again_arcs(frontier, graph, &arc);
    }

    // Classifies the graph, returning a snapshot of the variables in name
    // order and whether the classification is final. An empty domain means
    // infeasible: the snapshot is dropped and `true` returned. A domain
    // with two or more values means splitting is still required (`false`).
    // All-singleton domains are a unique answer (`true`).
    fn check_answer(graph: &CspGraph) -> (Vec<VariableVertex>, bool) {
        let mut snapshot = Vec::new();
        let mut undecided = false;
        for name in graph.all_variable_names() {
            let vv = match graph.get_variable(&name) {
                Some(vv) => vv,
                None => continue,
            };
            if vv.domain().is_empty() {
                return (Vec::new(), true);
            }
            if vv.domain().len() > 1 {
                undecided = true;
            }
            snapshot.push(vv.clone());
        }
        (snapshot, !undecided)
    }

    // One clone of the graph per value in the domain of the named variable,
    // in ascending value order, with the clone's variable reduced to that
    // single value. Empty when the variable is missing or its domain empty.
    fn split_domain(graph: &CspGraph, name: &str) -> Vec<CspGraph> {
        let domain = match graph.get_variable(name) {
            Some(vv) => vv.domain().clone(),
            None => return Vec::new(),
        };
        domain
            .iter()
            .map(|&kept| {
                let mut branch = graph.clone();
                if let Some(vv) = branch.get_variable_mut(name) {
                    let dropped = vv
                        .domain()
                        .iter()
                        .cloned()
                        .filter(|&value| value != kept)
                        .collect::<Vec<_>>();
                    vv.remove_all_from_domain(dropped);
                }
                branch
            })
            .collect()
    }

    // The fixpoint: step until the frontier drains or the classification
    // is final, then either emit the zero-or-one answer or split the first
    // undecided variable and recurse into each branch with a copy of the
    // frontier seeded for the split.
    fn arc_consistency_trampoline(
        mut frontier: Frontier,
        mut graph: CspGraph,
    ) -> Vec<Vec<VariableVertex>> {
        while !frontier.is_empty() {
            let (_, determinate) = Self::check_answer(&graph);
            if determinate {
                break;
            }
            Self::single_step(&mut graph, &mut frontier);
        }

        let (answer, determinate) = Self::check_answer(&graph);
        if determinate {
            if answer.is_empty() {
                return Vec::new();
            }
            return vec![answer];
        }

        let split_name = match answer.iter().find(|vv| vv.domain().len() > 1) {
            Some(vv) => String::from(vv.name()),
            // indeterminate guarantees an undecided variable
            None => return Vec::new(),
        };

        let mut solutions = Vec::new();
        for branch in Self::split_domain(&graph, &split_name) {
            let mut branch_frontier = frontier.clone();
            let split_arc = Arc {
                main_var: split_name.clone(),
                ..Arc::default()
            };
            Self::all_check_again_arcs(&mut branch_frontier, &branch, &split_arc);
            solutions.extend(Self::arc_consistency_trampoline(branch_frontier, branch));
        }
        solutions
    }
}
