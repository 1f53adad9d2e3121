//! The bipartite graph of variables and constraints, looked up by name.
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Write;

use crate::vertex::{ConstraintVertex, Predicate, VariableVertex};

/// A simple set implemented as a wrapper around Vec, preserving insertion
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Set<T: Eq> {
    items: Vec<T>,
}

impl<T: Eq> Set<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Inserts a value in the set.
    ///
    /// If the set did not have this value present, `true` is returned.
    ///
    /// If the set did have this value present, `false` is returned.
    pub fn insert(&mut self, x: T) -> bool {
        if self.items.contains(&x) {
            false
        } else {
            self.items.push(x);
            true
        }
    }

    /// Removes a value from the set, returning `true` if the value was
    /// previously in the set, `false` otherwise.
    pub fn remove(&mut self, x: &T) -> bool {
        let before = self.items.len();
        self.items.retain(|v| v != x);
        self.items.len() != before
    }

    /// Returns `true` if the set contains the given value.
    pub fn contains(&self, x: &T) -> bool {
        self.items.contains(x)
    }

    /// Returns the number of elements in the set.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// An iterator visiting all elements in insertion order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &T> + 'a {
        self.items.iter()
    }
}

impl<T: Eq> std::iter::FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Set::new();
        for x in iter {
            set.insert(x);
        }
        set
    }
}

/// The CSP graph. Variables and constraints live in two name-keyed maps and
/// every edge connects exactly one variable with exactly one constraint.
///
/// Mutations that would break the graph invariants are silent no-ops:
/// inserting a vertex under a taken name (of either kind) leaves the graph
/// unchanged, and so does adding an edge with a missing endpoint or between
/// two vertices of the same kind.
///
/// The maps are ordered by name, so snapshots such as
/// [`CspGraph::all_variable_names`] are reproducible for identically built
/// graphs. Neighbour lists keep edge insertion order.
#[derive(Clone, Debug, Default)]
pub struct CspGraph {
    variables: BTreeMap<String, VariableVertex>,
    constraints: BTreeMap<String, ConstraintVertex>,
    // vertex name -> names of its neighbours, symmetric
    edges: HashMap<String, Set<String>>,
}

impl CspGraph {
    /// Creates an empty `CspGraph`.
    pub fn new() -> CspGraph {
        CspGraph {
            variables: BTreeMap::new(),
            constraints: BTreeMap::new(),
            edges: HashMap::new(),
        }
    }

    /// Returns the variable with the given name, if present.
    pub fn get_variable(&self, name: &str) -> Option<&VariableVertex> {
        self.variables.get(name)
    }

    /// Returns the variable with the given name for mutation, if present.
    pub fn get_variable_mut(&mut self, name: &str) -> Option<&mut VariableVertex> {
        self.variables.get_mut(name)
    }

    /// Returns the constraint with the given name, if present.
    pub fn get_constraint(&self, name: &str) -> Option<&ConstraintVertex> {
        self.constraints.get(name)
    }

    /// Returns `true` if a vertex of either kind carries the given name.
    pub fn contains_vertex(&self, name: &str) -> bool {
        self.variables.contains_key(name) || self.constraints.contains_key(name)
    }

    /// Returns `true` if the two names denote adjacent vertices. Edges only
    /// ever connect a variable with a constraint, so any other pair of
    /// names, present or not, yields `false`.
    pub fn adjacent(&self, name1: &str, name2: &str) -> bool {
        self.edges.get(name1).map_or(false, |s| s.contains(&String::from(name2)))
    }

    /// Returns all constraints adjacent to the variable with the given name,
    /// in edge insertion order. Empty if the name is absent or does not
    /// denote a variable.
    pub fn constraint_neighbours(&self, name: &str) -> Vec<&ConstraintVertex> {
        if !self.variables.contains_key(name) {
            return Vec::new();
        }
        self.neighbour_names(name)
            .filter_map(|n| self.constraints.get(n))
            .collect()
    }

    /// Returns all variables adjacent to the constraint with the given name,
    /// in edge insertion order. Empty if the name is absent or does not
    /// denote a constraint.
    pub fn variable_neighbours(&self, name: &str) -> Vec<&VariableVertex> {
        if !self.constraints.contains_key(name) {
            return Vec::new();
        }
        self.neighbour_names(name)
            .filter_map(|n| self.variables.get(n))
            .collect()
    }

    /// Adds a variable with the given name and initial domain.
    ///
    /// If the name is already taken by a vertex of either kind, nothing
    /// happens and `false` is returned.
    pub fn add_variable(&mut self, name: &str, domain: impl IntoIterator<Item = i32>) -> bool {
        if self.contains_vertex(name) {
            return false;
        }
        self.variables
            .insert(String::from(name), VariableVertex::new(name, domain));
        self.edges.insert(String::from(name), Set::new());
        true
    }

    /// Adds a constraint with the given name, predicate and description.
    ///
    /// If the name is already taken by a vertex of either kind, nothing
    /// happens and `false` is returned.
    pub fn add_constraint(&mut self, name: &str, predicate: Predicate, description: &str) -> bool {
        if self.contains_vertex(name) {
            return false;
        }
        self.constraints.insert(
            String::from(name),
            ConstraintVertex::new(name, predicate, description),
        );
        self.edges.insert(String::from(name), Set::new());
        true
    }

    /// Adds an edge between a variable and a constraint, accepting the two
    /// names in either order.
    ///
    /// The edge is rejected (`false`) when either endpoint is missing or
    /// when both names denote vertices of the same kind. Adding an existing
    /// edge is a no-op.
    pub fn add_edge(&mut self, name1: &str, name2: &str) -> bool {
        let (vv_name, cv_name) = match self.classify_pair(name1, name2) {
            Some(pair) => pair,
            None => return false,
        };
        if self.adjacent(&vv_name, &cv_name) {
            return false;
        }
        if let Some(s) = self.edges.get_mut(&vv_name) {
            s.insert(cv_name.clone());
        }
        if let Some(s) = self.edges.get_mut(&cv_name) {
            s.insert(vv_name);
        }
        true
    }

    /// Removes the edge between the two named vertices, in either argument
    /// order. Removing an absent edge is a no-op.
    pub fn remove_edge(&mut self, name1: &str, name2: &str) -> bool {
        if !self.adjacent(name1, name2) {
            return false;
        }
        if let Some(s) = self.edges.get_mut(name1) {
            s.remove(&String::from(name2));
        }
        if let Some(s) = self.edges.get_mut(name2) {
            s.remove(&String::from(name1));
        }
        true
    }

    /// Removes the vertex with the given name together with every incident
    /// edge. Removing an absent name is a no-op.
    pub fn remove_vertex(&mut self, name: &str) -> bool {
        if self.variables.remove(name).is_none() && self.constraints.remove(name).is_none() {
            return false;
        }
        if let Some(neighbours) = self.edges.remove(name) {
            for other in neighbours.iter() {
                if let Some(s) = self.edges.get_mut(other) {
                    s.remove(&String::from(name));
                }
            }
        }
        true
    }

    /// Returns the names of all variables, in name order.
    pub fn all_variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    /// Returns the names of all constraints, in name order.
    pub fn all_constraint_names(&self) -> Vec<String> {
        self.constraints.keys().cloned().collect()
    }

    /// Writes the graph in dot format.
    pub fn write_dot(&self, output: &mut impl Write) {
        let mut s = String::from("graph {\n");
        for name in self.constraints.keys() {
            s.push_str(&format!("\"{}\" [shape=box];\n", name));
        }
        for name in self.variables.keys() {
            s.push_str(&format!("\"{}\";\n", name));
        }
        for (vv_name, cv) in self.variable_constraint_pairs() {
            s.push_str(&format!("\"{}\" -- \"{}\";\n", vv_name, cv));
        }
        s.push('}');
        output
            .write_all(s.as_bytes())
            .expect("Could not write the dot file!");
    }

    fn neighbour_names<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a String> {
        self.edges.get(name).into_iter().flat_map(|s| s.iter())
    }

    // every edge once, as (variable name, constraint name), variables in
    // name order and constraints in edge insertion order
    fn variable_constraint_pairs(&self) -> Vec<(&String, &String)> {
        self.variables
            .keys()
            .flat_map(|vv_name| {
                self.neighbour_names(vv_name)
                    .map(move |cv_name| (vv_name, cv_name))
            })
            .collect()
    }

    // given two names of assumed adjacent kinds, sort out which one is the
    // variable and which one the constraint
    fn classify_pair(&self, name1: &str, name2: &str) -> Option<(String, String)> {
        if self.variables.contains_key(name1) && self.constraints.contains_key(name2) {
            Some((String::from(name1), String::from(name2)))
        } else if self.variables.contains_key(name2) && self.constraints.contains_key(name1) {
            Some((String::from(name2), String::from(name1)))
        } else {
            None
        }
    }
}

impl fmt::Display for CspGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Constraints:")?;
        for cv in self.constraints.values() {
            writeln!(f, "  {}", cv)?;
        }
        writeln!(f, "Variables:")?;
        for vv in self.variables.values() {
            writeln!(f, "  {}", vv)?;
        }
        writeln!(f, "Edges:")?;
        for (vv_name, cv_name) in self.variable_constraint_pairs() {
            writeln!(f, "  {} -- {}", vv_name, cv_name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::ConstraintVertex;

    fn sample_graph() -> CspGraph {
        let mut g = CspGraph::new();
        g.add_constraint(
            "OnlyOneZero",
            ConstraintVertex::exactly(0, 1),
            "at most and at least one zero",
        );
        g.add_constraint(
            "SomeOne",
            ConstraintVertex::greater_or_equal(1, 1),
            "someone takes value one",
        );
        g.add_variable("a", vec![0, 1]);
        g.add_variable("b", vec![0, 1, 2]);
        g.add_edge("a", "OnlyOneZero");
        g.add_edge("b", "OnlyOneZero");
        g.add_edge("b", "SomeOne");
        g
    }

    #[test]
    fn lookup_by_name_and_kind() {
        let g = sample_graph();
        assert!(g.get_variable("a").is_some());
        assert!(g.get_variable("OnlyOneZero").is_none());
        assert!(g.get_constraint("OnlyOneZero").is_some());
        assert!(g.get_constraint("a").is_none());
        assert!(g.contains_vertex("a"));
        assert!(g.contains_vertex("SomeOne"));
        assert!(!g.contains_vertex("missing"));
    }

    #[test]
    fn first_insert_wins_on_name_collision() {
        let mut g = sample_graph();

        assert!(!g.add_variable("a", vec![7, 8, 9]));
        assert_eq!(
            g.get_variable("a").unwrap().domain().iter().cloned().collect::<Vec<_>>(),
            vec![0, 1]
        );

        // collisions are rejected across kinds as well
        assert!(!g.add_constraint("a", ConstraintVertex::exactly(0, 1), ""));
        assert!(!g.add_variable("OnlyOneZero", vec![1]));
        assert!(g.get_variable("OnlyOneZero").is_none());
        assert_eq!(
            g.get_constraint("OnlyOneZero").unwrap().description(),
            "at most and at least one zero"
        );
    }

    #[test]
    fn adjacency_is_symmetric() {
        let g = sample_graph();
        for vv in g.all_variable_names() {
            for cv in g.all_constraint_names() {
                assert_eq!(g.adjacent(&vv, &cv), g.adjacent(&cv, &vv));
            }
        }
        assert!(g.adjacent("a", "OnlyOneZero"));
        assert!(!g.adjacent("a", "SomeOne"));
    }

    #[test]
    fn adjacent_is_false_for_missing_names() {
        let g = sample_graph();
        assert!(!g.adjacent("a", "missing"));
        assert!(!g.adjacent("missing", "a"));
        assert!(!g.adjacent("missing", "also missing"));
        // same-kind pairs are never adjacent
        assert!(!g.adjacent("a", "b"));
        assert!(!g.adjacent("OnlyOneZero", "SomeOne"));
    }

    #[test]
    fn add_edge_accepts_either_order_and_is_idempotent() {
        let mut g = CspGraph::new();
        g.add_variable("v", vec![1]);
        g.add_constraint("c", ConstraintVertex::exactly(1, 1), "");

        assert!(g.add_edge("c", "v"));
        assert!(g.adjacent("v", "c"));
        assert!(!g.add_edge("v", "c"));
        assert_eq!(g.constraint_neighbours("v").len(), 1);
    }

    #[test]
    fn add_edge_rejects_missing_or_same_kind_endpoints() {
        let mut g = sample_graph();
        assert!(!g.add_edge("a", "missing"));
        assert!(!g.add_edge("missing", "OnlyOneZero"));
        assert!(!g.add_edge("a", "b"));
        assert!(!g.add_edge("OnlyOneZero", "SomeOne"));
        assert!(!g.adjacent("a", "b"));
    }

    #[test]
    fn neighbour_queries_follow_edge_insertion_order() {
        let g = sample_graph();
        let names = g
            .variable_neighbours("OnlyOneZero")
            .iter()
            .map(|vv| vv.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b"]);

        let names = g
            .constraint_neighbours("b")
            .iter()
            .map(|cv| cv.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["OnlyOneZero", "SomeOne"]);
    }

    #[test]
    fn neighbour_queries_on_absent_or_wrong_kind_names_are_empty() {
        let g = sample_graph();
        assert!(g.variable_neighbours("missing").is_empty());
        assert!(g.constraint_neighbours("missing").is_empty());
        // wrong kind: "a" is a variable, "OnlyOneZero" a constraint
        assert!(g.variable_neighbours("a").is_empty());
        assert!(g.constraint_neighbours("OnlyOneZero").is_empty());
    }

    #[test]
    fn remove_vertex_cascades_incident_edges() {
        let mut g = sample_graph();

        assert!(g.remove_vertex("b"));
        assert!(!g.contains_vertex("b"));
        assert!(!g.adjacent("b", "OnlyOneZero"));
        assert!(!g.adjacent("b", "SomeOne"));

        // the constraints stay, with their remaining neighbours
        let names = g
            .variable_neighbours("OnlyOneZero")
            .iter()
            .map(|vv| vv.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a"]);
        assert!(g.variable_neighbours("SomeOne").is_empty());
    }

    #[test]
    fn removals_of_absent_targets_are_no_ops() {
        let mut g = sample_graph();
        assert!(!g.remove_vertex("missing"));
        assert!(!g.remove_edge("a", "SomeOne"));
        assert!(!g.remove_edge("missing", "OnlyOneZero"));
        assert!(g.adjacent("a", "OnlyOneZero"));

        assert!(g.remove_edge("OnlyOneZero", "a"));
        assert!(!g.adjacent("a", "OnlyOneZero"));
        assert!(!g.remove_edge("OnlyOneZero", "a"));
        assert!(g.contains_vertex("a"));
        assert!(g.contains_vertex("OnlyOneZero"));
    }

    #[test]
    fn clone_is_independent_of_the_source() {
        let g = sample_graph();
        let mut h = g.clone();

        h.remove_vertex("a");
        h.get_variable_mut("b").unwrap().remove_from_domain(2);

        assert!(g.contains_vertex("a"));
        assert!(!h.contains_vertex("a"));
        assert_eq!(g.get_variable("b").unwrap().domain().len(), 3);
        assert_eq!(h.get_variable("b").unwrap().domain().len(), 2);
        assert!(g.adjacent("a", "OnlyOneZero"));
    }

    #[test]
    fn name_snapshots_are_sorted() {
        let mut g = CspGraph::new();
        g.add_variable("zeta", vec![1]);
        g.add_variable("alpha", vec![1]);
        g.add_constraint("mid", ConstraintVertex::exactly(1, 1), "");
        assert_eq!(g.all_variable_names(), vec!["alpha", "zeta"]);
        assert_eq!(g.all_constraint_names(), vec!["mid"]);
    }

    #[test]
    fn single_square_sudoku_wires_up_completely() {
        let mut g = CspGraph::new();
        for k in 1..=9 {
            g.add_constraint(
                &format!("OnlyOne{}", k),
                ConstraintVertex::exactly(k, 1),
                &format!("we can have only one {} in the square", k),
            );
        }
        for i in 1..=9 {
            g.add_variable(&format!("Square {}", i), 1..=9);
            for k in 1..=9 {
                g.add_edge(&format!("Square {}", i), &format!("OnlyOne{}", k));
            }
        }

        assert_eq!(g.all_variable_names().len(), 9);
        assert_eq!(g.all_constraint_names().len(), 9);
        for vv_name in g.all_variable_names() {
            assert_eq!(g.constraint_neighbours(&vv_name).len(), 9);
        }
        for cv_name in g.all_constraint_names() {
            assert_eq!(g.variable_neighbours(&cv_name).len(), 9);
        }

        // dropping one square leaves every constraint with eight neighbours
        g.remove_vertex("Square 5");
        for cv_name in g.all_constraint_names() {
            assert_eq!(g.variable_neighbours(&cv_name).len(), 8);
        }
    }

    #[test]
    fn dot_output_lists_vertices_and_edges() {
        let g = sample_graph();
        let mut buffer = Vec::new();
        g.write_dot(&mut buffer);
        let dot = String::from_utf8(buffer).unwrap();
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("\"OnlyOneZero\" [shape=box];"));
        assert!(dot.contains("\"a\" -- \"OnlyOneZero\";"));
        assert!(dot.contains("\"b\" -- \"SomeOne\";"));
    }
}
