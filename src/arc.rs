//! The unit of work of arc-consistency refinement.
use std::fmt;
use std::hash::{Hash, Hasher};

/// An arc to be checked: one focal variable, the other variables attached to
/// the same constraint, and that constraint.
///
/// An arc refers to its vertices by name; the owning graph resolves the
/// names at use time. Names survive graph clones, so an arc minted before a
/// domain split stays valid in every branch.
#[derive(Clone, Debug, Default)]
pub struct Arc {
    pub main_var: String,
    pub other_vars: Vec<String>,
    pub constraint: String,
}

impl Arc {
    /// Creates an arc from the focal variable name, the other variable
    /// names in constraint-neighbour order, and the constraint name.
    pub fn new(main_var: &str, other_vars: Vec<String>, constraint: &str) -> Arc {
        Arc {
            main_var: String::from(main_var),
            other_vars,
            constraint: String::from(constraint),
        }
    }

    /// Returns `true` if the arc checks a unary constraint.
    pub fn is_unary(&self) -> bool {
        self.other_vars.is_empty()
    }

    /// The key under which equivalent arcs collide: focal name, the sorted
    /// deduplicated other names, and the constraint name. Two arcs that
    /// differ only in the order of their other variables perform the same
    /// check and get the same key.
    pub fn canonical_key(&self) -> String {
        let mut names = self
            .other_vars
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        format!("{}-{}-{}", self.main_var, names.join(""), self.constraint)
    }
}

impl PartialEq for Arc {
    fn eq(&self, other: &Arc) -> bool {
        self.canonical_key() == other.canonical_key()
    }
}

impl Eq for Arc {}

impl Hash for Arc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_key().hash(state);
    }
}

impl fmt::Display for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.main_var,
            self.other_vars.join(", "),
            self.constraint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unary_means_no_other_variables() {
        assert!(Arc::new("v", vec![], "c").is_unary());
        assert!(!Arc::new("v", vec![String::from("w")], "c").is_unary());
    }

    #[test]
    fn key_is_insensitive_to_other_variable_order() {
        let a = Arc::new("v", vec![String::from("x"), String::from("y")], "c");
        let b = Arc::new("v", vec![String::from("y"), String::from("x")], "c");
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(a, b);
    }

    #[test]
    fn key_collapses_duplicate_other_names() {
        let a = Arc::new("v", vec![String::from("x"), String::from("x")], "c");
        let b = Arc::new("v", vec![String::from("x")], "c");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_referents_get_distinct_keys() {
        let a = Arc::new("v", vec![String::from("x")], "c");
        assert_ne!(a, Arc::new("w", vec![String::from("x")], "c"));
        assert_ne!(a, Arc::new("v", vec![String::from("y")], "c"));
        assert_ne!(a, Arc::new("v", vec![String::from("x")], "d"));
        assert_ne!(a, Arc::new("v", vec![], "c"));
    }
}
