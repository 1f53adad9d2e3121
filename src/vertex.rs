//! Variable and constraint vertices of the bipartite CSP graph.
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// The predicate carried by a constraint vertex. It receives the value
/// currently probed for the focal variable and the other variables attached
/// to the constraint, and decides whether the constraint can still be met.
///
/// A predicate must tolerate an empty slice of other variables (the unary
/// case), and the stock factories below are monotone: once a predicate
/// returns `false` for a focal value, removing further values from any
/// participating domain never turns the verdict back to `true`.
pub type Predicate = Rc<dyn Fn(i32, &[&VariableVertex]) -> bool>;

/// A variable of the CSP: a unique name together with a finite integer
/// domain. The domain is kept sorted, so iteration order is stable across
/// runs and across graph clones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableVertex {
    name: String,
    domain: BTreeSet<i32>,
}

impl VariableVertex {
    /// Creates a variable with the given name and initial domain.
    pub fn new(name: &str, domain: impl IntoIterator<Item = i32>) -> VariableVertex {
        VariableVertex {
            name: String::from(name),
            domain: domain.into_iter().collect(),
        }
    }

    /// Returns the name of the variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current domain.
    pub fn domain(&self) -> &BTreeSet<i32> {
        &self.domain
    }

    /// Adds a value to the domain.
    ///
    /// If the domain did not have this value present, `true` is returned.
    ///
    /// If the domain did have this value present, `false` is returned.
    pub fn add_to_domain(&mut self, value: i32) -> bool {
        self.domain.insert(value)
    }

    /// Adds every value of the iterator to the domain.
    pub fn add_all_to_domain(&mut self, values: impl IntoIterator<Item = i32>) {
        self.domain.extend(values);
    }

    /// Removes a value from the domain, returning `true` if the value was
    /// previously present, `false` otherwise.
    pub fn remove_from_domain(&mut self, value: i32) -> bool {
        self.domain.remove(&value)
    }

    /// Removes every value of the iterator from the domain.
    pub fn remove_all_from_domain(&mut self, values: impl IntoIterator<Item = i32>) {
        for value in values {
            self.domain.remove(&value);
        }
    }
}

impl fmt::Display for VariableVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name)?;
        for (i, value) in self.domain.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "}}")
    }
}

/// A constraint of the CSP: a unique name, a display-only description and an
/// opaque predicate. Cloning a constraint shares the predicate, which is
/// immutable.
#[derive(Clone)]
pub struct ConstraintVertex {
    name: String,
    description: String,
    predicate: Predicate,
}

impl ConstraintVertex {
    /// Creates a constraint with the given name, predicate and description.
    pub fn new(name: &str, predicate: Predicate, description: &str) -> ConstraintVertex {
        ConstraintVertex {
            name: String::from(name),
            description: String::from(description),
            predicate,
        }
    }

    /// Returns the name of the constraint.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display description of the constraint.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Applies the predicate to a focal value and the other variables
    /// attached to the constraint. `others` is empty for unary constraints.
    pub fn is_met(&self, focal_value: i32, others: &[&VariableVertex]) -> bool {
        (self.predicate)(focal_value, others)
    }

    /// Builds a predicate checking that at most `n` of the participating
    /// variables end up with the value `checked`.
    ///
    /// Only variables already pinned to `checked` (singleton domain) are
    /// counted; the focal variable counts through the probed value itself.
    /// Further domain removals can only lower that count, so a `false`
    /// verdict is final.
    pub fn less_or_equal(checked: i32, n: i32) -> Predicate {
        Rc::new(move |focal_value, others| {
            let mut has_to_be = 0;
            if focal_value == checked {
                has_to_be += 1;
            }
            for var in others {
                let domain = var.domain();
                if domain.len() == 1 && domain.contains(&checked) {
                    has_to_be += 1;
                }
                if has_to_be > n {
                    return false;
                }
            }
            has_to_be <= n
        })
    }

    /// Builds a predicate checking that at least `n` of the participating
    /// variables can still end up with the value `checked`.
    ///
    /// Every variable whose domain still contains `checked` counts. Domain
    /// removals only lower that optimistic count, so a `false` verdict is
    /// final.
    pub fn greater_or_equal(checked: i32, n: i32) -> Predicate {
        Rc::new(move |focal_value, others| {
            let mut can_be = 0;
            if focal_value == checked {
                can_be += 1;
            }
            if can_be >= n {
                return true;
            }
            for var in others {
                if var.domain().contains(&checked) {
                    can_be += 1;
                }
                if can_be >= n {
                    return true;
                }
            }
            can_be >= n
        })
    }

    /// Builds a predicate checking that exactly `n` of the participating
    /// variables end up with the value `checked`: no more than `n` are
    /// pinned to it, and no fewer than `n` can still reach it.
    pub fn exactly(checked: i32, n: i32) -> Predicate {
        Rc::new(move |focal_value, others| {
            let mut can_be = 0;
            let mut has_to_be = 0;
            if focal_value == checked {
                can_be += 1;
                has_to_be += 1;
            }
            for var in others {
                let domain = var.domain();
                if domain.contains(&checked) {
                    can_be += 1;
                    if domain.len() == 1 {
                        has_to_be += 1;
                    }
                }
                if has_to_be > n {
                    return false;
                }
            }
            has_to_be <= n && can_be >= n
        })
    }
}

impl PartialEq for ConstraintVertex {
    fn eq(&self, other: &ConstraintVertex) -> bool {
        // predicates are opaque, names are unique within a graph
        self.name == other.name
    }
}

impl Eq for ConstraintVertex {}

impl fmt::Debug for ConstraintVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintVertex")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

impl fmt::Display for ConstraintVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}
