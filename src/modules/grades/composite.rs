//! Grade aggregation tree.
//!
//! Report generation groups a student's scores by subject and averages
//! the groups. Leaves and groups share the [`GradeComponent`] capability,
//! so groups can nest to arbitrary depth; a nested group contributes its
//! own averaged value as a single unit to its parent rather than being
//! flattened into the parent's leaves.

/// A node in the aggregation tree: anything that can produce a value.
pub trait GradeComponent {
    fn value(&self) -> f64;
}

/// A single numeric score, the smallest unit of the tree.
#[derive(Debug, Clone, Copy)]
pub struct LeafGrade {
    score: f64,
}

impl LeafGrade {
    pub fn new(score: f64) -> Self {
        Self { score }
    }
}

impl GradeComponent for LeafGrade {
    fn value(&self) -> f64 {
        self.score
    }
}

/// A named, ordered collection of grade components.
///
/// The value is the unweighted arithmetic mean of the immediate
/// children, recomputed on every call. An empty group evaluates to 0;
/// callers must treat that as "no data", not as a failing score.
pub struct GradeGroup {
    name: String,
    children: Vec<Box<dyn GradeComponent>>,
}

impl GradeGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a component. Duplicates are allowed and order does not
    /// affect the result.
    pub fn add(&mut self, component: Box<dyn GradeComponent>) {
        self.children.push(component);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl GradeComponent for GradeGroup {
    fn value(&self) -> f64 {
        if self.children.is_empty() {
            return 0.0;
        }

        let total: f64 = self.children.iter().map(|child| child.value()).sum();
        total / self.children.len() as f64
    }
}
