//! Lazily expanded shrink trees for minimising counterexamples.

use std::fmt;
use std::rc::Rc;

/// A single-pass, possibly infinite sequence of shrink candidates.
pub type Shrinks<T> = Box<dyn Iterator<Item = Shrinkable<T>>>;

type Expand<T> = Rc<dyn Fn() -> Shrinks<T>>;

/// A generated value together with a recipe for its simpler variants.
///
/// Children are never stored. Each call to [`Shrinkable::shrink`] rebuilds the
/// child sequence from the expansion closure, so the same node can be
/// enumerated again and yields the same children in the same order.
pub struct Shrinkable<T> {
    pub value: T,
    expand: Option<Expand<T>>,
}

impl<T> Shrinkable<T> {
    /// Create a leaf with no shrinks.
    pub fn new(value: T) -> Self {
        Shrinkable {
            value,
            expand: None,
        }
    }

    /// Get the value from the node.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the value out of the node, dropping its shrinks.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Check if the node can be expanded at all.
    pub fn has_shrinks(&self) -> bool {
        self.expand.is_some()
    }
}

impl<T: 'static> Shrinkable<T> {
    /// Create a node whose children are produced by `expand` on demand.
    ///
    /// `expand` must be deterministic: every call has to yield the same
    /// children in the same order.
    pub fn with_shrinks<F, I>(value: T, expand: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = Shrinkable<T>>,
        I::IntoIter: 'static,
    {
        Shrinkable {
            value,
            expand: Some(Rc::new(move || Box::new(expand().into_iter()) as Shrinks<T>)),
        }
    }

    /// Start a fresh enumeration of this node's children.
    pub fn shrink(&self) -> Shrinks<T> {
        match &self.expand {
            Some(expand) => expand(),
            None => Box::new(std::iter::empty()),
        }
    }

    /// Map a function over the value and, lazily, over every descendant.
    pub fn map<U, F>(self, f: F) -> Shrinkable<U>
    where
        U: 'static,
        F: Fn(T) -> U + Clone + 'static,
    {
        let Shrinkable { value, expand } = self;
        let mapped = f(value);

        match expand {
            None => Shrinkable::new(mapped),
            Some(expand) => Shrinkable::with_shrinks(mapped, move || {
                let f = f.clone();
                expand().map(move |child| child.map(f.clone()))
            }),
        }
    }

    /// Drop descendants whose value fails the predicate, along with their subtrees.
    ///
    /// The root is always kept.
    pub fn filter<F>(self, predicate: F) -> Shrinkable<T>
    where
        F: Fn(&T) -> bool + Clone + 'static,
    {
        let Shrinkable { value, expand } = self;

        match expand {
            None => Shrinkable::new(value),
            Some(expand) => Shrinkable::with_shrinks(value, move || {
                let keep = predicate.clone();
                let descend = predicate.clone();
                expand()
                    .filter(move |child| keep(&child.value))
                    .map(move |child| child.filter(descend.clone()))
            }),
        }
    }
}

impl<T: Clone> Clone for Shrinkable<T> {
    fn clone(&self) -> Self {
        Shrinkable {
            value: self.value.clone(),
            expand: self.expand.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shrinkable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shrinkable")
            .field("value", &self.value)
            .field("has_shrinks", &self.has_shrinks())
            .finish()
    }
}

impl<T> From<T> for Shrinkable<T> {
    fn from(value: T) -> Self {
        Shrinkable::new(value)
    }
}
