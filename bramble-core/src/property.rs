//! Property definitions for property-based testing.

use crate::{data::*, error::*, shrinkable::*};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

/// A boxed future borrowed for `'a`. Properties return these for deferred evaluations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Outcome of evaluating a property on one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The value satisfied the property.
    Success,
    /// A precondition did not hold; the trial does not count.
    Skip,
    /// The value falsified the property.
    Failure(String),
}

impl Outcome {
    /// Create a failure with the given cause.
    pub fn failure(cause: impl Into<String>) -> Self {
        Outcome::Failure(cause.into())
    }

}

impl From<bool> for Outcome {
    fn from(holds: bool) -> Self {
        if holds {
            Outcome::Success
        } else {
            Outcome::failure("Property returned false")
        }
    }
}

impl<E: fmt::Display> From<std::result::Result<(), E>> for Outcome {
    fn from(result: std::result::Result<(), E>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(error) => Outcome::failure(error.to_string()),
        }
    }
}

/// Result of asking a property to evaluate a value.
pub enum Evaluation<'a> {
    /// The outcome is already known.
    Ready(Outcome),
    /// The outcome settles once the future resolves.
    Deferred(BoxFuture<'a, Outcome>),
}

impl<'a> Evaluation<'a> {
    /// Wrap a future as a deferred evaluation.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Outcome> + 'a,
    {
        Evaluation::Deferred(Box::pin(future))
    }
}

impl From<Outcome> for Evaluation<'_> {
    fn from(outcome: Outcome) -> Self {
        Evaluation::Ready(outcome)
    }
}

impl fmt::Debug for Evaluation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Ready(outcome) => f.debug_tuple("Ready").field(outcome).finish(),
            Evaluation::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// The capabilities the runner needs from a property.
///
/// `is_async` must not change over the lifetime of the property. A property
/// reporting `false` must only ever return [`Evaluation::Ready`].
pub trait Property {
    /// The generated value type.
    type Value;

    /// Whether evaluations may be deferred.
    fn is_async(&self) -> bool;

    /// Produce a fresh shrinkable value, drawing entropy only from `random`.
    ///
    /// An error here aborts the run.
    fn generate(&self, random: &mut Random) -> Result<Shrinkable<Self::Value>>;

    /// Evaluate the property on one value.
    fn evaluate<'a>(&'a self, value: &'a Self::Value) -> Evaluation<'a>;
}

/// A synchronous property built from a generator closure and a predicate closure.
pub struct FnProperty<T, G, E, O> {
    generate: G,
    evaluate: E,
    _marker: PhantomData<fn() -> (T, O)>,
}

impl<T, G, E, O> Property for FnProperty<T, G, E, O>
where
    G: Fn(&mut Random) -> Shrinkable<T>,
    E: Fn(&T) -> O,
    O: Into<Outcome>,
{
    type Value = T;

    fn is_async(&self) -> bool {
        false
    }

    fn generate(&self, random: &mut Random) -> Result<Shrinkable<T>> {
        Ok((self.generate)(random))
    }

    fn evaluate<'a>(&'a self, value: &'a T) -> Evaluation<'a> {
        Evaluation::Ready((self.evaluate)(value).into())
    }
}

/// An asynchronous property whose predicate returns a future.
///
/// The predicate receives its own clone of the value so the future can own it.
pub struct AsyncFnProperty<T, G, E, Fut> {
    generate: G,
    evaluate: E,
    _marker: PhantomData<fn() -> (T, Fut)>,
}

impl<T, G, E, Fut> Property for AsyncFnProperty<T, G, E, Fut>
where
    T: Clone,
    G: Fn(&mut Random) -> Shrinkable<T>,
    E: Fn(T) -> Fut,
    Fut: Future + 'static,
    Fut::Output: Into<Outcome>,
{
    type Value = T;

    fn is_async(&self) -> bool {
        true
    }

    fn generate(&self, random: &mut Random) -> Result<Shrinkable<T>> {
        Ok((self.generate)(random))
    }

    fn evaluate<'a>(&'a self, value: &'a T) -> Evaluation<'a> {
        let pending = (self.evaluate)(value.clone());
        Evaluation::deferred(async move {
            let outcome: Outcome = pending.await.into();
            outcome
        })
    }
}

/// Create a synchronous property from a generator and a predicate.
///
/// The predicate may return anything convertible into an [`Outcome`]:
/// a `bool`, a `Result<(), E>` or an `Outcome` itself.
pub fn property<T, G, E, O>(generate: G, evaluate: E) -> FnProperty<T, G, E, O>
where
    G: Fn(&mut Random) -> Shrinkable<T>,
    E: Fn(&T) -> O,
    O: Into<Outcome>,
{
    FnProperty {
        generate,
        evaluate,
        _marker: PhantomData,
    }
}

/// Create an asynchronous property from a generator and a future-returning predicate.
pub fn async_property<T, G, E, Fut>(generate: G, evaluate: E) -> AsyncFnProperty<T, G, E, Fut>
where
    T: Clone,
    G: Fn(&mut Random) -> Shrinkable<T>,
    E: Fn(T) -> Fut,
    Fut: Future + 'static,
    Fut::Output: Into<Outcome>,
{
    AsyncFnProperty {
        generate,
        evaluate,
        _marker: PhantomData,
    }
}
