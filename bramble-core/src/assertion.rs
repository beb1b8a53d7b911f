//! Assertions that turn a failed run into an error.

use crate::{data::*, error::*, property::*, report::*, runner::*};
use std::fmt::Debug;

/// Run a synchronous property and fail with a descriptive error if it is falsified.
///
/// ```
/// use bramble_core::*;
///
/// let prop = property(
///     |random: &mut Random| Shrinkable::new(random.next_int(0, 100)),
///     |&x: &i64| x >= 0,
/// );
/// assert(&prop, &Config::default().with_seed(42)).unwrap();
/// ```
pub fn assert<P>(property: &P, config: &Config) -> Result<()>
where
    P: Property,
    P::Value: Clone + Debug + 'static,
{
    into_result(check(property, config)?)
}

/// Asynchronous counterpart of [`assert`].
pub async fn assert_async<P>(property: &P, config: &Config) -> Result<()>
where
    P: Property,
    P::Value: Clone + Debug + 'static,
{
    into_result(check_async(property, config).await?)
}

fn into_result<T: Debug>(details: RunDetails<T>) -> Result<()> {
    match details.failure_message() {
        None => Ok(()),
        Some(message) => Err(BrambleError::PropertyFailed {
            message,
            seed: details.seed,
            total_runs: details.total_runs,
            counterexample_path: details.counterexample_path.unwrap_or_default(),
        }),
    }
}
