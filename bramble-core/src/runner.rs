//! Trial runner and shrink search.
//!
//! A run generates values until `num_runs` trials have passed or one fails.
//! A failure hands the failing node to the shrink search, which walks the
//! node's children in order and descends into the first one that still
//! fails, until a level yields no failing child.
//!
//! The algorithm is written once as an `async` routine. [`check`] drives it
//! to completion without an executor: synchronous properties only return
//! ready evaluations, so the routine never suspends.

use crate::{data::*, error::*, property::*, report::*, shrinkable::*};
use log::{debug, trace};
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::time::Duration;

/// Run a synchronous property and report the outcome.
///
/// Trial failures are reported in the returned [`RunDetails`]; only contract
/// violations, generation faults and invalid configuration are errors.
pub fn check<P>(property: &P, config: &Config) -> Result<RunDetails<P::Value>>
where
    P: Property,
    P::Value: Clone + 'static,
{
    if property.is_async() {
        return Err(BrambleError::contract(
            "asynchronous property must be run with check_async",
        ));
    }

    let runner = Runner::new(property, config, Mode::Blocking)?;
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut run = pin!(runner.run());

    match run.as_mut().poll(&mut cx) {
        Poll::Ready(details) => details,
        Poll::Pending => Err(BrambleError::contract(
            "synchronous run suspended on a pending evaluation",
        )),
    }
}

/// Run a property, awaiting deferred evaluations one at a time.
///
/// Accepts synchronous properties too. When `config.timeout` is set and the
/// property is asynchronous, each evaluation is raced against a Tokio timer,
/// so the future must be polled inside a Tokio runtime with time enabled.
pub async fn check_async<P>(property: &P, config: &Config) -> Result<RunDetails<P::Value>>
where
    P: Property,
    P::Value: Clone + 'static,
{
    Runner::new(property, config, Mode::Suspending)?.run().await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Deferred evaluations are a contract violation.
    Blocking,
    /// Deferred evaluations are awaited.
    Suspending,
}

struct Runner<'p, P> {
    property: &'p P,
    mode: Mode,
    seed: u64,
    num_runs: usize,
    timeout: Option<Duration>,
    verbose: bool,
    replay_path: Option<Vec<usize>>,
}

impl<'p, P> Runner<'p, P>
where
    P: Property,
    P::Value: Clone + 'static,
{
    fn new(property: &'p P, config: &Config, mode: Mode) -> Result<Self> {
        let replay_path = config.replay_path()?;
        let timeout = if property.is_async() {
            config.timeout
        } else {
            None
        };

        Ok(Runner {
            property,
            mode,
            seed: config.seed.unwrap_or_else(random_seed),
            num_runs: config.num_runs,
            timeout,
            verbose: config.verbose,
            replay_path,
        })
    }

    async fn run(self) -> Result<RunDetails<P::Value>> {
        debug!(
            "starting run (seed: {}, runs: {}, replay: {:?})",
            self.seed, self.num_runs, self.replay_path
        );
        let mut random = Random::new(self.seed);
        let mut execution = RunExecution::new(self.verbose);

        let failure = match &self.replay_path {
            Some(path) => self.replay(&mut random, path, &mut execution).await?,
            None => self.explore(&mut random, &mut execution).await?,
        };

        let counterexample = match failure {
            Some(node) => Some(self.shrink(node, &mut execution).await?),
            None => None,
        };

        Ok(execution.into_details(self.seed, counterexample))
    }

    /// Generate and evaluate fresh values until enough pass or one fails.
    async fn explore(
        &self,
        random: &mut Random,
        execution: &mut RunExecution<P::Value>,
    ) -> Result<Option<Shrinkable<P::Value>>> {
        let mut index = 0;
        while execution.total_runs() < self.num_runs {
            let node = self.property.generate(random)?;
            if let Some(failing) = self.trial(&[index], node, execution).await? {
                return Ok(Some(failing));
            }
            index += 1;
        }
        Ok(None)
    }

    /// Regenerate the node a previous run reported and evaluate only that one.
    async fn replay(
        &self,
        random: &mut Random,
        path: &[usize],
        execution: &mut RunExecution<P::Value>,
    ) -> Result<Option<Shrinkable<P::Value>>> {
        let Some((&trial, descent)) = path.split_first() else {
            return Err(BrambleError::InvalidConfig {
                message: "replay path is empty".to_string(),
            });
        };

        let mut node = self.property.generate(random)?;
        for _ in 0..trial {
            node = self.property.generate(random)?;
        }

        for (depth, &index) in descent.iter().enumerate() {
            node = node
                .shrink()
                .nth(index)
                .ok_or_else(|| BrambleError::InvalidConfig {
                    message: format!(
                        "replay path has no shrink at index {index} (depth {})",
                        depth + 1
                    ),
                })?;
        }

        self.trial(path, node, execution).await
    }

    /// Evaluate one generated node. Returns it back when it fails.
    async fn trial(
        &self,
        path: &[usize],
        node: Shrinkable<P::Value>,
        execution: &mut RunExecution<P::Value>,
    ) -> Result<Option<Shrinkable<P::Value>>> {
        match self.evaluate(&node.value).await? {
            Outcome::Success => {
                execution.success();
                Ok(None)
            }
            Outcome::Skip => {
                trace!("trial {path:?} skipped");
                execution.skip();
                Ok(None)
            }
            Outcome::Failure(cause) => {
                debug!("trial {path:?} failed: {cause}");
                execution.fail(path, &node.value, cause);
                Ok(Some(node))
            }
        }
    }

    /// Descend into the first failing child of each level until none fails.
    async fn shrink(
        &self,
        node: Shrinkable<P::Value>,
        execution: &mut RunExecution<P::Value>,
    ) -> Result<P::Value> {
        let mut current = node;

        'descend: loop {
            for (index, child) in current.shrink().enumerate() {
                if let Outcome::Failure(cause) = self.evaluate(&child.value).await? {
                    trace!("shrink descended into child {index}");
                    execution.shrink(index, &child.value, cause);
                    current = child;
                    continue 'descend;
                }
            }
            break;
        }

        debug!("shrink search settled");
        Ok(current.into_value())
    }

    async fn evaluate(&self, value: &P::Value) -> Result<Outcome> {
        match self.property.evaluate(value) {
            Evaluation::Ready(outcome) => Ok(outcome),
            Evaluation::Deferred(pending) => match (self.mode, self.timeout) {
                (Mode::Blocking, _) => Err(BrambleError::contract(
                    "synchronous property returned a deferred evaluation",
                )),
                (Mode::Suspending, Some(limit)) => Ok(tokio::time::timeout(limit, pending)
                    .await
                    .unwrap_or_else(|_| {
                        Outcome::failure(format!(
                            "Property timeout: exceeded limit of {} milliseconds",
                            limit.as_millis()
                        ))
                    })),
                (Mode::Suspending, None) => Ok(pending.await),
            },
        }
    }
}

struct NoopWaker;

impl Wake for NoopWaker {
    fn wake(self: Arc<Self>) {}
    fn wake_by_ref(self: &Arc<Self>) {}
}

fn noop_waker() -> Waker {
    Arc::new(NoopWaker).into()
}
