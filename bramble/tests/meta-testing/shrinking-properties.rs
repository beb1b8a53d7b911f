//! Shrink search properties
//!
//! These properties check that the shrink search takes the first failing
//! child at every level and reports the path it took.

use crate::{arbitrary_count, arbitrary_seed, expect_pass, inner_run};
use bramble::*;
use std::cell::Cell;
use std::rc::Rc;

/// Node with `depth` levels of endless identical children.
fn deep(depth: usize) -> Shrinkable<usize> {
    if depth == 0 {
        return Shrinkable::new(depth);
    }
    Shrinkable::with_shrinks(depth, move || std::iter::repeat_with(move || deep(depth - 1)))
}

/// Shrinks towards `0`: zero first, then half, then one less.
fn towards_zero(value: i64) -> Shrinkable<i64> {
    Shrinkable::with_shrinks(value, move || {
        let mut children = Vec::new();
        if value > 0 {
            children.push(towards_zero(0));
        }
        if value / 2 > 0 {
            children.push(towards_zero(value / 2));
        }
        if value - 1 > 0 && value - 1 != value / 2 {
            children.push(towards_zero(value - 1));
        }
        children
    })
}

/// Property: the reported path lists the failing sibling chosen at each level
pub fn test_counterexample_path() {
    let prop = property(
        |random: &mut Random| {
            let length = arbitrary_count(random, 1, 6);
            let points: Vec<usize> = (0..length).map(|_| arbitrary_count(random, 0, 99)).collect();
            Shrinkable::new((arbitrary_seed(random), points))
        },
        |(seed, points): &(u64, Vec<usize>)| -> std::result::Result<(), String> {
            let depth = points.len() - 1;
            let level = Rc::new(Cell::new(0usize));
            let remaining = Rc::new(Cell::new(points[0] as i64));
            let schedule = points.clone();

            let inner = property(
                move |_: &mut Random| deep(depth),
                move |_: &usize| {
                    remaining.set(remaining.get() - 1);
                    if remaining.get() >= 0 {
                        return Outcome::Success;
                    }
                    level.set(level.get() + 1);
                    remaining.set(schedule.get(level.get()).copied().unwrap_or(0) as i64);
                    Outcome::failure("failure")
                },
            );

            let details = inner_run(&inner, &Config::default().with_seed(*seed))?;
            let expected_path = points
                .iter()
                .map(|point| point.to_string())
                .collect::<Vec<_>>()
                .join(":");

            if details.counterexample_path.as_deref() != Some(expected_path.as_str()) {
                return Err(format!(
                    "expected path {expected_path}, got {:?}",
                    details.counterexample_path
                ));
            }
            if details.total_runs != points[0] + 1
                || details.shrink_depth != depth
                || details.counterexample != Some(0)
            {
                return Err(format!("unexpected report: {details:?}"));
            }
            Ok(())
        },
    );

    expect_pass("counterexample path", &prop, 40);
}

/// Property: a monotone predicate shrinks to exactly its threshold
pub fn test_shrinks_to_threshold() {
    let prop = property(
        |random: &mut Random| Shrinkable::new((random.next_int(1, 500), arbitrary_seed(random))),
        |&(threshold, seed): &(i64, u64)| {
            let inner = property(
                move |random: &mut Random| towards_zero(random.next_int(0, 1000)),
                move |&value: &i64| value < threshold,
            );

            match inner_run(&inner, &Config::default().with_seed(seed)) {
                Ok(details) if details.failed => details.counterexample == Some(threshold),
                Ok(_) => true,
                Err(_) => false,
            }
        },
    );

    expect_pass("shrinks to threshold", &prop, 40);
}

/// Property: replaying a reported path lands on the same counterexample
pub fn test_replay_reproduces_counterexample() {
    let prop = property(
        |random: &mut Random| Shrinkable::new(arbitrary_seed(random)),
        |&seed: &u64| -> std::result::Result<(), String> {
            let inner = property(
                |random: &mut Random| towards_zero(random.next_int(0, 1000)),
                |&value: &i64| value % 7 != 3 || value < 200,
            );

            let config = Config::default().with_seed(seed);
            let original = inner_run(&inner, &config)?;
            let Some(path) = original.counterexample_path.clone() else {
                return Ok(());
            };

            let replayed = inner_run(&inner, &config.with_path(&path))?;
            if replayed.counterexample != original.counterexample
                || replayed.counterexample_path != original.counterexample_path
                || replayed.total_runs != 1
            {
                return Err(format!(
                    "replay of {path} diverged: {replayed:?} vs {original:?}"
                ));
            }
            Ok(())
        },
    );

    expect_pass("replay reproduces counterexample", &prop, 30);
}
