//! Trial loop accounting properties
//!
//! The inner properties count their own calls, so the reports the runner
//! produces can be compared against what actually happened.

use crate::{arbitrary_count, arbitrary_seed, expect_pass, inner_run};
use bramble::*;
use std::cell::Cell;
use std::rc::Rc;

fn bump(cell: &Cell<usize>) -> usize {
    cell.set(cell.get() + 1);
    cell.get()
}

/// Property: the run stops on the failing trial and never shrinks a leaf
pub fn test_stops_at_first_failure() {
    let prop = property(
        |random: &mut Random| {
            Shrinkable::new((arbitrary_count(random, 1, 100), arbitrary_seed(random)))
        },
        |&(failing_call, seed): &(usize, u64)| -> std::result::Result<(), String> {
            let generated = Rc::new(Cell::new(0));
            let evaluated = Rc::new(Cell::new(0));
            let (g, e) = (generated.clone(), evaluated.clone());
            let inner = property(
                move |_: &mut Random| {
                    bump(&g);
                    Shrinkable::new(0u8)
                },
                move |_: &u8| bump(&e) < failing_call,
            );

            let details = inner_run(&inner, &Config::default().with_seed(seed))?;
            if generated.get() != failing_call || evaluated.get() != failing_call {
                return Err(format!(
                    "expected {failing_call} calls, got {} generate / {} evaluate",
                    generated.get(),
                    evaluated.get()
                ));
            }
            if !details.failed || details.total_runs != failing_call || details.seed != seed {
                return Err(format!("unexpected report: {details:?}"));
            }
            Ok(())
        },
    );

    expect_pass("stops at first failure", &prop, 50);
}

/// Property: skipped trials are never counted as runs
pub fn test_skip_accounting() {
    let prop = property(
        |random: &mut Random| {
            let gaps: Vec<usize> = (0..100).map(|_| arbitrary_count(random, 0, 10)).collect();
            let fail_at = if random.next_bool() {
                Some(arbitrary_count(random, 0, 99))
            } else {
                None
            };
            Shrinkable::new((gaps, fail_at))
        },
        |(gaps, fail_at): &(Vec<usize>, Option<usize>)| -> std::result::Result<(), String> {
            let mut success_ids: Vec<usize> = Vec::with_capacity(gaps.len());
            for &gap in gaps {
                let next = success_ids.last().map_or(gap, |last| last + gap + 1);
                success_ids.push(next);
            }

            let generated = Rc::new(Cell::new(0));
            let g = generated.clone();
            let ids = success_ids.clone();
            let fail_at = *fail_at;
            let inner = property(
                move |_: &mut Random| {
                    let id = g.get();
                    bump(&g);
                    Shrinkable::new(id)
                },
                move |value: &usize| match ids.iter().position(|id| id == value) {
                    Some(position) if Some(position) == fail_at => Outcome::failure("failed"),
                    Some(_) => Outcome::Success,
                    None => Outcome::Skip,
                },
            );

            let details = inner_run(&inner, &Config::default())?;
            let (expected_generated, expected_runs) = match fail_at {
                Some(position) => (success_ids[position] + 1, position + 1),
                None => (success_ids[99] + 1, 100),
            };

            if generated.get() != expected_generated {
                return Err(format!(
                    "expected {expected_generated} generations, got {}",
                    generated.get()
                ));
            }
            if details.total_runs != expected_runs
                || details.total_skips != expected_generated - expected_runs
                || details.failed != fail_at.is_some()
            {
                return Err(format!("unexpected report: {details:?}"));
            }
            Ok(())
        },
    );

    expect_pass("skip accounting", &prop, 40);
}

/// Property: a passing run performs exactly `num_runs` trials
pub fn test_run_count() {
    let prop = property(
        |random: &mut Random| Shrinkable::new(arbitrary_count(random, 0, 1000)),
        |&num_runs: &usize| {
            let evaluated = Rc::new(Cell::new(0));
            let e = evaluated.clone();
            let inner = property(
                |random: &mut Random| Shrinkable::new(random.next_u64()),
                move |_: &u64| {
                    bump(&e);
                    true
                },
            );

            match inner_run(&inner, &Config::default().with_runs(num_runs)) {
                Ok(details) => {
                    details.passed() && details.total_runs == num_runs && evaluated.get() == num_runs
                }
                Err(_) => false,
            }
        },
    );

    expect_pass("run count", &prop, 25);
}
