//! Parallel rule evaluation.
//!
//! One task per `(player, rule)` pair is sent over a crossbeam channel to
//! a fixed set of scoped worker threads. Each worker evaluates the rule
//! and sends the result back tagged with its slot, so results land in
//! `[player][rule]` order however the tasks were scheduled. Workers
//! check the cancel token before starting each task.

use std::any::Any;
use std::thread;
use std::time::Instant;

use aimscan_core::{AimSample, CancelToken, DetectionResult};
use aimscan_rules::Rule;
use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::AnalysisError;

/// A rule result with its evaluation time.
#[derive(Debug)]
pub(crate) struct RuleOutcome {
    pub(crate) result: DetectionResult,
    pub(crate) elapsed_us: u64,
}

/// A task dispatched to an evaluation worker: `(player slot, rule slot)`.
type Task = (usize, usize);

/// A finished task.
type Done = (usize, usize, RuleOutcome);

/// Evaluate one rule and time it.
pub(crate) fn run_rule(rule: Rule, samples: &[AimSample]) -> RuleOutcome {
    let started = Instant::now();
    let result = rule.evaluate(samples);
    RuleOutcome {
        result,
        elapsed_us: started.elapsed().as_micros() as u64,
    }
}

fn worker_loop(
    task_rx: Receiver<Task>,
    done_tx: Sender<Done>,
    players: &[&[AimSample]],
    rules: &[Rule],
    cancel: Option<&CancelToken>,
) {
    while let Ok((p, r)) = task_rx.recv() {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            break;
        }
        let outcome = run_rule(rules[r], players[p]);
        if done_tx.send((p, r, outcome)).is_err() {
            break;
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Evaluate every rule for every player on `workers` threads.
///
/// Returns outcomes indexed `[player][rule]` in input order.
pub(crate) fn evaluate_parallel(
    players: &[&[AimSample]],
    rules: &[Rule],
    workers: usize,
    cancel: Option<&CancelToken>,
) -> Result<Vec<Vec<RuleOutcome>>, AnalysisError> {
    let (task_tx, task_rx) = unbounded::<Task>();
    let (done_tx, done_rx) = unbounded::<Done>();
    for p in 0..players.len() {
        for r in 0..rules.len() {
            // Receiver is alive until the end of this function.
            let _ = task_tx.send((p, r));
        }
    }
    drop(task_tx);

    let workers = workers.clamp(1, (players.len() * rules.len()).max(1));
    let mut failure: Option<String> = None;
    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let task_rx = task_rx.clone();
                let done_tx = done_tx.clone();
                s.spawn(move || worker_loop(task_rx, done_tx, players, rules, cancel))
            })
            .collect();
        for handle in handles {
            if let Err(payload) = handle.join() {
                failure.get_or_insert_with(|| panic_reason(payload.as_ref()));
            }
        }
    });
    drop(done_tx);

    if cancel.is_some_and(CancelToken::is_cancelled) {
        return Err(AnalysisError::Cancelled);
    }
    if let Some(reason) = failure {
        return Err(AnalysisError::WorkerFailed { reason });
    }

    let mut slots: Vec<Vec<Option<RuleOutcome>>> = (0..players.len())
        .map(|_| (0..rules.len()).map(|_| None).collect())
        .collect();
    for (p, r, outcome) in done_rx.try_iter() {
        slots[p][r] = Some(outcome);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(p, row)| {
            row.into_iter()
                .enumerate()
                .map(|(r, slot)| {
                    slot.ok_or_else(|| AnalysisError::WorkerFailed {
                        reason: format!("no result for player slot {p}, rule '{}'", rules[r]),
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimscan_test_utils::fixtures::{aimbot_aim, human_aim};

    #[test]
    fn parallel_matches_sequential() {
        let a = human_aim(1, 300);
        let b = aimbot_aim(2, 300);
        let players: Vec<&[AimSample]> = vec![&a, &b];
        let outcomes = evaluate_parallel(&players, &Rule::ALL, 4, None).unwrap();
        assert_eq!(outcomes.len(), 2);
        for (samples, row) in players.iter().zip(&outcomes) {
            assert_eq!(row.len(), Rule::ALL.len());
            for (rule, outcome) in Rule::ALL.iter().zip(row) {
                assert_eq!(outcome.result, rule.evaluate(samples));
            }
        }
    }

    #[test]
    fn single_worker_is_fine() {
        let a = aimbot_aim(9, 100);
        let players: Vec<&[AimSample]> = vec![&a];
        let outcomes = evaluate_parallel(&players, &[Rule::AimLock], 1, None).unwrap();
        assert_eq!(outcomes[0][0].result.rule_name, Rule::AimLock.name());
    }

    #[test]
    fn cancelled_before_start() {
        let a = human_aim(3, 100);
        let players: Vec<&[AimSample]> = vec![&a];
        let token = CancelToken::new();
        token.cancel();
        let result = evaluate_parallel(&players, &Rule::ALL, 2, Some(&token));
        assert!(matches!(result, Err(AnalysisError::Cancelled)));
    }

    #[test]
    fn no_players_no_work() {
        let outcomes = evaluate_parallel(&[], &Rule::ALL, 4, None).unwrap();
        assert!(outcomes.is_empty());
    }
}
