use super::solution::{identifier, materialize, EnumerationStatus, SolutionSet};
use super::variables::{ShiftVars, VarKey};
use super::{CancelHandle, ScheduleOptions};
use crate::model::{Roster, Week};
use crate::solver::{ConstraintModel, Literal, SolveStatus};
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Un solveur qui renvoie une affectation déjà exclue est tenu pour défaillant.
const MAX_DUPLICATES: usize = 3;

/// Résout, exclut la solution trouvée, recommence.
///
/// Chaque solution acceptée ajoute une clause d'exclusion au modèle : la
/// suivante est la meilleure restante, donc l'objectif ne croît jamais.
pub(super) fn enumerate<M: ConstraintModel>(
    week: &Week,
    roster: &Roster,
    opts: ScheduleOptions,
    vars: &ShiftVars,
    model: &mut M,
    cancel: &CancelHandle,
) -> SolutionSet {
    let started = Instant::now();
    let mut seen: HashSet<BTreeSet<VarKey>> = HashSet::new();
    let mut solutions = Vec::new();
    let mut duplicates = 0usize;

    let status = loop {
        if solutions.len() >= opts.max_solutions {
            break EnumerationStatus::CapReached;
        }
        if cancel.is_cancelled() {
            break EnumerationStatus::Cancelled;
        }
        let remaining = opts
            .time_limit
            .map(|limit| limit.saturating_sub(started.elapsed()));
        if remaining.is_some_and(|left| left.is_zero()) {
            break EnumerationStatus::TimeLimit;
        }

        model.set_time_limit(remaining);
        let outcome = model.solve();
        match outcome.status {
            SolveStatus::Optimal => {}
            SolveStatus::Infeasible if solutions.is_empty() => {
                break EnumerationStatus::Infeasible
            }
            SolveStatus::Infeasible => break EnumerationStatus::Exhausted,
            SolveStatus::Unknown if out_of_time(opts, started) => {
                break EnumerationStatus::TimeLimit
            }
            SolveStatus::Unknown => break EnumerationStatus::SolverUnknown,
        }

        let blocking: Vec<Literal> = vars
            .iter()
            .map(|(_, v)| {
                if outcome.value(v) {
                    Literal::Pos(v)
                } else {
                    Literal::Neg(v)
                }
            })
            .collect();
        model.add_exclusion(&blocking);

        if !seen.insert(identifier(vars, &outcome)) {
            duplicates += 1;
            warn!(duplicates, "solver returned an excluded assignment");
            if duplicates >= MAX_DUPLICATES {
                break EnumerationStatus::SolverUnknown;
            }
            continue;
        }

        let solution = materialize(week, roster, vars, &outcome);
        info!(
            solution = solutions.len(),
            objective = solution.objective,
            "schedule found"
        );
        solutions.push(solution);
    };

    debug!(
        ?status,
        found = solutions.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "enumeration done"
    );
    SolutionSet {
        status,
        capacity: opts.max_solutions,
        solutions,
    }
}

fn out_of_time(opts: ScheduleOptions, started: Instant) -> bool {
    opts.time_limit
        .is_some_and(|limit| started.elapsed() >= limit)
}
