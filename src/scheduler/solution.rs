use super::variables::{ShiftVars, VarKey};
use crate::model::{Roster, ShiftKind, ShiftWindow, Week};
use crate::solver::SolveOutcome;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Un créneau pourvu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub kind: ShiftKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<ShiftWindow>,
    pub employee: String,
    /// Le créneau figure dans les préférences de l'employé.
    pub preferred: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: Weekday,
    pub shifts: Vec<ShiftAssignment>,
}

/// Une semaine complète qui respecte toutes les contraintes dures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub objective: i64,
    pub days: Vec<DaySchedule>,
    /// Nombre de shifts de la semaine, pour chaque employé du roster.
    pub shift_counts: BTreeMap<String, u32>,
}

impl Solution {
    /// Identité de la solution : les triplets (employé, jour, shift) à 1.
    pub fn triples(&self) -> BTreeSet<(String, usize, ShiftKind)> {
        self.days
            .iter()
            .enumerate()
            .flat_map(|(d, day)| {
                day.shifts
                    .iter()
                    .map(move |s| (s.employee.clone(), d, s.kind))
            })
            .collect()
    }

    pub fn worker(&self, day: usize, kind: ShiftKind) -> Option<&str> {
        self.days
            .get(day)?
            .shifts
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.employee.as_str())
    }

    /// Créneaux tenus par un employé, dans l'ordre de la semaine.
    pub fn shifts_of(&self, employee: &str) -> Vec<(usize, ShiftKind)> {
        self.days
            .iter()
            .enumerate()
            .flat_map(|(d, day)| {
                day.shifts
                    .iter()
                    .filter(move |s| s.employee == employee)
                    .map(move |s| (d, s.kind))
            })
            .collect()
    }
}

/// Issue de l'énumération.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationStatus {
    /// Le nombre de solutions demandé est atteint.
    CapReached,
    /// Moins de solutions distinctes que demandé.
    Exhausted,
    /// Aucune affectation ne respecte les contraintes.
    Infeasible,
    Cancelled,
    TimeLimit,
    SolverUnknown,
}

/// Solutions distinctes, dans l'ordre où le solveur les a produites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionSet {
    pub status: EnumerationStatus,
    pub capacity: usize,
    pub solutions: Vec<Solution>,
}

impl SolutionSet {
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.solutions.iter()
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

pub(super) fn identifier(vars: &ShiftVars, outcome: &SolveOutcome) -> BTreeSet<VarKey> {
    vars.iter()
        .filter(|(_, v)| outcome.value(*v))
        .map(|(k, _)| k)
        .collect()
}

/// Nomme les employés sur chaque créneau et compte les shifts.
pub(super) fn materialize(
    week: &Week,
    roster: &Roster,
    vars: &ShiftVars,
    outcome: &SolveOutcome,
) -> Solution {
    let mut shift_counts: BTreeMap<String, u32> = roster
        .employees
        .iter()
        .map(|e| (e.name.clone(), 0))
        .collect();
    let mut objective = 0i64;
    let mut days = Vec::with_capacity(week.len());

    for (d, day) in week.days().iter().enumerate() {
        let mut shifts = Vec::with_capacity(day.kinds().len());
        for kind in day.kinds() {
            let worker = roster.employees.iter().enumerate().find(|(e, _)| {
                vars.get(*e, d, *kind)
                    .map_or(false, |v| outcome.value(v))
            });
            let Some((_, employee)) = worker else {
                warn!(day = d, shift = %kind, "slot left empty by solver");
                continue;
            };
            let preferred = employee.prefers(day.weekday(), *kind);
            if preferred {
                objective += i64::from(employee.priority);
            }
            if let Some(count) = shift_counts.get_mut(&employee.name) {
                *count += 1;
            }
            shifts.push(ShiftAssignment {
                kind: *kind,
                window: day.window(*kind),
                employee: employee.name.clone(),
                preferred,
            });
        }
        days.push(DaySchedule {
            day: day.weekday(),
            shifts,
        });
    }

    Solution {
        objective,
        days,
        shift_counts,
    }
}
