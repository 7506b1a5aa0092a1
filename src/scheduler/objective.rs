use super::variables::ShiftVars;
use crate::model::{Roster, Week};
use crate::solver::{ConstraintModel, LinearExpr};

/// Somme des priorités sur les créneaux demandés par chaque employé.
pub(super) fn preference_objective(week: &Week, roster: &Roster, vars: &ShiftVars) -> LinearExpr {
    let mut objective = LinearExpr::new();
    for (key, var) in vars.iter() {
        let employee = &roster.employees[key.employee];
        let weekday = week.days()[key.day].weekday();
        if employee.prefers(weekday, key.kind) {
            objective.add(i64::from(employee.priority), var);
        }
    }
    objective
}

pub(super) fn set_objective<M: ConstraintModel>(
    week: &Week,
    roster: &Roster,
    vars: &ShiftVars,
    model: &mut M,
) {
    model.set_objective_maximize(preference_objective(week, roster, vars));
}
