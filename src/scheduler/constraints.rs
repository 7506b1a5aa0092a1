use super::{variables::ShiftVars, ScheduleOptions};
use crate::model::{Roster, ShiftKind, Week};
use crate::solver::{ConstraintModel, LinearConstraint, LinearExpr, Literal, VarId};
use chrono::Weekday;
use tracing::debug;

/// Paires de shifts qui ne peuvent pas être tenues toutes les deux par des nouveaux.
pub const NEW_HIRE_PAIRS: [(ShiftKind, ShiftKind); 2] = [
    (ShiftKind::Evening, ShiftKind::Closing),
    (ShiftKind::WeekendMorning, ShiftKind::WeekendMorningBackup),
];

pub(super) fn add_all<M: ConstraintModel>(
    week: &Week,
    roster: &Roster,
    opts: ScheduleOptions,
    vars: &ShiftVars,
    model: &mut M,
) {
    add_coverage(week, vars, model);
    add_daily_cap(week, roster, vars, model);
    add_weekly_cap(roster, opts, vars, model);
    add_new_hire_pairing(week, roster, vars, model);
    add_days_off(week, roster, opts, vars, model);
    add_rest_after_closing(week, roster, vars, model);
    debug!(employees = roster.len(), slots = week.slot_count(), "hard constraints registered");
}

/// Exactement un employé par créneau.
pub(super) fn add_coverage<M: ConstraintModel>(week: &Week, vars: &ShiftVars, model: &mut M) {
    for (day, kind) in week.slots() {
        model.add_exactly_one(&vars.for_slot(day, kind));
    }
}

/// Au plus un shift par employé et par jour.
pub(super) fn add_daily_cap<M: ConstraintModel>(
    week: &Week,
    roster: &Roster,
    vars: &ShiftVars,
    model: &mut M,
) {
    for e in 0..roster.len() {
        for d in 0..week.len() {
            model.add_at_most_one(&vars.for_employee_day(e, d));
        }
    }
}

pub(super) fn add_weekly_cap<M: ConstraintModel>(
    roster: &Roster,
    opts: ScheduleOptions,
    vars: &ShiftVars,
    model: &mut M,
) {
    for e in 0..roster.len() {
        model.add_linear_le(
            LinearExpr::sum(vars.for_employee(e)),
            i64::from(opts.max_shifts_per_week),
        );
    }
}

/// Hors jeudi : pas de nouveau sur les deux shifts d'une paire le même jour.
pub(super) fn add_new_hire_pairing<M: ConstraintModel>(
    week: &Week,
    roster: &Roster,
    vars: &ShiftVars,
    model: &mut M,
) {
    for (d, day) in week.days().iter().enumerate() {
        if day.weekday() == Weekday::Thu {
            continue;
        }
        for (a, b) in NEW_HIRE_PAIRS {
            if day.offers(a) && day.offers(b) {
                add_pair(roster, vars, d, a, b, model);
            }
        }
    }
}

fn add_pair<M: ConstraintModel>(
    roster: &Roster,
    vars: &ShiftVars,
    day: usize,
    a: ShiftKind,
    b: ShiftKind,
    model: &mut M,
) {
    let new_on = |kind: ShiftKind| -> Vec<VarId> {
        roster
            .employees
            .iter()
            .enumerate()
            .filter(|(_, emp)| emp.is_new)
            .filter_map(|(e, _)| vars.get(e, day, kind))
            .collect()
    };

    // la somme porte sur plusieurs personnes : on la réifie avant la disjonction
    let mut indicators = Vec::with_capacity(2);
    for kind in [a, b] {
        let on = new_on(kind);
        let indicator = model.new_bool_var(&format!("new_hire_day{day}_{kind}"));
        model.add_implication(
            Literal::Pos(indicator),
            LinearConstraint::ge(LinearExpr::sum(on.iter().copied()), 1),
        );
        model.add_implication(
            Literal::Neg(indicator),
            LinearConstraint::equals(LinearExpr::sum(on), 0),
        );
        indicators.push(!indicator);
    }
    model.add_bool_or(&indicators);
}

/// Congé contraignant seulement si demandé à l'avance et signalé comme tel.
pub(super) fn add_days_off<M: ConstraintModel>(
    week: &Week,
    roster: &Roster,
    opts: ScheduleOptions,
    vars: &ShiftVars,
    model: &mut M,
) {
    for (e, employee) in roster.employees.iter().enumerate() {
        // le drapeau est connu à la construction : flag => var == 0 devient sum <= 0
        if !employee.day_off_requested {
            continue;
        }
        for (d, day) in week.days().iter().enumerate() {
            if d < opts.day_off_lead_days || !employee.asks_day_off(day.weekday()) {
                continue;
            }
            model.add_linear_le(LinearExpr::sum(vars.for_employee_day(e, d)), 0);
        }
    }
}

/// Pas de shift d'ouverture le lendemain d'une fermeture.
pub(super) fn add_rest_after_closing<M: ConstraintModel>(
    week: &Week,
    roster: &Roster,
    vars: &ShiftVars,
    model: &mut M,
) {
    for (d, day) in week.days().iter().enumerate().skip(1) {
        let opening = day.opening_kind();
        for (e, employee) in roster.employees.iter().enumerate() {
            let closed = model.new_bool_var(&format!("{}_closed_day{}", employee.name, d - 1));
            match vars.get(e, d - 1, ShiftKind::Closing) {
                // closed == closing, en deux inégalités
                Some(closing) => {
                    let mut down = LinearExpr::new();
                    down.add(1, closed).add(-1, closing);
                    model.add_linear_le(down, 0);
                    let mut up = LinearExpr::new();
                    up.add(1, closing).add(-1, closed);
                    model.add_linear_le(up, 0);
                }
                // pas de fermeture la veille : l'indicateur vaut 0
                None => model.add_linear_le(LinearExpr::sum([closed]), 0),
            }

            if let Some(open) = vars.get(e, d, opening) {
                model.add_linear_le(LinearExpr::sum([closed, open]), 1);
            }
        }
    }
}
