use super::constraints::NEW_HIRE_PAIRS;
use super::{ScheduleOptions, Solution, Violation, ViolationKind};
use crate::model::{Roster, ShiftKind, Week};
use chrono::Weekday;
use std::collections::HashMap;

/// Revérifie une solution matérialisée contre chaque règle dure.
pub(super) fn detect_violations(
    week: &Week,
    roster: &Roster,
    opts: ScheduleOptions,
    solution: &Solution,
) -> Vec<Violation> {
    let mut out = Vec::new();
    let mut push = |kind, day, shift, employee: Option<&str>| {
        out.push(Violation {
            kind,
            day,
            shift,
            employee: employee.map(str::to_string),
        })
    };

    for (d, day) in week.days().iter().enumerate() {
        for kind in day.kinds() {
            if solution.worker(d, *kind).is_none() {
                push(ViolationKind::Uncovered, Some(d), Some(*kind), None);
            }
        }
    }

    let mut weekly: HashMap<&str, u32> = HashMap::new();
    for (d, day) in solution.days.iter().enumerate() {
        let mut daily: HashMap<&str, u32> = HashMap::new();
        for s in &day.shifts {
            if roster.find_by_name(&s.employee).is_none() {
                push(ViolationKind::UnknownEmployee, Some(d), Some(s.kind), Some(&s.employee));
            }
            *daily.entry(&s.employee).or_default() += 1;
            *weekly.entry(&s.employee).or_default() += 1;
        }
        for (name, n) in daily {
            if n > 1 {
                push(ViolationKind::DailyCap, Some(d), None, Some(name));
            }
        }
    }
    for (name, n) in weekly {
        if n > opts.max_shifts_per_week {
            push(ViolationKind::WeeklyCap, None, None, Some(name));
        }
    }

    let is_new = |name: Option<&str>| {
        name.and_then(|n| roster.find_by_name(n))
            .map_or(false, |e| e.is_new)
    };
    for (d, day) in week.days().iter().enumerate() {
        if day.weekday() == Weekday::Thu {
            continue;
        }
        for (a, b) in NEW_HIRE_PAIRS {
            if is_new(solution.worker(d, a)) && is_new(solution.worker(d, b)) {
                push(ViolationKind::NewHirePairing, Some(d), Some(b), solution.worker(d, b));
            }
        }
    }

    for employee in &roster.employees {
        let worked = solution.shifts_of(&employee.name);
        let works = |d: usize, kind: ShiftKind| worked.contains(&(d, kind));

        if employee.day_off_requested {
            for &(d, kind) in &worked {
                let asked = week
                    .day(d)
                    .map_or(false, |day| employee.asks_day_off(day.weekday()));
                if d >= opts.day_off_lead_days && asked {
                    push(ViolationKind::DayOffIgnored, Some(d), Some(kind), Some(&employee.name));
                }
            }
        }

        for (d, day) in week.days().iter().enumerate().skip(1) {
            let opening = day.opening_kind();
            if works(d - 1, ShiftKind::Closing) && works(d, opening) {
                push(ViolationKind::RestAfterClosing, Some(d), Some(opening), Some(&employee.name));
            }
        }
    }

    out
}
