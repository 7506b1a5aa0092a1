use crate::model::{parse_weekday, DayPreference, Employee, Roster, ShiftKind};
use crate::scheduler::{Solution, SolutionSet};
use anyhow::{bail, Context};
use chrono::Weekday;
use csv::{ReaderBuilder, WriterBuilder};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Import d'employés depuis CSV: header
/// `name,priority[,is_new][,day_off_requested][,days_off][,preferences]`
///
/// `days_off` : `Fri;Sat`, `preferences` : `Sun:morning|evening;Thu:closing`.
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid employee row (empty name)");
        }
        let priority: u32 = rec
            .get(1)
            .context("missing priority")?
            .trim()
            .parse()
            .with_context(|| format!("invalid priority for {name}"))?;
        let mut employee = Employee::new(name, priority);

        if let Some(flag) = non_empty(rec.get(2)) {
            employee.is_new =
                parse_bool(flag).with_context(|| format!("invalid is_new value for {name}"))?;
        }
        if let Some(flag) = non_empty(rec.get(3)) {
            employee.day_off_requested = parse_bool(flag)
                .with_context(|| format!("invalid day_off_requested value for {name}"))?;
        }
        if let Some(days) = non_empty(rec.get(4)) {
            employee.days_off =
                parse_days(days).with_context(|| format!("invalid days_off value for {name}"))?;
        }
        if let Some(prefs) = non_empty(rec.get(5)) {
            employee.preferences = parse_preferences(prefs)
                .with_context(|| format!("invalid preferences value for {name}"))?;
        }
        out.push(employee);
    }
    Ok(out)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_days(raw: &str) -> anyhow::Result<Vec<Weekday>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| parse_weekday(chunk).map_err(anyhow::Error::from))
        .collect()
}

fn parse_preferences(raw: &str) -> anyhow::Result<Vec<DayPreference>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| -> anyhow::Result<DayPreference> {
            let (day, shifts) = chunk
                .split_once(':')
                .with_context(|| format!("expected `day:shift|shift`, got {chunk}"))?;
            let shifts = shifts
                .split('|')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<ShiftKind>())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DayPreference {
                day: parse_weekday(day)?,
                shifts,
            })
        })
        .collect()
}

/// Export JSON de l'ensemble des solutions (jolie mise en forme)
pub fn export_solutions_json<P: AsRef<Path>>(path: P, set: &SolutionSet) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(set)?;
    fs::write(path, s)?;
    Ok(())
}

pub fn load_solutions_json<P: AsRef<Path>>(path: P) -> anyhow::Result<SolutionSet> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let set = serde_json::from_slice(&data)
        .with_context(|| format!("parsing solutions {}", path.display()))?;
    Ok(set)
}

/// Export CSV: header `solution,day,shift,start,end,employee,preferred`
pub fn export_assignments_csv<P: AsRef<Path>>(path: P, set: &SolutionSet) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["solution", "day", "shift", "start", "end", "employee", "preferred"])?;
    for (i, solution) in set.iter().enumerate() {
        let index = i.to_string();
        for day in &solution.days {
            let weekday = day.day.to_string();
            for s in &day.shifts {
                let (start, end) = s
                    .window
                    .map(|w| {
                        (
                            w.start.format("%H:%M").to_string(),
                            w.end.format("%H:%M").to_string(),
                        )
                    })
                    .unwrap_or_default();
                w.write_record([
                    index.as_str(),
                    weekday.as_str(),
                    s.kind.as_str(),
                    start.as_str(),
                    end.as_str(),
                    s.employee.as_str(),
                    if s.preferred { "true" } else { "false" },
                ])?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

/// Rendu texte d'une solution : un bloc par jour puis les totaux.
pub fn render_solution(solution: &Solution) -> String {
    let mut out = String::new();
    for day in &solution.days {
        let _ = writeln!(out, "{}", day.day);
        for s in &day.shifts {
            let window = s.window.map(|w| format!(" {w}")).unwrap_or_default();
            let requested = if s.preferred { "requested" } else { "not requested" };
            let _ = writeln!(out, "  {}{} -> {} ({})", s.kind, window, s.employee, requested);
        }
    }
    for (name, count) in &solution.shift_counts {
        let _ = writeln!(out, "{name} got {count} shifts");
    }
    let _ = writeln!(out, "objective: {}", solution.objective);
    out
}

/// Ajoute des employés au roster en refusant les doublons.
pub fn merge_employees(roster: &mut Roster, employees: Vec<Employee>) -> anyhow::Result<()> {
    roster.employees.extend(employees);
    roster.validate()?;
    Ok(())
}
