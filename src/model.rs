use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Erreurs de construction des données d'entrée (semaine, roster).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("malformed week: {0}")]
    MalformedWeek(String),
    #[error("malformed roster: {0}")]
    MalformedRoster(String),
    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),
    #[error("unknown shift kind: {0}")]
    UnknownShiftKind(String),
}

/// Les sept jours dans l'ordre de la semaine de travail (dimanche en premier).
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Index 0..6 d'un jour, dimanche = 0.
pub fn weekday_index(day: Weekday) -> usize {
    day.num_days_from_sunday() as usize
}

/// Accepte `Sunday`, `sun`, `SUN`...
pub fn parse_weekday(raw: &str) -> Result<Weekday, ModelError> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| ModelError::UnknownWeekday(raw.trim().to_string()))
}

/// Type de shift (énumération fermée)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftKind {
    Morning,
    Evening,
    Closing,
    WeekendMorning,
    WeekendMorningBackup,
    ThursdayBackup,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 6] = [
        ShiftKind::Morning,
        ShiftKind::Evening,
        ShiftKind::Closing,
        ShiftKind::WeekendMorning,
        ShiftKind::WeekendMorningBackup,
        ShiftKind::ThursdayBackup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftKind::Morning => "morning",
            ShiftKind::Evening => "evening",
            ShiftKind::Closing => "closing",
            ShiftKind::WeekendMorning => "weekend_morning",
            ShiftKind::WeekendMorningBackup => "weekend_morning_backup",
            ShiftKind::ThursdayBackup => "thursday_backup",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftKind {
    type Err = ModelError;

    /// `weekend-morning`, `Weekend Morning` et `weekend_morning` sont équivalents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ShiftKind::ALL
            .into_iter()
            .find(|k| k.as_str() == norm)
            .ok_or_else(|| ModelError::UnknownShiftKind(s.trim().to_string()))
    }
}

/// Shifts proposés un jour donné, dans l'ordre de la journée.
pub fn canonical_kinds(day: Weekday) -> &'static [ShiftKind] {
    use ShiftKind::*;
    match day {
        Weekday::Sun | Weekday::Mon | Weekday::Tue | Weekday::Wed => &[Morning, Evening, Closing],
        Weekday::Thu => &[Morning, Evening, ThursdayBackup, Closing],
        Weekday::Fri | Weekday::Sat => {
            &[WeekendMorning, WeekendMorningBackup, Evening, Closing]
        }
    }
}

/// Plage horaire d'un shift (la fin peut dépasser minuit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftWindow {
    fn hm(start: (i64, i64), end: (i64, i64)) -> Self {
        let at = |(h, m): (i64, i64)| NaiveTime::default() + Duration::minutes(h * 60 + m);
        Self {
            start: at(start),
            end: at(end),
        }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Durée en minutes.
    pub fn duration_minutes(&self) -> i64 {
        let raw = (self.end - self.start).num_minutes();
        if self.crosses_midnight() {
            raw + 24 * 60
        } else {
            raw
        }
    }
}

impl fmt::Display for ShiftWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Horaires du site. `None` si le shift n'existe pas ce jour-là.
pub fn canonical_window(day: Weekday, kind: ShiftKind) -> Option<ShiftWindow> {
    use ShiftKind::*;
    let w = ShiftWindow::hm;
    let window = match (day, kind) {
        (Weekday::Thu, ThursdayBackup) => w((19, 30), (2, 0)),
        (Weekday::Thu, Closing) => w((21, 30), (4, 0)),
        (Weekday::Fri, Closing) => w((21, 30), (2, 0)),
        (Weekday::Fri | Weekday::Sat, WeekendMorning) => w((9, 15), (18, 0)),
        (Weekday::Fri | Weekday::Sat, WeekendMorningBackup) => w((12, 0), (18, 0)),
        (Weekday::Fri | Weekday::Sat, Evening) => w((18, 0), (22, 0)),
        (Weekday::Fri | Weekday::Sat, Morning) => return None,
        (_, Morning) => w((11, 45), (16, 0)),
        // lundi et jeudi : jours de livraison
        (Weekday::Mon | Weekday::Thu, Evening) => w((15, 0), (22, 0)),
        (_, Evening) => w((16, 0), (22, 0)),
        (_, Closing) => w((19, 30), (2, 0)),
        _ => return None,
    };
    Some(window)
}

/// Jour de la semaine avec ses shifts (fonction pure du jour).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    weekday: Weekday,
    kinds: Vec<ShiftKind>,
}

impl Day {
    pub fn new(weekday: Weekday) -> Self {
        Self {
            weekday,
            kinds: canonical_kinds(weekday).to_vec(),
        }
    }

    /// Vérifie qu'un jour décrit à la main correspond au catalogue.
    pub fn with_kinds(weekday: Weekday, kinds: &[ShiftKind]) -> Result<Self, ModelError> {
        let expected = canonical_kinds(weekday);
        let mut given = kinds.to_vec();
        given.sort();
        given.dedup();
        let mut wanted = expected.to_vec();
        wanted.sort();
        if given.len() != kinds.len() || given != wanted {
            return Err(ModelError::MalformedWeek(format!(
                "{weekday} must offer {expected:?}, got {kinds:?}"
            )));
        }
        Ok(Self::new(weekday))
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn kinds(&self) -> &[ShiftKind] {
        &self.kinds
    }

    pub fn offers(&self, kind: ShiftKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn window(&self, kind: ShiftKind) -> Option<ShiftWindow> {
        if !self.offers(kind) {
            return None;
        }
        canonical_window(self.weekday, kind)
    }

    /// Premier shift de la journée, soumis au repos après une fermeture.
    pub fn opening_kind(&self) -> ShiftKind {
        if self.offers(ShiftKind::WeekendMorning) {
            ShiftKind::WeekendMorning
        } else {
            ShiftKind::Morning
        }
    }
}

/// Semaine de 7 jours, dimanche en premier. Immuable une fois construite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    days: Vec<Day>,
}

impl Week {
    pub fn canonical() -> Self {
        Self {
            days: WEEKDAYS.into_iter().map(Day::new).collect(),
        }
    }

    pub fn from_days(days: Vec<Day>) -> Result<Self, ModelError> {
        if days.len() != WEEKDAYS.len() {
            return Err(ModelError::MalformedWeek(format!(
                "a week has 7 days, got {}",
                days.len()
            )));
        }
        for (day, expected) in days.iter().zip(WEEKDAYS) {
            if day.weekday != expected {
                return Err(ModelError::MalformedWeek(format!(
                    "expected {expected} at position {}, got {}",
                    weekday_index(expected),
                    day.weekday
                )));
            }
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Tous les créneaux (index du jour, shift) dans l'ordre de la semaine.
    pub fn slots(&self) -> impl Iterator<Item = (usize, ShiftKind)> + '_ {
        self.days
            .iter()
            .enumerate()
            .flat_map(|(d, day)| day.kinds.iter().map(move |k| (d, *k)))
    }

    pub fn slot_count(&self) -> usize {
        self.days.iter().map(|d| d.kinds.len()).sum()
    }
}

impl Default for Week {
    fn default() -> Self {
        Self::canonical()
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in &self.days {
            let shifts: Vec<String> = day
                .kinds
                .iter()
                .map(|k| match day.window(*k) {
                    Some(w) => format!("{k} {w}"),
                    None => k.to_string(),
                })
                .collect();
            writeln!(f, "{}: {}", day.weekday, shifts.join(", "))?;
        }
        Ok(())
    }
}

/// Préférences d'un employé pour un jour donné.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPreference {
    pub day: Weekday,
    pub shifts: Vec<ShiftKind>,
}

/// Employé ; le nom sert d'identité.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub priority: u32,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferences: Vec<DayPreference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_off: Vec<Weekday>,
    /// Rend les `days_off` contraignants ; sinon ce n'est qu'un souhait.
    #[serde(default)]
    pub day_off_requested: bool,
}

impl Employee {
    pub fn new<N: Into<String>>(name: N, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
            is_new: false,
            preferences: Vec::new(),
            days_off: Vec::new(),
            day_off_requested: false,
        }
    }

    pub fn new_hire(mut self) -> Self {
        self.is_new = true;
        self
    }

    pub fn prefer(mut self, day: Weekday, shifts: &[ShiftKind]) -> Self {
        match self.preferences.iter_mut().find(|p| p.day == day) {
            Some(pref) => pref.shifts.extend_from_slice(shifts),
            None => self.preferences.push(DayPreference {
                day,
                shifts: shifts.to_vec(),
            }),
        }
        self
    }

    pub fn with_days_off(mut self, days: &[Weekday], requested: bool) -> Self {
        self.days_off = days.to_vec();
        self.day_off_requested = requested;
        self
    }

    pub fn prefers(&self, day: Weekday, kind: ShiftKind) -> bool {
        self.preferences
            .iter()
            .any(|p| p.day == day && p.shifts.contains(&kind))
    }

    pub fn asks_day_off(&self, day: Weekday) -> bool {
        self.days_off.contains(&day)
    }
}

/// Roster d'une exécution de planification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roster {
    pub employees: Vec<Employee>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn find_by_name<'a>(&'a self, name: &str) -> Option<&'a Employee> {
        self.employees.iter().find(|e| e.name == name)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for employee in &self.employees {
            if employee.name.trim().is_empty() {
                return Err(ModelError::MalformedRoster(
                    "employee name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(employee.name.as_str()) {
                return Err(ModelError::MalformedRoster(format!(
                    "duplicate employee: {}",
                    employee.name
                )));
            }
            if employee.priority == 0 {
                return Err(ModelError::MalformedRoster(format!(
                    "priority of {} must be >= 1",
                    employee.name
                )));
            }
            let mut days = HashSet::new();
            for pref in &employee.preferences {
                if !days.insert(pref.day) {
                    return Err(ModelError::MalformedRoster(format!(
                        "{} lists {} twice in preferences",
                        employee.name, pref.day
                    )));
                }
            }
        }
        Ok(())
    }
}
