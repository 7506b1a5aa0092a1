use crate::model::{ModelError, ShiftKind};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Options de planification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Maximum légal de jours travaillés par semaine.
    pub max_shifts_per_week: u32,
    /// Les demandes de congé ne valent qu'à partir de ce jour (index 0..6).
    pub day_off_lead_days: usize,
    pub max_solutions: usize,
    /// Budget global, vérifié entre deux appels au solveur.
    pub time_limit: Option<Duration>,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            max_shifts_per_week: 6,
            day_off_lead_days: 4,
            max_solutions: 5,
            time_limit: None,
        }
    }
}

impl ScheduleOptions {
    pub(crate) fn validate(&self) -> Result<(), SchedError> {
        if self.max_solutions == 0 {
            return Err(SchedError::InvalidOptions("max_solutions must be >= 1"));
        }
        if self.max_shifts_per_week == 0 {
            return Err(SchedError::InvalidOptions("max_shifts_per_week must be >= 1"));
        }
        Ok(())
    }
}

/// Drapeau d'annulation partagé entre l'appelant et l'énumérateur.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Uncovered,              // créneau sans employé
    UnknownEmployee,        // nom absent du roster
    DailyCap,               // deux shifts le même jour
    WeeklyCap,              // plus de jours que le maximum légal
    NewHirePairing,         // deux nouveaux sur une paire de shifts
    DayOffIgnored,          // congé demandé non respecté
    RestAfterClosing,       // ouverture le lendemain d'une fermeture
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub day: Option<usize>,
    pub shift: Option<ShiftKind>,
    pub employee: Option<String>,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
