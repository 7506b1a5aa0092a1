#![forbid(unsafe_code)]
//! Roulement : planification hebdomadaire de shifts sous contraintes.
//!
//! - Une variable booléenne par (employé, jour, shift) du catalogue.
//! - Contraintes dures : couverture, un shift par jour, 6 jours max,
//!   pas deux nouveaux sur une même paire, congés demandés, repos après fermeture.
//! - Objectif : préférences pondérées par la priorité de chaque employé.
//! - Plusieurs solutions distinctes, chacune excluant les précédentes.

pub mod io;
pub mod model;
pub mod scheduler;
pub mod solver;
pub mod storage;

pub use model::{
    Day, DayPreference, Employee, ModelError, Roster, ShiftKind, ShiftWindow, Week, WEEKDAYS,
};
pub use scheduler::{
    CancelHandle, EnumerationStatus, SchedError, ScheduleOptions, Scheduler, Solution,
    SolutionSet, Violation, ViolationKind,
};
pub use solver::{ConstraintModel, LpModel};
pub use storage::{JsonStorage, Storage};
