mod conflicts;
mod constraints;
mod enumerate;
mod objective;
mod solution;
mod types;
mod variables;

pub use constraints::NEW_HIRE_PAIRS;
pub use solution::{DaySchedule, EnumerationStatus, ShiftAssignment, Solution, SolutionSet};
pub use types::{CancelHandle, SchedError, ScheduleOptions, Violation, ViolationKind};
pub use variables::{var_label, ShiftVars, VarKey};

use crate::model::{Roster, Week};
use crate::solver::{ConstraintModel, LpModel};
use tracing::info;

/// Scheduler : une exécution de planification sur une semaine et un roster
#[derive(Debug, Clone, Copy)]
pub struct Scheduler<'a> {
    week: &'a Week,
    roster: &'a Roster,
    opts: ScheduleOptions,
}

impl<'a> Scheduler<'a> {
    /// Valide le roster et les options ; rien n'atteint le solveur en cas d'erreur.
    pub fn new(
        week: &'a Week,
        roster: &'a Roster,
        opts: ScheduleOptions,
    ) -> Result<Self, SchedError> {
        roster.validate()?;
        opts.validate()?;
        Ok(Self { week, roster, opts })
    }

    /// Variables de décision seules.
    pub fn encode<M: ConstraintModel>(&self, model: &mut M) -> ShiftVars {
        variables::encode(self.week, self.roster, model)
    }

    /// Variables, contraintes dures et objectif.
    pub fn build_model<M: ConstraintModel>(&self, model: &mut M) -> ShiftVars {
        let vars = self.encode(model);
        constraints::add_all(self.week, self.roster, self.opts, &vars, model);
        objective::set_objective(self.week, self.roster, &vars, model);
        vars
    }

    /// Objectif de préférence, sans l'enregistrer dans un modèle.
    pub fn objective(&self, vars: &ShiftVars) -> crate::solver::LinearExpr {
        objective::preference_objective(self.week, self.roster, vars)
    }

    /// Énumère jusqu'à `max_solutions` semaines distinctes avec le backend `good_lp`.
    pub fn solve(&self) -> SolutionSet {
        self.solve_with(LpModel::new(), &CancelHandle::new())
    }

    pub fn solve_with<M: ConstraintModel>(
        &self,
        mut model: M,
        cancel: &CancelHandle,
    ) -> SolutionSet {
        info!(
            employees = self.roster.len(),
            slots = self.week.slot_count(),
            max_solutions = self.opts.max_solutions,
            "building schedule model"
        );
        let vars = self.build_model(&mut model);
        enumerate::enumerate(self.week, self.roster, self.opts, &vars, &mut model, cancel)
    }

    pub fn check(&self, solution: &Solution) -> Vec<Violation> {
        conflicts::detect_violations(self.week, self.roster, self.opts, solution)
    }
}
