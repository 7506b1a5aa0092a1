use super::{
    ConstraintModel, LinearConstraint, LinearExpr, Literal, SolveOutcome, SolveStatus, VarId,
};
use good_lp::{
    microlp, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Contrainte linéaire active seulement si tous les littéraux `enforce` sont vrais.
#[derive(Debug, Clone)]
struct Row {
    constraint: LinearConstraint,
    enforce: Vec<Literal>,
}

impl Row {
    fn holds(&self, values: &[bool]) -> bool {
        let value = |v: VarId| values.get(v.0).copied().unwrap_or(false);
        let active = self.enforce.iter().all(|l| l.holds(value(l.var())));
        !active || self.constraint.is_satisfied(value)
    }
}

/// Modèle en mémoire, reconstruit en MILP (`good_lp` + `microlp`) à chaque `solve`.
///
/// Les contraintes conditionnelles passent par un big-M calculé à partir
/// des bornes de l'expression, ce qui reste exact pour des variables 0/1.
///
/// Avec un budget, la résolution tourne sur un thread dédié ; passé le délai
/// on rend `Unknown` sans attendre ce thread.
#[derive(Debug, Default, Clone)]
pub struct LpModel {
    labels: Vec<String>,
    rows: Vec<Row>,
    objective: LinearExpr,
    time_limit: Option<Duration>,
}

impl LpModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var_count(&self) -> usize {
        self.labels.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.rows.len()
    }

    pub fn label(&self, var: VarId) -> Option<&str> {
        self.labels.get(var.0).map(String::as_str)
    }

    pub fn find_var(&self, label: &str) -> Option<VarId> {
        self.labels.iter().position(|l| l == label).map(VarId)
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Vérifie une affectation complète contre toutes les contraintes.
    pub fn is_feasible(&self, values: &[bool]) -> bool {
        values.len() == self.labels.len() && self.rows.iter().all(|r| r.holds(values))
    }

    fn push(&mut self, constraint: LinearConstraint, enforce: Vec<Literal>) {
        self.rows.push(Row {
            constraint,
            enforce,
        });
    }

    fn run(&self) -> SolveOutcome {
        // lignes sans variable : décidées ici, jamais transmises au solveur
        let violated_constant = self.rows.iter().any(|r| {
            r.enforce.is_empty()
                && r.constraint.expr.is_empty()
                && !r.constraint.is_satisfied(|_| false)
        });
        if violated_constant {
            return SolveOutcome::without_solution(SolveStatus::Infeasible);
        }

        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = self
            .labels
            .iter()
            .map(|l| vars.add(variable().binary().name(l.clone())))
            .collect();

        let (objective, _) = to_affine(&self.objective, &xs);
        let mut problem = vars.maximise(objective).using(microlp);
        for row in &self.rows {
            for c in Self::linearize(row, &xs) {
                problem.add_constraint(c);
            }
        }

        debug!(vars = xs.len(), rows = self.rows.len(), "solving milp");
        match problem.solve() {
            Ok(solution) => {
                let values = xs.iter().map(|x| solution.value(*x) > 0.5).collect();
                SolveOutcome::optimal(values)
            }
            Err(ResolutionError::Infeasible) => {
                SolveOutcome::without_solution(SolveStatus::Infeasible)
            }
            Err(err) => {
                warn!(error = %err, "solver returned no usable solution");
                SolveOutcome::without_solution(SolveStatus::Unknown)
            }
        }
    }

    /// Traduit une ligne en zéro, une ou deux inégalités linéaires.
    fn linearize(row: &Row, xs: &[Variable]) -> Vec<good_lp::Constraint> {
        let (min, max) = row.constraint.expr.bounds();
        let mut out = Vec::with_capacity(2);

        if let Some(upper) = row.constraint.upper {
            if max > upper || row.enforce.is_empty() {
                // expr - M * sum(!l) <= upper
                let big_m = (max - upper).max(0);
                let mut expr = row.constraint.expr.clone();
                for lit in &row.enforce {
                    expr.add(-big_m, !*lit);
                }
                if !expr.is_empty() {
                    let (lhs, constant) = to_affine(&expr, xs);
                    out.push(lhs.leq((upper - constant) as f64));
                }
            }
        }

        if let Some(lower) = row.constraint.lower {
            if min < lower || row.enforce.is_empty() {
                // expr + M * sum(!l) >= lower
                let big_m = (lower - min).max(0);
                let mut expr = row.constraint.expr.clone();
                for lit in &row.enforce {
                    expr.add(big_m, !*lit);
                }
                if !expr.is_empty() {
                    let (lhs, constant) = to_affine(&expr, xs);
                    out.push(lhs.geq((lower - constant) as f64));
                }
            }
        }

        out
    }
}

/// Partie variable + constante : `c * !x` devient `c - c * x`.
fn to_affine(expr: &LinearExpr, xs: &[Variable]) -> (Expression, i64) {
    let mut constant = 0i64;
    let lhs = expr
        .terms()
        .iter()
        .fold(Expression::from(0.0), |acc, (coef, lit)| match lit {
            Literal::Pos(v) => acc + (*coef as f64) * xs[v.0],
            Literal::Neg(v) => {
                constant += coef;
                acc + (-*coef as f64) * xs[v.0]
            }
        });
    (lhs, constant)
}

impl ConstraintModel for LpModel {
    fn new_bool_var(&mut self, label: &str) -> VarId {
        self.labels.push(label.to_string());
        VarId(self.labels.len() - 1)
    }

    fn add_exactly_one(&mut self, vars: &[VarId]) {
        self.push(LinearConstraint::equals(LinearExpr::sum(vars.iter().copied()), 1), Vec::new());
    }

    fn add_at_most_one(&mut self, vars: &[VarId]) {
        self.push(LinearConstraint::le(LinearExpr::sum(vars.iter().copied()), 1), Vec::new());
    }

    fn add_linear_le(&mut self, expr: LinearExpr, bound: i64) {
        self.push(LinearConstraint::le(expr, bound), Vec::new());
    }

    fn add_reified_eq(&mut self, indicator: VarId, vars: &[VarId], target: i64) {
        let sum = LinearExpr::sum(vars.iter().copied());
        self.push(
            LinearConstraint::equals(sum.clone(), target),
            vec![Literal::Pos(indicator)],
        );
        // !indicator : la somme est soit au-dessus, soit en dessous de la cible
        let label = format!("{}_above", self.labels[indicator.0]);
        let above = self.new_bool_var(&label);
        self.push(
            LinearConstraint::ge(sum.clone(), target + 1),
            vec![Literal::Neg(indicator), Literal::Pos(above)],
        );
        self.push(
            LinearConstraint::le(sum, target - 1),
            vec![Literal::Neg(indicator), Literal::Neg(above)],
        );
    }

    fn add_implication(&mut self, condition: Literal, constraint: LinearConstraint) {
        self.push(constraint, vec![condition]);
    }

    fn add_bool_or(&mut self, literals: &[Literal]) {
        let sum = LinearExpr::sum(literals.iter().copied());
        self.push(LinearConstraint::ge(sum, 1), Vec::new());
    }

    fn set_objective_maximize(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    fn add_exclusion(&mut self, assignment: &[Literal]) {
        let negated: Vec<Literal> = assignment.iter().map(|l| !*l).collect();
        self.add_bool_or(&negated);
    }

    fn set_time_limit(&mut self, limit: Option<Duration>) {
        self.time_limit = limit;
    }

    fn solve(&mut self) -> SolveOutcome {
        let Some(limit) = self.time_limit else {
            return self.run();
        };
        let snapshot = self.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(snapshot.run());
        });
        match rx.recv_timeout(limit) {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(limit_ms = limit.as_millis() as u64, "solver ran out of time");
                SolveOutcome::without_solution(SolveStatus::Unknown)
            }
        }
    }
}
