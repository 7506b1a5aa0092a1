//! Contrat du solveur de contraintes consommé par le planificateur.
//!
//! Le planificateur ne connaît que le trait [`ConstraintModel`] ; le
//! backend fourni ([`LpModel`]) traduit le modèle en programme linéaire
//! en nombres entiers via `good_lp`.

mod lp;

pub use lp::LpModel;

use std::ops::Not;
use std::time::Duration;

/// Identifiant opaque d'une variable booléenne.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

/// Variable ou sa négation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    Pos(VarId),
    Neg(VarId),
}

impl Literal {
    pub fn var(self) -> VarId {
        match self {
            Literal::Pos(v) | Literal::Neg(v) => v,
        }
    }

    /// Valeur du littéral sous une affectation de sa variable.
    pub fn holds(self, value: bool) -> bool {
        match self {
            Literal::Pos(_) => value,
            Literal::Neg(_) => !value,
        }
    }
}

impl From<VarId> for Literal {
    fn from(v: VarId) -> Self {
        Literal::Pos(v)
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        match self {
            Literal::Pos(v) => Literal::Neg(v),
            Literal::Neg(v) => Literal::Pos(v),
        }
    }
}

impl Not for VarId {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal::Neg(self)
    }
}

/// Somme pondérée de littéraux.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(i64, Literal)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Somme à coefficients unitaires.
    pub fn sum<I, L>(lits: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        Self {
            terms: lits.into_iter().map(|l| (1, l.into())).collect(),
        }
    }

    pub fn add<L: Into<Literal>>(&mut self, coef: i64, lit: L) -> &mut Self {
        self.terms.push((coef, lit.into()));
        self
    }

    pub fn terms(&self) -> &[(i64, Literal)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Plus petite et plus grande valeur atteignables.
    pub fn bounds(&self) -> (i64, i64) {
        self.terms.iter().fold((0, 0), |(lo, hi), (c, _)| {
            (lo + (*c).min(0), hi + (*c).max(0))
        })
    }

    /// Évalue l'expression ; `value` renvoie la valeur de chaque variable.
    pub fn eval<F: Fn(VarId) -> bool>(&self, value: F) -> i64 {
        self.terms
            .iter()
            .filter(|(_, lit)| lit.holds(value(lit.var())))
            .map(|(c, _)| *c)
            .sum()
    }
}

/// `lower <= expr <= upper`, chaque borne étant optionnelle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl LinearConstraint {
    pub fn le(expr: LinearExpr, bound: i64) -> Self {
        Self {
            expr,
            lower: None,
            upper: Some(bound),
        }
    }

    pub fn ge(expr: LinearExpr, bound: i64) -> Self {
        Self {
            expr,
            lower: Some(bound),
            upper: None,
        }
    }

    pub fn equals(expr: LinearExpr, target: i64) -> Self {
        Self {
            expr,
            lower: Some(target),
            upper: Some(target),
        }
    }

    pub fn is_satisfied<F: Fn(VarId) -> bool>(&self, value: F) -> bool {
        let v = self.expr.eval(value);
        self.lower.map_or(true, |lo| v >= lo) && self.upper.map_or(true, |hi| v <= hi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unknown,
}

/// Résultat d'un appel au solveur.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    values: Vec<bool>,
}

impl SolveOutcome {
    pub fn optimal(values: Vec<bool>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
        }
    }

    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
        }
    }

    /// `false` pour une variable inconnue ou sans solution.
    pub fn value(&self, var: VarId) -> bool {
        self.values.get(var.0).copied().unwrap_or(false)
    }
}

/// Opérations attendues d'un solveur booléen avec objectif linéaire.
pub trait ConstraintModel {
    fn new_bool_var(&mut self, label: &str) -> VarId;
    fn add_exactly_one(&mut self, vars: &[VarId]);
    fn add_at_most_one(&mut self, vars: &[VarId]);
    fn add_linear_le(&mut self, expr: LinearExpr, bound: i64);
    /// `indicator <=> sum(vars) == target`.
    fn add_reified_eq(&mut self, indicator: VarId, vars: &[VarId], target: i64);
    /// `condition => constraint`.
    fn add_implication(&mut self, condition: Literal, constraint: LinearConstraint);
    fn add_bool_or(&mut self, literals: &[Literal]);
    fn set_objective_maximize(&mut self, objective: LinearExpr);
    /// Interdit que tous les littéraux de `assignment` soient vrais à la fois.
    fn add_exclusion(&mut self, assignment: &[Literal]);
    /// Budget du prochain `solve()` ; un backend qui ne sait pas l'honorer l'ignore.
    fn set_time_limit(&mut self, _limit: Option<Duration>) {}
    /// `Unknown` si le budget est épuisé avant la preuve.
    fn solve(&mut self) -> SolveOutcome;
}
