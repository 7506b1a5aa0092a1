#![forbid(unsafe_code)]
use std::time::Duration;

use roulement::solver::{
    ConstraintModel, LinearConstraint, LinearExpr, Literal, LpModel, SolveStatus,
};

#[test]
fn exactly_one_follows_objective() {
    let mut m = LpModel::new();
    let a = m.new_bool_var("a");
    let b = m.new_bool_var("b");
    let c = m.new_bool_var("c");
    m.add_exactly_one(&[a, b, c]);
    let mut obj = LinearExpr::new();
    obj.add(1, a).add(5, b).add(2, c);
    m.set_objective_maximize(obj);

    let out = m.solve();
    assert_eq!(out.status, SolveStatus::Optimal);
    assert!(!out.value(a));
    assert!(out.value(b));
    assert!(!out.value(c));
    assert_eq!(m.label(b), Some("b"));
    assert_eq!(m.find_var("c"), Some(c));
}

#[test]
fn empty_exactly_one_is_infeasible() {
    let mut m = LpModel::new();
    let _ = m.new_bool_var("x");
    m.add_exactly_one(&[]);
    assert_eq!(m.solve().status, SolveStatus::Infeasible);
}

#[test]
fn reified_eq_tracks_the_sum() {
    // x = 1, y = 1 : la somme vaut 2, l'indicateur de "== 1" doit rester faux
    let mut m = LpModel::new();
    let x = m.new_bool_var("x");
    let y = m.new_bool_var("y");
    let ind = m.new_bool_var("ind");
    let mut force = LinearExpr::new();
    force.add(-1, x).add(-1, y);
    m.add_linear_le(force, -2);
    m.add_reified_eq(ind, &[x, y], 1);
    m.set_objective_maximize(LinearExpr::sum([ind]));
    let out = m.solve();
    assert_eq!(out.status, SolveStatus::Optimal);
    assert!(!out.value(ind));

    // x = 1, y = 0 : l'indicateur est forcé à vrai même si l'objectif le pénalise
    let mut m = LpModel::new();
    let x = m.new_bool_var("x");
    let y = m.new_bool_var("y");
    let ind = m.new_bool_var("ind");
    let mut force = LinearExpr::new();
    force.add(-1, x);
    m.add_linear_le(force, -1);
    m.add_linear_le(LinearExpr::sum([y]), 0);
    m.add_reified_eq(ind, &[x, y], 1);
    let mut obj = LinearExpr::new();
    obj.add(-1, ind);
    m.set_objective_maximize(obj);
    let out = m.solve();
    assert_eq!(out.status, SolveStatus::Optimal);
    assert!(out.value(ind));
}

#[test]
fn reified_eq_over_nothing_is_false() {
    let mut m = LpModel::new();
    let ind = m.new_bool_var("closed");
    m.add_reified_eq(ind, &[], 1);
    m.set_objective_maximize(LinearExpr::sum([ind]));
    let out = m.solve();
    assert_eq!(out.status, SolveStatus::Optimal);
    assert!(!out.value(ind));
}

#[test]
fn implication_on_negated_literal() {
    let mut m = LpModel::new();
    let x = m.new_bool_var("x");
    let cond = m.new_bool_var("cond");
    m.add_linear_le(LinearExpr::sum([cond]), 0);
    m.add_implication(Literal::Neg(cond), LinearConstraint::equals(LinearExpr::sum([x]), 0));
    m.set_objective_maximize(LinearExpr::sum([x]));
    let out = m.solve();
    assert_eq!(out.status, SolveStatus::Optimal);
    assert!(!out.value(x));
}

#[test]
fn bool_or_forbids_both() {
    let mut m = LpModel::new();
    let a = m.new_bool_var("a");
    let b = m.new_bool_var("b");
    m.add_bool_or(&[!a, !b]);
    m.set_objective_maximize(LinearExpr::sum([a, b]));
    let out = m.solve();
    assert_eq!(out.status, SolveStatus::Optimal);
    assert!(out.value(a) ^ out.value(b));
}

#[test]
fn exclusions_walk_through_every_assignment() {
    let mut m = LpModel::new();
    let a = m.new_bool_var("a");
    let b = m.new_bool_var("b");
    m.add_exactly_one(&[a, b]);
    let mut obj = LinearExpr::new();
    obj.add(2, a).add(1, b);
    m.set_objective_maximize(obj);

    let first = m.solve();
    assert!(first.value(a));
    m.add_exclusion(&[Literal::Pos(a), Literal::Neg(b)]);

    let second = m.solve();
    assert_eq!(second.status, SolveStatus::Optimal);
    assert!(second.value(b));
    m.add_exclusion(&[Literal::Neg(a), Literal::Pos(b)]);

    assert_eq!(m.solve().status, SolveStatus::Infeasible);
}

#[test]
fn feasibility_check_matches_rows() {
    let mut m = LpModel::new();
    let a = m.new_bool_var("a");
    let b = m.new_bool_var("b");
    m.add_at_most_one(&[a, b]);
    assert!(m.is_feasible(&[true, false]));
    assert!(m.is_feasible(&[false, false]));
    assert!(!m.is_feasible(&[true, true]));
    assert!(!m.is_feasible(&[true]));
    assert_eq!(m.constraint_count(), 1);
}

#[test]
fn time_limited_solve_still_finds_the_optimum() {
    let mut m = LpModel::new();
    let a = m.new_bool_var("a");
    let b = m.new_bool_var("b");
    m.add_exactly_one(&[a, b]);
    let mut obj = LinearExpr::new();
    obj.add(1, a).add(3, b);
    m.set_objective_maximize(obj);
    m.set_time_limit(Some(Duration::from_secs(30)));

    let out = m.solve();
    assert_eq!(out.status, SolveStatus::Optimal);
    assert!(out.value(b));

    m.add_exclusion(&[Literal::Neg(a), Literal::Pos(b)]);
    m.add_exclusion(&[Literal::Pos(a), Literal::Neg(b)]);
    assert_eq!(m.solve().status, SolveStatus::Infeasible);
}
