use crate::model::{Roster, ShiftKind, Week};
use crate::solver::{ConstraintModel, VarId};
use std::collections::BTreeMap;

/// Clé d'une variable de décision : employé (index dans le roster), jour, shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarKey {
    pub employee: usize,
    pub day: usize,
    pub kind: ShiftKind,
}

/// Une variable booléenne par triplet existant dans le catalogue, pas plus.
#[derive(Debug, Clone, Default)]
pub struct ShiftVars {
    employees: usize,
    vars: BTreeMap<VarKey, VarId>,
}

impl ShiftVars {
    /// `None` si le shift n'existe pas ce jour-là : à traiter comme la constante 0.
    pub fn get(&self, employee: usize, day: usize, kind: ShiftKind) -> Option<VarId> {
        self.vars
            .get(&VarKey {
                employee,
                day,
                kind,
            })
            .copied()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarKey, VarId)> + '_ {
        self.vars.iter().map(|(k, v)| (*k, *v))
    }

    /// Colonne d'un créneau : la variable de chaque employé, dans l'ordre du roster.
    pub fn for_slot(&self, day: usize, kind: ShiftKind) -> Vec<VarId> {
        (0..self.employees)
            .filter_map(|e| self.get(e, day, kind))
            .collect()
    }

    pub fn for_employee_day(&self, employee: usize, day: usize) -> Vec<VarId> {
        self.vars
            .range(
                VarKey {
                    employee,
                    day,
                    kind: ShiftKind::Morning,
                }..,
            )
            .take_while(|(k, _)| k.employee == employee && k.day == day)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn for_employee(&self, employee: usize) -> Vec<VarId> {
        self.vars
            .iter()
            .filter(|(k, _)| k.employee == employee)
            .map(|(_, v)| *v)
            .collect()
    }
}

/// Étiquette déterministe, dérivée de la clé.
pub fn var_label(employee: &str, day: usize, kind: ShiftKind) -> String {
    format!("shift_{employee}_day{day}_{kind}")
}

pub(super) fn encode<M: ConstraintModel>(week: &Week, roster: &Roster, model: &mut M) -> ShiftVars {
    let mut vars = BTreeMap::new();
    for (e, employee) in roster.employees.iter().enumerate() {
        for (d, day) in week.days().iter().enumerate() {
            for kind in day.kinds() {
                let id = model.new_bool_var(&var_label(&employee.name, d, *kind));
                vars.insert(
                    VarKey {
                        employee: e,
                        day: d,
                        kind: *kind,
                    },
                    id,
                );
            }
        }
    }
    ShiftVars {
        employees: roster.len(),
        vars,
    }
}
