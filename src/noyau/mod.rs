//! Noyau de la calculatrice
//!
//! Organisation interne :
//! - equation.rs : état de l’équation + transition `apply` (CE/AC, opérateurs, "=")
//! - jetons.rs   : tokenisation de l’équation affichée
//! - rpn.rs      : shunting-yard + évaluation exacte (rationnels)
//! - format.rs   : rationnel -> texte du résultat
//! - eval.rs     : pipeline complet + erreurs

pub mod equation;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod rpn;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use equation::{Action, EquationState, ModeEffacement, Operateur};
