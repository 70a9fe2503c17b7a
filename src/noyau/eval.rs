//! Noyau — évaluation (pipeline réel)
//!
//! tokenize -> RPN -> valeur exacte (rationnel) | non numérique
//!
//! Deux issues d’échec distinctes, que l’appelant peut confondre à l’affichage :
//! - `Err(ErreurEquation)` : la chaîne n’est pas une équation bien formée
//! - `Ok(Valeur::NonNumerique)` : bien formée, mais sans valeur (ex: 5 / 0)

use num_rational::BigRational;
use thiserror::Error;
use tracing::trace;

use super::format::{format_nombre, DECIMALES_AFFICHEES};
use super::jetons::{format_tokens, tokenize};
use super::rpn::{eval_rpn, to_rpn};

/// Équation impossible à évaluer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErreurEquation {
    #[error("Entrée vide")]
    Vide,

    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),

    #[error("nombre invalide: {0}")]
    NombreInvalide(String),

    #[error("équation malformée: {0}")]
    Malformee(&'static str),
}

/// Valeur d’une équation bien formée.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Valeur {
    Nombre(BigRational),
    NonNumerique,
}

impl Valeur {
    /// Texte du résultat, `None` si non numérique.
    pub fn affichage(&self) -> Option<String> {
        match self {
            Valeur::Nombre(r) => Some(format_nombre(r, DECIMALES_AFFICHEES)),
            Valeur::NonNumerique => None,
        }
    }
}

pub type Evaluation = Result<Valeur, ErreurEquation>;

/// API publique : évalue une équation affichée ("1 + 2 × -3").
pub fn evaluate(equation: &str) -> Evaluation {
    let s = equation.trim();
    if s.is_empty() {
        return Err(ErreurEquation::Vide);
    }

    let jetons = tokenize(s)?;
    let rpn = to_rpn(&jetons)?;
    trace!(rpn = %format_tokens(&rpn), "équation en RPN");

    eval_rpn(&rpn)
}

/// Prédicat de validité : l’équation était bien formée (valeur numérique ou non).
pub fn is_equation_valid(evaluation: &Evaluation) -> bool {
    evaluation.is_ok()
}
