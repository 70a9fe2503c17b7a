// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> valeur
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis l’évaluer sur des rationnels exacts
//
// Règles:
// - '-' / '+' unaires quand on n’attend PAS une valeur : Neg / Pos (préfixes).
//   Précédence: + - < * / < unaire < ^  (donc -2^2 = -4, 2^-1 = 1/2)
// - Multiplication implicite : "2(3)", "(1)(2)", ")4" => on injecte '*'.
// - Évaluation : une valeur non numérique (division par zéro, puissance
//   hors domaine) est absorbante mais on continue la vérification de structure.

use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::eval::{ErreurEquation, Valeur};
use super::jetons::Tok;

/// Au-delà, une puissance entière qui grandit est considérée hors domaine
/// (comme un débordement flottant).
const BITS_PUISSANCE_MAX: u64 = 65_536;

/// Borne d’une puissance entière qui rapetisse (|résultat| < 1) : elle reste
/// exacte bien plus loin, puis s’affiche en notation scientifique.
const BITS_PUISSANCE_MAX_PETITE: u64 = 262_144;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg | Tok::Pos => 3,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Num(2), Star, Minus, Num(3)]
///   rpn:    [Num(2), Num(3), Neg, Star]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, ErreurEquation> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un nombre ou une expression fermée.
    // Sert à détecter les unaires et la multiplication implicite.
    let mut prev_was_value = false;

    for tok in tokens.iter().cloned() {
        match tok {
            Tok::Num(_) | Tok::LPar if prev_was_value => {
                pousse_binaire(Tok::Star, &mut out, &mut ops);
                if matches!(tok, Tok::Num(_)) {
                    out.push(tok);
                    prev_was_value = true;
                } else {
                    ops.push(tok);
                    prev_was_value = false;
                }
            }

            Tok::Num(_) => {
                out.push(tok);
                prev_was_value = true;
            }

            Tok::LPar => {
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value {
                    return Err(ErreurEquation::Malformee("parenthèse vide ou opérande manquant"));
                }

                // dépile jusqu’à '('
                let mut ouverte = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Tok::LPar) {
                        ouverte = true;
                        break;
                    }
                    out.push(top);
                }
                if !ouverte {
                    return Err(ErreurEquation::Malformee("parenthèse fermante sans ouvrante"));
                }

                prev_was_value = true;
            }

            Tok::Minus | Tok::Plus if !prev_was_value => {
                // préfixe : rien à dépiler (il s’applique à ce qui suit)
                ops.push(if matches!(tok, Tok::Minus) {
                    Tok::Neg
                } else {
                    Tok::Pos
                });
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if !prev_was_value {
                    return Err(ErreurEquation::Malformee("opérateur sans opérande gauche"));
                }
                pousse_binaire(tok, &mut out, &mut ops);
                prev_was_value = false;
            }

            Tok::Neg | Tok::Pos => {
                return Err(ErreurEquation::Malformee("jeton interne inattendu"));
            }
        }
    }

    if !prev_was_value {
        return Err(ErreurEquation::Malformee("opérande manquant en fin d’équation"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(ErreurEquation::Malformee("parenthèses non fermées"));
        }
        out.push(op);
    }

    Ok(out)
}

/// Dépile selon précédence/associativité puis empile l’opérateur binaire.
fn pousse_binaire(tok: Tok, out: &mut Vec<Tok>, ops: &mut Vec<Tok>) {
    while let Some(top) = ops.last() {
        if matches!(top, Tok::LPar) {
            break;
        }

        let p_top = precedence(top);
        let p_tok = precedence(&tok);

        let doit_pop = if is_right_associative(&tok) {
            p_top > p_tok
        } else {
            p_top >= p_tok
        };

        if !doit_pop {
            break;
        }
        if let Some(t) = ops.pop() {
            out.push(t);
        }
    }

    ops.push(tok);
}

/// Évalue une RPN sur des rationnels exacts.
///
/// - `None` dans la pile = valeur non numérique (absorbante).
/// - Une pile qui ne se réduit pas à une seule valeur => équation malformée.
pub fn eval_rpn(rpn: &[Tok]) -> Result<Valeur, ErreurEquation> {
    let mut st: Vec<Option<BigRational>> = Vec::new();

    for tok in rpn.iter() {
        match tok {
            Tok::Num(r) => st.push(Some(r.clone())),

            Tok::Neg | Tok::Pos => {
                let x = st.pop().ok_or(ErreurEquation::Malformee("unaire sans opérande"))?;
                st.push(match tok {
                    Tok::Neg => x.map(|v| -v),
                    _ => x,
                });
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let b = st.pop().ok_or(ErreurEquation::Malformee("opérande manquant"))?;
                let a = st.pop().ok_or(ErreurEquation::Malformee("opérande manquant"))?;

                let v = match (a, b) {
                    (Some(a), Some(b)) => applique(tok, a, b),
                    _ => None,
                };
                st.push(v);
            }

            Tok::LPar | Tok::RPar => {
                return Err(ErreurEquation::Malformee("parenthèse inattendue en RPN"));
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some(Some(r)), true) => Ok(Valeur::Nombre(r)),
        (Some(None), true) => Ok(Valeur::NonNumerique),
        _ => Err(ErreurEquation::Malformee("expression invalide")),
    }
}

fn applique(op: &Tok, a: BigRational, b: BigRational) -> Option<BigRational> {
    match op {
        Tok::Plus => Some(a + b),
        Tok::Minus => Some(a - b),
        Tok::Star => Some(a * b),
        Tok::Slash => {
            if b.is_zero() {
                None
            } else {
                Some(a / b)
            }
        }
        Tok::Caret => puissance(a, b),
        _ => None,
    }
}

/// a^b :
/// - exposant entier => exact (borné en taille)
/// - sinon => passage par f64, retour en rationnel si fini
fn puissance(base: BigRational, exp: BigRational) -> Option<BigRational> {
    if exp.denom().is_one() {
        let n = exp.numer();

        if n.is_zero() {
            return Some(BigRational::one());
        }
        if base.is_zero() {
            return if n.is_negative() {
                None // 0^-n = 1/0
            } else {
                Some(BigRational::zero())
            };
        }
        if base.numer().abs().is_one() && base.denom().is_one() {
            // ±1 : pas de croissance, parité suffit
            let impair = !(n % 2u32).is_zero();
            return Some(if base.is_negative() && impair {
                -BigRational::one()
            } else {
                BigRational::one()
            });
        }

        let e = n.abs().to_u64()?;
        let bits = base.numer().bits().max(base.denom().bits());
        let grandit = (base.abs() > BigRational::one()) == n.is_positive();
        let limite = if grandit {
            BITS_PUISSANCE_MAX
        } else {
            BITS_PUISSANCE_MAX_PETITE
        };
        if bits.saturating_mul(e) > limite {
            return None;
        }

        let e = i32::try_from(e).ok()?;
        let pos = pow_exact(base, e);
        return if n.is_negative() {
            Some(BigRational::one() / pos)
        } else {
            Some(pos)
        };
    }

    let f = base.to_f64()?.powf(exp.to_f64()?);
    if !f.is_finite() {
        return None;
    }
    BigRational::from_float(f)
}

fn pow_exact(base: BigRational, e: i32) -> BigRational {
    let mut acc = BigRational::one();
    let mut b = base;
    let mut e = e;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::{format_tokens, tokenize};
    use num_bigint::BigInt;

    fn rpn_txt(s: &str) -> String {
        format_tokens(&to_rpn(&tokenize(s).unwrap()).unwrap())
    }

    fn valeur(s: &str) -> Result<Valeur, ErreurEquation> {
        eval_rpn(&to_rpn(&tokenize(s)?)?)
    }

    fn entier(n: i64) -> Valeur {
        Valeur::Nombre(BigRational::from_integer(BigInt::from(n)))
    }

    #[test]
    fn precedence_classique() {
        assert_eq!(rpn_txt("1 + 2 * 3"), "1 2 3 * +");
        assert_eq!(rpn_txt("(1 + 2) * 3"), "1 2 + 3 *");
        assert_eq!(valeur("1 + 2 * 3"), Ok(entier(7)));
    }

    #[test]
    fn puissance_associative_a_droite() {
        assert_eq!(rpn_txt("2 ^ 3 ^ 2"), "2 3 2 ^ ^");
        assert_eq!(valeur("2 ^ 3 ^ 2"), Ok(entier(512)));
    }

    #[test]
    fn moins_unaire() {
        assert_eq!(valeur("2 × -3"), Ok(entier(-6)));
        assert_eq!(valeur("-2 ^ 2"), Ok(entier(-4)));
        assert_eq!(valeur("- -3"), Ok(entier(3)));
        assert_eq!(valeur("(-2) ^ 3"), Ok(entier(-8)));
        assert_eq!(valeur("+5"), Ok(entier(5)));
    }

    #[test]
    fn multiplication_implicite() {
        assert_eq!(valeur("2(3)"), Ok(entier(6)));
        assert_eq!(valeur("(1 + 1)(4)"), Ok(entier(8)));
        assert_eq!(valeur("(2)5"), Ok(entier(10)));
    }

    #[test]
    fn exposant_negatif_et_fractionnaire() {
        assert_eq!(
            valeur("2 ^ -2"),
            Ok(Valeur::Nombre(BigRational::new(BigInt::from(1), BigInt::from(4))))
        );
        assert_eq!(valeur("4 ^ 0.5"), Ok(entier(2)));
        assert_eq!(valeur("(-1) ^ 7"), Ok(entier(-1)));
    }

    #[test]
    fn non_numeriques() {
        assert_eq!(valeur("1 / 0"), Ok(Valeur::NonNumerique));
        assert_eq!(valeur("0 ^ -1"), Ok(Valeur::NonNumerique));
        assert_eq!(valeur("(-8) ^ 0.5"), Ok(Valeur::NonNumerique));
        assert_eq!(valeur("10 ^ 100000"), Ok(Valeur::NonNumerique));
        assert_eq!(valeur("0.5 ^ 10000000"), Ok(Valeur::NonNumerique));
        // absorbant
        assert_eq!(valeur("1 / 0 + 2"), Ok(Valeur::NonNumerique));
    }

    #[test]
    fn petites_puissances_exactes() {
        // résultat minuscule mais bien défini : pas de débordement
        for s in ["(1 / 3) ^ 40000", "0.5 ^ 70000", "2 ^ -70000"] {
            assert!(
                matches!(valeur(s), Ok(Valeur::Nombre(_))),
                "{s} devrait rester numérique"
            );
        }
        assert_eq!(valeur("0.5 ^ 70000"), valeur("2 ^ -70000"));
    }

    #[test]
    fn malformees() {
        assert!(matches!(valeur("1 +"), Err(ErreurEquation::Malformee(_))));
        assert!(matches!(valeur("(1 + 2"), Err(ErreurEquation::Malformee(_))));
        assert!(matches!(valeur("1 + 2)"), Err(ErreurEquation::Malformee(_))));
        assert!(matches!(valeur("()"), Err(ErreurEquation::Malformee(_))));
        assert!(matches!(valeur("× 2"), Err(ErreurEquation::Malformee(_))));
        assert!(matches!(valeur("2 × × 3"), Err(ErreurEquation::Malformee(_))));
    }
}
