// src/noyau/format.rs
//
// Rationnel exact -> texte affiché dans la zone résultat.
// Le texte produit doit rester relisible par jetons.rs : il peut redevenir
// le premier jeton d’une nouvelle équation.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// Nombre de décimales conservées (arrondi) pour un résultat non entier.
pub const DECIMALES_AFFICHEES: usize = 12;

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// 10^k exact (k négatif => 1 / 10^|k|).
pub fn puissance10(k: i32) -> BigRational {
    let p = BigInt::from(10).pow(k.unsigned_abs());
    if k < 0 {
        BigRational::new(BigInt::one(), p)
    } else {
        BigRational::from_integer(p)
    }
}

/// round(abs × 10^p), moitié vers le haut (abs >= 0).
fn arrondi(abs: &BigRational, p: i32) -> BigInt {
    (abs * puissance10(p)).round().to_integer()
}

/// Convertit un entier “scalé” (×10^digits, positif) en texte décimal.
fn scaled_to_decimal(scaled: &BigInt, digits: usize) -> String {
    let scale = pow10(digits);
    let int_part = scaled / &scale;
    let frac_part = scaled % &scale;

    if digits == 0 {
        return format!("{int_part}");
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    format!("{int_part}.{frac}")
}

fn sans_zeros_finaux(texte: String) -> String {
    if texte.contains('.') {
        texte.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        texte
    }
}

/// k tel que 10^k <= abs < 10^(k+1) (abs > 0).
fn exposant10(abs: &BigRational) -> i32 {
    // estimation par les tailles binaires, puis ajustement
    let bits = abs.numer().bits() as f64 - abs.denom().bits() as f64;
    let mut k = (bits * std::f64::consts::LOG10_2).floor() as i32;

    while *abs < puissance10(k) {
        k -= 1;
    }
    while *abs >= puissance10(k + 1) {
        k += 1;
    }
    k
}

/// "3.333333333333e-13" : mantisse dans [1, 10), `digits` décimales au plus.
fn notation_scientifique(abs: &BigRational, digits: usize) -> String {
    let mut k = exposant10(abs);
    let mut mantisse = arrondi(abs, digits as i32 - k);

    // 9.9999999999999 -> 10.000000000000
    if mantisse >= pow10(digits + 1) {
        mantisse /= 10u32;
        k += 1;
    }

    let texte = sans_zeros_finaux(scaled_to_decimal(&mantisse, digits));
    format!("{texte}e{k}")
}

/// Formate un résultat :
/// - entier => "42", "-7"
/// - sinon  => décimal arrondi à `digits`, zéros finaux retirés ("0.5", "0.666666666667")
/// - non nul mais arrondi à zéro => notation scientifique ("1e-13")
/// - jamais de "-0"
pub fn format_nombre(r: &BigRational, digits: usize) -> String {
    if r.denom().is_one() {
        return format!("{}", r.numer());
    }

    // non entier => non nul
    let abs = r.abs();
    let scaled = arrondi(&abs, digits as i32);

    let texte = if scaled.is_zero() {
        notation_scientifique(&abs, digits)
    } else {
        sans_zeros_finaux(scaled_to_decimal(&scaled, digits))
    };

    if r.is_negative() {
        format!("-{texte}")
    } else {
        texte
    }
}
