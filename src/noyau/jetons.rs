// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::eval::ErreurEquation;
use super::format::puissance10;

/// Exposant décimal accepté en lecture ("1e-13").
const EXPOSANT_MAX: u32 = 100_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    // Produits par le RPN seulement (le lexer ne sait pas si '-' / '+' est unaire).
    Neg,
    Pos,

    LPar,
    RPar,
}

/// Tokenize une équation affichée en jetons.
/// Supporte:
/// - nombres décimaux (ex: 12, 1.5, .5, 3.)
/// - exposant décimal des petits résultats (ex: 3.3e-13)
/// - opérateurs + - * / ^ et leurs variantes d’affichage − × ÷
/// - parenthèses ( )
/// - espaces ignorés (les jetons d’affichage sont paddés)
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurEquation> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let op = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' | '−' => Some(Tok::Minus),
            '*' | '×' => Some(Tok::Star),
            '/' | '÷' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            _ => None,
        };
        if let Some(t) = op {
            out.push(t);
            i += 1;
            continue;
        }

        // Nombre décimal : une suite de chiffres et de points, un point au plus.
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let brut: String = chars[start..i].iter().collect();
            let mut valeur = parse_decimal(&brut)?;

            if let Some((k, fin)) = lit_exposant(&chars, i)? {
                valeur *= puissance10(k);
                i = fin;
            }

            out.push(Tok::Num(valeur));
            continue;
        }

        return Err(ErreurEquation::CaractereInattendu(c));
    }

    Ok(out)
}

/// "12.50" -> 1250/100 (réduit). Refuse "." seul et les points multiples.
fn parse_decimal(brut: &str) -> Result<BigRational, ErreurEquation> {
    let invalide = || ErreurEquation::NombreInvalide(brut.to_string());

    let (entier, frac) = match brut.split_once('.') {
        Some((e, f)) => (e, f),
        None => (brut, ""),
    };
    if frac.contains('.') || (entier.is_empty() && frac.is_empty()) {
        return Err(invalide());
    }

    let chiffres = format!("{entier}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or_else(invalide)?;

    let mut d = BigInt::one();
    for _ in 0..frac.len() {
        d *= 10u32;
    }
    Ok(BigRational::new(n, d))
}

/// "e-13" à partir de `i` : (exposant, index de fin), `None` si ce n’est pas un exposant.
fn lit_exposant(chars: &[char], i: usize) -> Result<Option<(i32, usize)>, ErreurEquation> {
    if !matches!(chars.get(i), Some('e' | 'E')) {
        return Ok(None);
    }

    let mut j = i + 1;
    if matches!(chars.get(j), Some('-' | '+')) {
        j += 1;
    }
    let debut_chiffres = j;
    while chars.get(j).is_some_and(char::is_ascii_digit) {
        j += 1;
    }
    if j == debut_chiffres {
        return Ok(None);
    }

    let brut: String = chars[i + 1..j].iter().collect();
    let invalide = || ErreurEquation::NombreInvalide(brut.clone());
    let k: i32 = brut.parse().map_err(|_| invalide())?;
    if k.unsigned_abs() > EXPOSANT_MAX {
        return Err(invalide());
    }
    Ok(Some((k, j)))
}

/// Format utilitaire (journal) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for t in tokens {
        let s = match t {
            Tok::Num(r) if r.denom().is_one() => format!("{}", r.numer()),
            Tok::Num(r) => format!("{}/{}", r.numer(), r.denom()),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Neg => "neg".to_string(),
            Tok::Pos => "pos".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
