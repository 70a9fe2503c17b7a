//! État de l’équation (machine à états du widget).
//!
//! Rôle : accumuler les jetons affichés (chiffres, opérateurs, parenthèses, "="),
//! décider quel bouton d’effacement est proposé (CE / AC), et déclencher
//! l’évaluation.
//!
//! Contrats :
//! - `apply(état, action) -> état'` est la SEULE transition.
//! - Aucune erreur ne sort d’ici : une équation invalide devient un texte de résultat.
//! - Jamais deux opérateurs non-moins consécutifs dans la suite de jetons.

use num_rational::BigRational;
use tracing::{debug, warn};

use super::eval::{evaluate, is_equation_valid, Valeur};

/// Texte affiché quand l’évaluation échoue (malformée ou non numérique).
pub const MESSAGE_EQUATION_INVALIDE: &str = "Invalid equation";

/// Résultat affiché au démarrage et après AC.
pub const RESULTAT_INITIAL: &str = "0";

/// Marqueur d’égalité (équation “fermée”).
const SIGNE_EGAL: &str = "=";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operateur {
    Puissance,
    Fois,
    Divise,
    Plus,
    Moins,
}

impl Operateur {
    pub const TOUS: [Operateur; 5] = [
        Operateur::Puissance,
        Operateur::Fois,
        Operateur::Divise,
        Operateur::Plus,
        Operateur::Moins,
    ];

    /// Symbole écrit dans l’équation affichée (relu tel quel par le noyau).
    pub fn symbole(self) -> &'static str {
        match self {
            Operateur::Puissance => "^",
            Operateur::Fois => "×",
            Operateur::Divise => "/",
            Operateur::Plus => "+",
            Operateur::Moins => "-",
        }
    }

    fn depuis_symbole(s: &str) -> Option<Operateur> {
        Self::TOUS.into_iter().find(|op| op.symbole() == s)
    }
}

/// Une action logique (bouton ou touche).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Evaluer,
    ClearEntree,
    ClearTout,
    Operateur(Operateur),
    /// Chiffre, point décimal ou parenthèse.
    Caractere(char),
}

/// Bouton d’effacement proposé à l’utilisateur.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeEffacement {
    /// CE : retire le dernier jeton.
    #[default]
    ClearEntree,
    /// AC : remise à zéro (juste après une évaluation réussie).
    ClearTout,
}

impl ModeEffacement {
    pub fn label(self) -> &'static str {
        match self {
            ModeEffacement::ClearEntree => "CE",
            ModeEffacement::ClearTout => "AC",
        }
    }

    /// Action déclenchée par ce bouton.
    pub fn action(self) -> Action {
        match self {
            ModeEffacement::ClearEntree => Action::ClearEntree,
            ModeEffacement::ClearTout => Action::ClearTout,
        }
    }
}

/// Fragment formaté de l’équation : "7", " × ", " -", " =", ou un résultat repris.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jeton {
    texte: String,
    /// Résultat repris : valeur exacte derrière le texte arrondi.
    exact: Option<BigRational>,
}

impl Jeton {
    fn nouveau(texte: String) -> Self {
        Jeton { texte, exact: None }
    }

    fn caractere(c: char) -> Self {
        Self::nouveau(c.to_string())
    }

    /// Espace avant toujours ; espace après sauf moins unaire.
    fn operateur(op: &str, unaire: bool) -> Self {
        if unaire {
            Self::nouveau(format!(" {op}"))
        } else {
            Self::nouveau(format!(" {op} "))
        }
    }

    fn egalite() -> Self {
        Self::nouveau(format!(" {SIGNE_EGAL}"))
    }

    fn resultat(texte: String, exact: Option<BigRational>) -> Self {
        Jeton { texte, exact }
    }

    pub fn texte(&self) -> &str {
        &self.texte
    }

    /// Texte donné à l’évaluateur : fraction exacte pour un résultat repris.
    fn texte_exact(&self) -> String {
        match &self.exact {
            Some(r) => format!("({}/{})", r.numer(), r.denom()),
            None => self.texte.clone(),
        }
    }

    pub fn est_egalite(&self) -> bool {
        self.texte.trim() == SIGNE_EGAL
    }

    pub fn est_operateur(&self) -> bool {
        Operateur::depuis_symbole(self.texte.trim()).is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquationState {
    jetons: Vec<Jeton>,
    resultat: String,
    /// Valeur exacte de `resultat` après une évaluation réussie.
    valeur: Option<BigRational>,
    mode: ModeEffacement,
}

impl Default for EquationState {
    fn default() -> Self {
        Self {
            jetons: Vec::new(),
            resultat: RESULTAT_INITIAL.to_string(),
            valeur: None,
            mode: ModeEffacement::default(),
        }
    }
}

impl EquationState {
    pub fn jetons(&self) -> &[Jeton] {
        &self.jetons
    }

    /// Équation affichée : jetons concaténés.
    pub fn equation(&self) -> String {
        self.jetons().iter().map(Jeton::texte).collect()
    }

    pub fn resultat(&self) -> &str {
        &self.resultat
    }

    pub fn mode(&self) -> ModeEffacement {
        self.mode
    }

    /// Équation évaluée : comme l’affichée, sauf les résultats repris (exacts).
    fn equation_exacte(&self) -> String {
        self.jetons.iter().map(Jeton::texte_exact).collect()
    }

    /// Raccourci : `apply(self, action)`.
    pub fn apply(self, action: Action) -> Self {
        apply(self, action)
    }

    fn dernier_est_egalite(&self) -> bool {
        self.jetons.last().is_some_and(Jeton::est_egalite)
    }

    fn dernier_est_operateur(&self) -> bool {
        self.jetons.last().is_some_and(Jeton::est_operateur)
    }
}

/// Transition unique de l’état.
pub fn apply(etat: EquationState, action: Action) -> EquationState {
    debug!(?action, equation = %etat.equation(), "action");

    match action {
        Action::Evaluer => evaluer(etat),
        Action::ClearEntree => retire_dernier(etat),
        Action::ClearTout => EquationState::default(),
        Action::Operateur(op) => ajoute_operateur(etat, op),
        Action::Caractere(c) => ajoute_caractere(etat, c),
    }
}

fn evaluer(mut etat: EquationState) -> EquationState {
    if etat.dernier_est_egalite() {
        return etat;
    }

    if etat.dernier_est_operateur() {
        etat.jetons.pop();
    }

    let evaluation = evaluate(&etat.equation_exacte());
    let reussite = match &evaluation {
        Ok(v @ Valeur::Nombre(r)) => v.affichage().map(|texte| (texte, r.clone())),
        _ => None,
    };

    match reussite {
        Some((resultat, valeur)) => {
            etat.jetons.push(Jeton::egalite());
            etat.resultat = resultat;
            etat.valeur = Some(valeur);
            etat.mode = ModeEffacement::ClearTout;
        }
        None => {
            if is_equation_valid(&evaluation) {
                warn!(equation = %etat.equation(), "résultat non numérique");
            } else if let Err(e) = &evaluation {
                warn!(equation = %etat.equation(), erreur = %e, "équation invalide");
            }
            etat.resultat = MESSAGE_EQUATION_INVALIDE.to_string();
            etat.valeur = None;
            etat.mode = ModeEffacement::ClearEntree;
        }
    }

    etat
}

fn retire_dernier(mut etat: EquationState) -> EquationState {
    etat.jetons.pop();
    etat
}

fn ajoute_operateur(mut etat: EquationState, op: Operateur) -> EquationState {
    if etat.dernier_est_egalite() {
        // on repart du résultat affiché (valeur exacte conservée)
        etat.jetons = vec![Jeton::resultat(etat.resultat.clone(), etat.valeur.clone())];
    }

    if op != Operateur::Moins {
        // remplace (et ne cumule pas) les opérateurs en fin d’équation,
        // y compris un moins unaire déjà posé
        while etat.dernier_est_operateur() {
            etat.jetons.pop();
        }
    }

    let unaire = op == Operateur::Moins && (etat.jetons.is_empty() || etat.dernier_est_operateur());
    etat.jetons.push(Jeton::operateur(op.symbole(), unaire));
    etat.mode = ModeEffacement::ClearEntree;
    etat
}

fn ajoute_caractere(mut etat: EquationState, c: char) -> EquationState {
    if etat.dernier_est_egalite() {
        let mut neuf = EquationState::default();
        neuf.jetons.push(Jeton::caractere(c));
        return neuf;
    }

    // un caractère collé au résultat repris : on évalue ce qui est affiché
    if let Some(dernier) = etat.jetons.last_mut() {
        dernier.exact = None;
    }

    etat.jetons.push(Jeton::caractere(c));
    etat.mode = ModeEffacement::ClearEntree;
    etat
}
