//! Tests de propriétés : séquences d’actions aléatoires sur l’état d’équation.
//!
//! - RNG déterministe (seed fixe)
//! - longueur de séquence bornée
//! - budget temps global
//! - invariants vérifiés après CHAQUE transition

use std::time::{Duration, Instant};

use super::equation::{
    apply, Action, EquationState, Jeton, ModeEffacement, Operateur, MESSAGE_EQUATION_INVALIDE,
};
use super::eval::evaluate;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’actions ------------------------ */

fn gen_action(rng: &mut Rng) -> Action {
    // pondération : beaucoup de chiffres, un peu de tout le reste
    match rng.pick(20) {
        0..=7 => Action::Caractere(char::from(b'0' + rng.pick(10) as u8)),
        8 => Action::Caractere('.'),
        9 => Action::Caractere('('),
        10 => Action::Caractere(')'),
        11..=15 => Action::Operateur(Operateur::TOUS[rng.pick(5) as usize]),
        16 | 17 => Action::Evaluer,
        18 => Action::ClearEntree,
        _ => Action::ClearTout,
    }
}

fn textes(etat: &EquationState) -> Vec<String> {
    etat.jetons().iter().map(|j| j.texte().to_string()).collect()
}

/* ------------------------ Invariants ------------------------ */

fn check_pas_deux_operateurs(etat: &EquationState) {
    for paire in etat.jetons().windows(2) {
        let [a, b] = paire else { continue };
        let non_moins = |j: &Jeton| j.est_operateur() && j.texte().trim() != "-";
        assert!(
            !(non_moins(a) && non_moins(b)),
            "deux opérateurs consécutifs: {:?}",
            textes(etat)
        );
    }
}

fn check_transition(avant: &EquationState, action: Action, apres: &EquationState) {
    check_pas_deux_operateurs(apres);

    match action {
        Action::ClearEntree => {
            let mut attendu = textes(avant);
            attendu.pop();
            assert_eq!(textes(apres), attendu);
            assert_eq!(apres.resultat(), avant.resultat());
            assert_eq!(apres.mode(), avant.mode());
        }
        Action::ClearTout => assert_eq!(apres, &EquationState::default()),
        Action::Caractere(c) => {
            if avant.jetons().last().is_some_and(Jeton::est_egalite) {
                assert_eq!(textes(apres), vec![c.to_string()]);
                assert_eq!(apres.resultat(), "0");
            } else {
                assert_eq!(apres.jetons().len(), avant.jetons().len() + 1);
            }
            assert_eq!(apres.mode(), ModeEffacement::ClearEntree);
        }
        Action::Operateur(_) => {
            assert_eq!(apres.mode(), ModeEffacement::ClearEntree);
            assert!(apres.jetons().last().is_some_and(Jeton::est_operateur));
        }
        Action::Evaluer => {
            let ferme = apres.jetons().last().is_some_and(Jeton::est_egalite);
            if ferme {
                assert_eq!(apres.mode(), ModeEffacement::ClearTout);
                // le résultat affiché est relisible comme équation
                let relu = evaluate(apres.resultat())
                    .ok()
                    .and_then(|v| v.affichage());
                assert_eq!(relu.as_deref(), Some(apres.resultat()));
                // idempotence
                assert_eq!(&apply(apres.clone(), Action::Evaluer), apres);
            } else {
                assert_eq!(apres.resultat(), MESSAGE_EQUATION_INVALIDE);
                assert_eq!(apres.mode(), ModeEffacement::ClearEntree);
            }
        }
    }
}

/* ------------------------ Campagne ------------------------ */

#[test]
fn prop_sequences_aleatoires() {
    let start = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xC0FFEE);
    let mut succes = 0usize;

    for _ in 0..400 {
        budget(start, max);

        let mut etat = EquationState::default();
        let longueur = 1 + rng.pick(40);

        for _ in 0..longueur {
            let action = gen_action(&mut rng);
            let apres = apply(etat.clone(), action);
            check_transition(&etat, action, &apres);
            if matches!(action, Action::Evaluer) && apres.mode() == ModeEffacement::ClearTout {
                succes += 1;
            }
            etat = apres;
        }
    }

    // la campagne doit réellement exercer le chemin de succès
    assert!(succes > 0, "aucune évaluation réussie générée");
}

#[test]
fn prop_operateurs_en_rafale() {
    // tous les couples d’opérateurs, après un chiffre
    for a in Operateur::TOUS {
        for b in Operateur::TOUS {
            let etat = [
                Action::Caractere('7'),
                Action::Operateur(a),
                Action::Operateur(b),
            ]
            .into_iter()
            .fold(EquationState::default(), apply);
            check_pas_deux_operateurs(&etat);

            let dernier = etat.jetons().last().map(|j| j.texte().trim().to_string());
            assert_eq!(dernier.as_deref(), Some(b.symbole()));
        }
    }
}

#[test]
fn prop_clear_entree_vide_tout() {
    let mut rng = Rng::new(42);
    let mut etat = EquationState::default();
    for _ in 0..25 {
        let c = char::from(b'0' + rng.pick(10) as u8);
        etat = apply(etat, Action::Caractere(c));
        etat = apply(etat, Action::Operateur(Operateur::Plus));
    }

    let n = etat.jetons().len();
    for k in 1..=n {
        etat = apply(etat, Action::ClearEntree);
        assert_eq!(etat.jetons().len(), n - k);
    }
    assert!(etat.jetons().is_empty());
    assert_eq!(etat.resultat(), "0");

    // sur une équation vide : reste vide
    etat = apply(etat, Action::ClearEntree);
    assert!(etat.jetons().is_empty());
}
