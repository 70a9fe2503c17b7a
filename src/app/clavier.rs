//! src/app/clavier.rs
//!
//! Clavier physique -> action logique.
//!
//! - Table statique (données, pas de chaîne de if) : testable sans UI.
//! - Backspace = « le bouton d’effacement affiché » : CE ou AC selon le mode.
//! - Lecture des événements egui : Text pour les caractères, Key pour Enter/Backspace/Delete.

use eframe::egui;

use crate::noyau::{Action, ModeEffacement, Operateur};

/// Nom de touche pour Backspace (traitée à part, dépend du mode).
const BACKSPACE: &str = "Backspace";

/// Table fixe : nom de touche -> action.
static TOUCHES: &[(&str, Action)] = &[
    ("0", Action::Caractere('0')),
    ("1", Action::Caractere('1')),
    ("2", Action::Caractere('2')),
    ("3", Action::Caractere('3')),
    ("4", Action::Caractere('4')),
    ("5", Action::Caractere('5')),
    ("6", Action::Caractere('6')),
    ("7", Action::Caractere('7')),
    ("8", Action::Caractere('8')),
    ("9", Action::Caractere('9')),
    (".", Action::Caractere('.')),
    (",", Action::Caractere('.')),
    ("(", Action::Caractere('(')),
    (")", Action::Caractere(')')),
    ("^", Action::Operateur(Operateur::Puissance)),
    ("x", Action::Operateur(Operateur::Fois)),
    ("X", Action::Operateur(Operateur::Fois)),
    ("*", Action::Operateur(Operateur::Fois)),
    ("/", Action::Operateur(Operateur::Divise)),
    ("+", Action::Operateur(Operateur::Plus)),
    ("-", Action::Operateur(Operateur::Moins)),
    ("Enter", Action::Evaluer),
    ("=", Action::Evaluer),
    ("Delete", Action::ClearTout),
];

/// Touche -> action (None si la touche n’a pas de sens pour la calculatrice).
pub fn map_key(touche: &str, mode: ModeEffacement) -> Option<Action> {
    if touche == BACKSPACE {
        return Some(mode.action());
    }

    TOUCHES
        .iter()
        .find(|(nom, _)| *nom == touche)
        .map(|(_, action)| *action)
}

/// Noms de touches pressées pendant cette frame, dans l’ordre.
pub fn touches_pressees(ctx: &egui::Context) -> Vec<String> {
    ctx.input(|i| {
        let mut out = Vec::new();
        for ev in &i.events {
            match ev {
                egui::Event::Text(t) => out.extend(t.chars().map(String::from)),
                egui::Event::Key {
                    key, pressed: true, ..
                } => {
                    let nom = match key {
                        egui::Key::Enter => "Enter",
                        egui::Key::Backspace => BACKSPACE,
                        egui::Key::Delete => "Delete",
                        _ => continue,
                    };
                    out.push(nom.to_string());
                }
                _ => {}
            }
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CE: ModeEffacement = ModeEffacement::ClearEntree;

    #[test]
    fn chiffres_directs() {
        for c in '0'..='9' {
            assert_eq!(map_key(&c.to_string(), CE), Some(Action::Caractere(c)));
        }
    }

    #[test]
    fn point_et_virgule() {
        assert_eq!(map_key(".", CE), Some(Action::Caractere('.')));
        assert_eq!(map_key(",", CE), Some(Action::Caractere('.')));
    }

    #[test]
    fn multiplication_trois_touches() {
        for t in ["x", "X", "*"] {
            assert_eq!(map_key(t, CE), Some(Action::Operateur(Operateur::Fois)));
        }
    }

    #[test]
    fn evaluation_et_effacements() {
        assert_eq!(map_key("Enter", CE), Some(Action::Evaluer));
        assert_eq!(map_key("=", CE), Some(Action::Evaluer));
        assert_eq!(map_key("Delete", CE), Some(Action::ClearTout));
    }

    #[test]
    fn backspace_suit_le_mode() {
        assert_eq!(
            map_key("Backspace", ModeEffacement::ClearEntree),
            Some(Action::ClearEntree)
        );
        assert_eq!(
            map_key("Backspace", ModeEffacement::ClearTout),
            Some(Action::ClearTout)
        );
    }

    #[test]
    fn touches_inconnues() {
        for t in ["a", "Escape", "%", " ", "", "÷"] {
            assert_eq!(map_key(t, CE), None, "touche {t:?}");
        }
    }
}
