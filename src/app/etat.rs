//! src/app/etat.rs
//!
//! État UI : possède l’unique `EquationState` de la fenêtre.
//!
//! Contrats :
//! - Toute mutation passe par `appliquer` (donc par `equation::apply`).
//! - Pas d’affichage ici.

use tracing::info;

use crate::noyau::{Action, EquationState, ModeEffacement};

#[derive(Clone, Debug, Default)]
pub struct AppCalc {
    etat: EquationState,
}

impl AppCalc {
    /// Bouton cliqué ou touche traduite.
    pub fn appliquer(&mut self, action: Action) {
        let avant = std::mem::take(&mut self.etat);
        self.etat = avant.apply(action);

        if action == Action::Evaluer {
            info!(
                equation = %self.etat.equation(),
                resultat = %self.etat.resultat(),
                "évaluation"
            );
        }
    }

    /// Touche physique (nom egui) : ignorée si hors table.
    pub fn touche(&mut self, nom: &str) {
        if let Some(action) = super::clavier::map_key(nom, self.etat.mode()) {
            self.appliquer(action);
        }
    }

    /// Ligne équation (jetons concaténés).
    pub fn equation(&self) -> String {
        self.etat.equation()
    }

    /// Ligne résultat / message d’erreur.
    pub fn resultat(&self) -> &str {
        self.etat.resultat()
    }

    pub fn mode(&self) -> ModeEffacement {
        self.etat.mode()
    }
}
