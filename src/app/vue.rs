// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// - Panneau d’affichage : équation (monospace) au-dessus du résultat
// - Panneau de boutons : grille 4 colonnes, bouton CE/AC selon le mode
// - Largeur “téléphone” : les boutons s’étirent pour remplir la hauteur

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::{Action, Operateur};

/// En dessous (points egui), on passe en disposition téléphone.
const LARGEUR_TELEPHONE: f32 = 480.0;

/// Hauteur de bouton en disposition normale.
const HAUTEUR_BOUTON: f32 = 52.0;

const ESPACE: f32 = 6.0;

#[derive(Clone, Copy, Debug)]
enum Touche {
    /// CE ou AC, selon le mode courant.
    Effacement,
    Bouton(&'static str, Action),
}

const fn car(label: &'static str, c: char) -> Touche {
    Touche::Bouton(label, Action::Caractere(c))
}

const fn op(label: &'static str, o: Operateur) -> Touche {
    Touche::Bouton(label, Action::Operateur(o))
}

const PAVE: [[Touche; 4]; 5] = [
    [
        Touche::Effacement,
        car("(", '('),
        car(")", ')'),
        op("^", Operateur::Puissance),
    ],
    [car("7", '7'), car("8", '8'), car("9", '9'), op("÷", Operateur::Divise)],
    [car("4", '4'), car("5", '5'), car("6", '6'), op("×", Operateur::Fois)],
    [car("1", '1'), car("2", '2'), car("3", '3'), op("−", Operateur::Moins)],
    [
        car("0", '0'),
        car(".", '.'),
        Touche::Bouton("=", Action::Evaluer),
        op("+", Operateur::Plus),
    ],
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(ESPACE, ESPACE);

        self.ui_affichage(ui);

        ui.add_space(ESPACE * 2.0);

        self.ui_boutons(ui);
    }

    fn ui_affichage(&self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    // Ligne équation : toujours une ligne de haut, même vide
                    let equation = self.equation();
                    let texte = if equation.is_empty() { " " } else { equation.as_str() };
                    ui.label(egui::RichText::new(texte).monospace().size(18.0));

                    ui.label(egui::RichText::new(self.resultat()).strong().size(34.0));
                });
            });
    }

    fn ui_boutons(&mut self, ui: &mut egui::Ui) {
        let largeur_dispo = ui.available_width();
        let largeur = ((largeur_dispo - ESPACE * 3.0) / 4.0).max(40.0);
        let hauteur = if largeur_dispo <= LARGEUR_TELEPHONE {
            ((ui.available_height() - ESPACE * 4.0) / 5.0).max(HAUTEUR_BOUTON)
        } else {
            HAUTEUR_BOUTON
        };

        let mut clic: Option<Action> = None;

        egui::Grid::new("pave_calculatrice")
            .num_columns(4)
            .spacing([ESPACE, ESPACE])
            .show(ui, |ui| {
                for rangee in PAVE.iter() {
                    for touche in rangee.iter() {
                        let (label, action) = match *touche {
                            Touche::Effacement => (self.mode().label(), self.mode().action()),
                            Touche::Bouton(label, action) => (label, action),
                        };
                        let bouton = egui::Button::new(egui::RichText::new(label).size(22.0));
                        if ui.add_sized([largeur, hauteur], bouton).clicked() {
                            clic = Some(action);
                        }
                    }
                    ui.end_row();
                }
            });

        if let Some(action) = clic {
            self.appliquer(action);
        }
    }
}
