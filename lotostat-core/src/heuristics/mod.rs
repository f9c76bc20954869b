//! Outils heuristiques d'exploration des tirages.
//!
//! Aucun de ces modules n'a de pouvoir prédictif : un tirage de loterie est
//! uniforme et sans mémoire. Ils décrivent seulement l'historique.

pub mod clustering;
pub mod markov;
pub mod svm;
