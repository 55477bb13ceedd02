// =============================================================================
// CORE — Unions décrites à l'exécution : algèbre, vérification, dispatch
// =============================================================================
//
// Ce module regroupe toute la logique du dispatcher quand l'union n'est
// connue qu'à l'exécution (décrite en Rust ou chargée depuis du JSON).
// L'exhaustivité y est vérifiée par une passe explicite, AVANT tout appel
// de handler, au lieu d'être garantie par le compilateur.
//
// Architecture :
//   discriminant → les clés (chaîne | nombre) et les valeurs routées
//   union        → la description d'une union (littéraux + records)
//   algebra      → TagSet, Extract, Exclude
//   handlers     → la table clé → handler, sa vérification (Matcher)
//   dispatch     → match / matchOn, directs et différés
//   validate     → unions bien formées, valeurs conformes
//   registry     → le registre des unions (chargement JSON)
//   error        → les erreurs de vérification
//
// =============================================================================

pub mod discriminant;
pub mod union;
pub mod algebra;
pub mod handlers;
pub mod dispatch;
pub mod validate;
pub mod registry;
pub mod error;
