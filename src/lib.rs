// =============================================================================
// TAGMATCH — Dispatcher de motifs pour unions étiquetées
// =============================================================================
//
// Tagmatch route une valeur vers UN handler choisi par son discriminant,
// et garantit que l'ensemble des handlers couvre toutes les variantes
// de l'union (ou qu'un handler de repli `otherwise` est présent).
//
// Architecture :
//   core/   → unions décrites à l'exécution (littéraux + records),
//             algèbre des variantes, vérification, dispatch
//   typed/  → unions déclarées en Rust (`tagged_union!`) : l'exhaustivité
//             est vérifiée par le compilateur lui-même
//
// Concepts fondamentaux :
//   Discriminant = la clé scalaire (chaîne ou nombre) d'une variante
//   UnionType    = l'ensemble des variantes (le "type" de l'union)
//   Handlers     = la table clé → handler, avec un repli explicite
//   Matcher      = une table VÉRIFIÉE contre une union
//   TagSet / Extract / Exclude = l'algèbre des variantes
//
// =============================================================================

pub mod core;
pub mod typed;

pub use crate::core::discriminant::{Discriminant, Value};
pub use crate::core::dispatch::{match_deferred, match_on, match_on_deferred, match_value};
pub use crate::core::error::DispatchError;
pub use crate::core::handlers::{Handlers, Matcher, Routing};
pub use crate::core::union::{FieldType, RecordShape, UnionType, VariantShape};
