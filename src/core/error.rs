// =============================================================================
// ERROR — Les erreurs de vérification du dispatcher
// =============================================================================
//
// Toutes ces erreurs sont levées AVANT qu'un handler ne s'exécute :
// elles remplacent, pour les unions décrites à l'exécution, le refus du
// compilateur. Une clé inconnue au moment du dispatch n'est PAS ici :
// c'est une violation d'invariant, traitée par un panic.
//
// =============================================================================

use thiserror::Error;

use super::discriminant::Discriminant;

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Des variantes n'ont pas de handler et aucun repli n'est fourni.
    #[error("table de handlers incomplète pour '{union}' : il manque {} et aucun repli `otherwise`", format_keys(.missing))]
    IncompleteMapping {
        union: String,
        missing: Vec<Discriminant>,
    },

    /// La table nomme une clé qui n'est le discriminant d'aucune variante.
    #[error("la clé de handler {key} n'est pas une variante de '{union}'")]
    UnknownHandlerKey { union: String, key: Discriminant },

    /// `matchOn` sur un champ qui n'est pas un discriminant littéral du record.
    #[error("le champ '{field}' n'est pas un discriminant littéral de la variante {variant} dans '{union}'")]
    WrongDiscriminantField {
        union: String,
        field: String,
        variant: String,
    },

    /// `match` (clé = valeur) sur une union qui contient des records.
    #[error("'{union}' contient la variante structurée {variant} : utiliser match_on avec un champ discriminant")]
    StructuredVariant { union: String, variant: String },

    /// Extract / Exclude avec un tag hors de l'union.
    #[error("le tag {tag} n'est pas une variante de '{union}'")]
    UnknownTag { union: String, tag: Discriminant },
}

fn format_keys(keys: &[Discriminant]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_mapping_message() {
        let err = DispatchError::IncompleteMapping {
            union: "Person".into(),
            missing: vec!["Designer".into(), 3.into()],
        };
        assert_eq!(
            err.to_string(),
            "table de handlers incomplète pour 'Person' : il manque \"Designer\", 3 et aucun repli `otherwise`"
        );
    }
}
