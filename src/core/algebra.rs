// =============================================================================
// ALGEBRA — TagSet, Extract, Exclude : l'algèbre des variantes
// =============================================================================
//
// Trois opérations pures sur une UnionType et un champ discriminant :
//
// ┌─────────────────────────────────────────────────────────────────────┐
// │                                                                     │
// │  TagSet(U, f)      — l'ensemble des discriminants de U              │
// │  les littéraux apportent leur propre valeur,                        │
// │  les records apportent la valeur de leur champ `f`                  │
// │                                                                     │
// │  Extract(U, f, S)  — les variantes de U dont le tag est dans S      │
// │                                                                     │
// │  Exclude(U, f, S)  — les variantes de U dont le tag N'EST PAS dans S│
// │                                                                     │
// └─────────────────────────────────────────────────────────────────────┘
//
// LOIS :
//   Extract(U, f, S) ∪ Exclude(U, f, S) = U   (chaque variante d'un seul côté)
//   Extract(U, f, TagSet(U, f))         = U
//   Exclude(U, f, TagSet(U, f))         = never
//
// TagSet alimente la vérification des handlers (les clés requises) ;
// Extract donne la variante rétrécie que reçoit chaque handler.
//
// =============================================================================

use std::collections::BTreeSet;

use super::discriminant::Discriminant;
use super::error::{DispatchError, DispatchResult};
use super::union::{UnionType, VariantShape};

/// Un ensemble de discriminants (l'ordre n'a pas de sens, pas de doublons).
pub type TagSet = BTreeSet<Discriminant>;

/// Construit un TagSet à partir de n'importe quelle liste de clés.
pub fn tags<D, I>(keys: I) -> TagSet
where
    D: Into<Discriminant>,
    I: IntoIterator<Item = D>,
{
    keys.into_iter().map(Into::into).collect()
}

/// Le tag d'une variante pour le champ `field`, ou l'erreur de champ.
fn variant_tag<'u>(
    union: &UnionType,
    variant: &'u VariantShape,
    field: &str,
) -> DispatchResult<&'u Discriminant> {
    variant
        .discriminant(field)
        .ok_or_else(|| DispatchError::WrongDiscriminantField {
            union: union.name.clone(),
            field: field.to_string(),
            variant: variant.label(),
        })
}

/// TagSet(U, f) : tous les discriminants de l'union sur le champ `field`.
///
/// Échoue si un record n'a pas `field` comme champ littéral.
pub fn tag_set(union: &UnionType, field: &str) -> DispatchResult<TagSet> {
    union
        .variants
        .iter()
        .map(|variant| variant_tag(union, variant, field).cloned())
        .collect()
}

/// TagSet d'une union de littéraux nus (forme `match`, sans champ).
///
/// Échoue dès qu'un record est présent : sa "valeur" ne peut pas servir de clé.
pub fn literal_tag_set(union: &UnionType) -> DispatchResult<TagSet> {
    union
        .variants
        .iter()
        .map(|variant| match variant {
            VariantShape::Literal(d) => Ok(d.clone()),
            VariantShape::Record(record) => Err(DispatchError::StructuredVariant {
                union: union.name.clone(),
                variant: record.name.clone(),
            }),
        })
        .collect()
}

/// Sépare U en (Extract(U, f, S), Exclude(U, f, S)) en une seule passe.
///
/// Chaque tag de `selected` doit appartenir à TagSet(U, f).
pub fn partition(
    union: &UnionType,
    field: &str,
    selected: &TagSet,
) -> DispatchResult<(UnionType, UnionType)> {
    let all = tag_set(union, field)?;
    if let Some(tag) = selected.iter().find(|tag| !all.contains(*tag)) {
        return Err(DispatchError::UnknownTag {
            union: union.name.clone(),
            tag: tag.clone(),
        });
    }

    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for variant in &union.variants {
        if selected.contains(variant_tag(union, variant, field)?) {
            kept.push(variant.clone());
        } else {
            dropped.push(variant.clone());
        }
    }

    let label = selected
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" | ");
    Ok((
        UnionType::from_variants(
            &format!("Extract<{}, {}, {}>", union.name, field, label),
            kept,
        ),
        UnionType::from_variants(
            &format!("Exclude<{}, {}, {}>", union.name, field, label),
            dropped,
        ),
    ))
}

/// Extract(U, f, S) : la sous-union des variantes dont le tag est dans S.
pub fn extract(union: &UnionType, field: &str, selected: &TagSet) -> DispatchResult<UnionType> {
    partition(union, field, selected).map(|(kept, _)| kept)
}

/// Exclude(U, f, S) : le complément de Extract.
pub fn exclude(union: &UnionType, field: &str, selected: &TagSet) -> DispatchResult<UnionType> {
    partition(union, field, selected).map(|(_, dropped)| dropped)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::union::{FieldType, RecordShape};

    fn union_sample() -> UnionType {
        let mut u = UnionType::new("UnionSample");
        u.add_record(
            RecordShape::new("A")
                .with_literal("type", "A")
                .with_field("name", FieldType::String),
        )
        .add_record(
            RecordShape::new("B")
                .with_literal("type", "B")
                .with_field("age", FieldType::Number),
        )
        .add_literal("abc")
        .add_literal("xyz");
        u
    }

    /// Une union où deux records partagent le même tag, plus un nombre
    fn shared_tag_union() -> UnionType {
        let mut u = UnionType::new("Shared");
        u.add_record(RecordShape::new("Circle").with_literal("shape", "round"))
            .add_record(RecordShape::new("Ellipse").with_literal("shape", "round"))
            .add_record(RecordShape::new("Square").with_literal("shape", "square"))
            .add_literal(0);
        u
    }

    #[test]
    fn test_tag_set() {
        let u = union_sample();
        assert_eq!(tag_set(&u, "type").unwrap(), tags(["A", "B", "abc", "xyz"]));
    }

    #[test]
    fn test_tag_set_collapses_duplicates() {
        let u = shared_tag_union();
        let set = tag_set(&u, "shape").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&"round".into()));
        assert!(set.contains(&Discriminant::from(0)));
    }

    #[test]
    fn test_tag_set_wrong_field() {
        let u = union_sample();
        let err = tag_set(&u, "wrongTagName").unwrap_err();
        assert_eq!(
            err,
            DispatchError::WrongDiscriminantField {
                union: "UnionSample".into(),
                field: "wrongTagName".into(),
                variant: "A".into(),
            }
        );
    }

    #[test]
    fn test_literal_tag_set() {
        let mut u = UnionType::new("Letters");
        u.add_literal("abc").add_literal("xyz");
        assert_eq!(literal_tag_set(&u).unwrap(), tags(["abc", "xyz"]));

        let err = literal_tag_set(&union_sample()).unwrap_err();
        assert!(matches!(err, DispatchError::StructuredVariant { .. }));
    }

    #[test]
    fn test_extract() {
        let u = union_sample();
        let kept = extract(&u, "type", &tags(["A", "abc"])).unwrap();
        assert_eq!(kept.variants, vec![u.variants[0].clone(), u.variants[2].clone()]);
    }

    #[test]
    fn test_exclude() {
        let u = union_sample();
        let dropped = exclude(&u, "type", &tags(["A", "abc"])).unwrap();
        assert_eq!(dropped.variants, vec![u.variants[1].clone(), u.variants[3].clone()]);
    }

    #[test]
    fn test_extract_and_exclude_partition_the_union() {
        for u in [union_sample(), shared_tag_union()] {
            let field = if u.name == "Shared" { "shape" } else { "type" };
            let all: Vec<Discriminant> = tag_set(&u, field).unwrap().into_iter().collect();
            // tous les sous-ensembles de TagSet
            for mask in 0u32..(1 << all.len()) {
                let selected: TagSet = all
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, t)| t.clone())
                    .collect();
                let (kept, dropped) = partition(&u, field, &selected).unwrap();
                assert_eq!(kept.len() + dropped.len(), u.len());
                for variant in &u.variants {
                    assert!(kept.contains(variant) != dropped.contains(variant));
                }
            }
        }
    }

    #[test]
    fn test_extract_all_is_identity_exclude_all_is_never() {
        let u = union_sample();
        let all = tag_set(&u, "type").unwrap();
        assert_eq!(extract(&u, "type", &all).unwrap().variants, u.variants);
        assert!(exclude(&u, "type", &all).unwrap().is_never());
        // et l'inverse avec l'ensemble vide
        assert!(extract(&u, "type", &TagSet::new()).unwrap().is_never());
        assert_eq!(exclude(&u, "type", &TagSet::new()).unwrap().variants, u.variants);
    }

    #[test]
    fn test_extract_keeps_every_record_sharing_a_tag() {
        let u = shared_tag_union();
        let kept = extract(&u, "shape", &tags(["round"])).unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_extract_unknown_tag() {
        let u = union_sample();
        let err = extract(&u, "type", &tags(["C"])).unwrap_err();
        assert_eq!(
            err,
            DispatchError::UnknownTag {
                union: "UnionSample".into(),
                tag: "C".into(),
            }
        );
    }

    #[test]
    fn test_derived_union_names() {
        let u = union_sample();
        let (kept, dropped) = partition(&u, "type", &tags(["A", "abc"])).unwrap();
        assert_eq!(kept.name, "Extract<UnionSample, type, \"A\" | \"abc\">");
        assert_eq!(dropped.name, "Exclude<UnionSample, type, \"A\" | \"abc\">");
    }
}
