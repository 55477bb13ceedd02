// =============================================================================
// VALIDATE — Vérification des unions et des valeurs
// =============================================================================
//
// Ce module vérifie que les structures sont cohérentes :
//   - Une UnionType est bien formée (pas de littéral ni de record dupliqué)
//   - Un champ discriminant est utilisable sur TOUS les records de l'union
//   - Une Value habite bien l'union (c'est le rôle du vérificateur de types
//     quand l'union n'existe qu'à l'exécution)
//
// Le dispatcher ne garantit l'exhaustivité que pour des valeurs qui
// appartiennent à l'union : `validate_value` permet de filtrer les données
// externes AVANT de les router.
//
// =============================================================================

use std::collections::HashSet;

use thiserror::Error;

use super::discriminant::Value;
use super::union::{RecordShape, UnionType, VariantShape};

/// Erreur de validation
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Validation error: {message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(message: String) -> Self {
        ValidationError { message }
    }
}

/// Vérifie qu'une union est bien formée.
///
/// Conditions :
/// - l'union a un nom
/// - aucun littéral n'apparaît deux fois
/// - aucun nom de record n'apparaît deux fois
pub fn validate_union(union: &UnionType) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if union.name.trim().is_empty() {
        errors.push(ValidationError::new("L'union n'a pas de nom".into()));
    }

    let mut literals = HashSet::new();
    for literal in union.literals() {
        if !literals.insert(literal) {
            errors.push(ValidationError::new(format!(
                "{} : le littéral {} apparaît plusieurs fois",
                union.name, literal
            )));
        }
    }

    let mut records = HashSet::new();
    for record in union.records() {
        if !records.insert(record.name.as_str()) {
            errors.push(ValidationError::new(format!(
                "{} : le record '{}' apparaît plusieurs fois",
                union.name, record.name
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Vérifie que `field` est un discriminant littéral de chaque record.
///
/// Contrairement à `algebra::tag_set`, qui s'arrête au premier problème,
/// tous les records fautifs sont signalés.
pub fn validate_discriminant_field(
    union: &UnionType,
    field: &str,
) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = union
        .records()
        .filter(|record| record.discriminant(field).is_none())
        .map(|record| {
            let reason = if record.fields.contains_key(field) {
                "n'est pas un littéral"
            } else {
                "n'existe pas"
            };
            ValidationError::new(format!(
                "{} : le champ discriminant '{}' {} sur le record '{}'",
                union.name, field, reason, record.name
            ))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Compare un record concret à une forme de record.
fn record_mismatches(union: &UnionType, shape: &RecordShape, value: &Value) -> Vec<ValidationError> {
    shape
        .fields
        .iter()
        .filter_map(|(field, ty)| match value.get(field) {
            None => Some(ValidationError::new(format!(
                "{} : champ '{}' manquant pour le record '{}'",
                union.name, field, shape.name
            ))),
            Some(actual) if !ty.accepts(actual) => Some(ValidationError::new(format!(
                "{} : le champ '{}' du record '{}' attend {} mais vaut {}",
                union.name, field, shape.name, ty, actual
            ))),
            Some(_) => None,
        })
        .collect()
}

/// Vérifie qu'une valeur concrète appartient à l'union, routée sur `field`.
///
/// - un littéral doit être un des littéraux de l'union
/// - un record doit correspondre à (au moins) un record de même tag ;
///   les champs en trop sont tolérés (typage structurel)
pub fn validate_value(
    value: &Value,
    union: &UnionType,
    field: &str,
) -> Result<(), Vec<ValidationError>> {
    let key = match value.discriminant_on(field) {
        Some(key) => key,
        None => {
            return Err(vec![ValidationError::new(format!(
                "{} : la valeur {} n'a pas de discriminant sur '{}'",
                union.name, value, field
            ))])
        }
    };

    if !value.is_record() {
        return if union.literals().any(|literal| *literal == key) {
            Ok(())
        } else {
            Err(vec![ValidationError::new(format!(
                "{} : le littéral {} n'est pas une variante",
                union.name, key
            ))])
        };
    }

    let candidates: Vec<&RecordShape> = union
        .variants
        .iter()
        .filter_map(|variant| match variant {
            VariantShape::Record(record) if record.discriminant(field) == Some(&key) => Some(record),
            _ => None,
        })
        .collect();

    if candidates.is_empty() {
        return Err(vec![ValidationError::new(format!(
            "{} : aucun record de tag {} sur '{}'",
            union.name, key, field
        ))]);
    }

    let mut errors = Vec::new();
    for shape in candidates {
        let mismatches = record_mismatches(union, shape, value);
        if mismatches.is_empty() {
            return Ok(());
        }
        errors.extend(mismatches);
    }
    Err(errors)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::union::FieldType;

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

    #[test]
    fn test_validate_union_ok() {
        assert!(validate_union(&union_sample()).is_ok());
    }

    #[test]
    fn test_validate_union_duplicates() {
        let mut u = union_sample();
        u.add_literal("abc")
            .add_record(RecordShape::new("A").with_literal("type", "A2"));
        let errors = validate_union(&u).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_union_unnamed() {
        let u = UnionType::new("  ");
        assert!(validate_union(&u).is_err());
    }

    #[test]
    fn test_validate_discriminant_field() {
        let mut u = union_sample();
        assert!(validate_discriminant_field(&u, "type").is_ok());

        u.add_record(RecordShape::new("Loose").with_field("type", FieldType::String));
        let errors = validate_discriminant_field(&u, "type").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("n'est pas un littéral"));

        // aucun record n'a "kind"
        let errors = validate_discriminant_field(&union_sample(), "kind").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("n'existe pas"));
    }

    #[test]
    fn test_validate_value_ok() {
        let u = union_sample();
        let a = Value::record([("type", Value::from("A")), ("name", "Ada".into())]);
        assert!(validate_value(&a, &u, "type").is_ok());
        assert!(validate_value(&Value::from("abc"), &u, "type").is_ok());

        // champ en trop toléré
        let b = Value::record([("type", Value::from("B")), ("age", 3.into()), ("extra", true.into())]);
        assert!(validate_value(&b, &u, "type").is_ok());
    }

    #[test]
    fn test_validate_value_rejects() {
        let u = union_sample();
        // littéral hors union
        assert!(validate_value(&Value::from("nope"), &u, "type").is_err());
        // un littéral "A" n'est pas le record A
        assert!(validate_value(&Value::from("A"), &u, "type").is_err());
        // mauvais type de champ
        let bad = Value::record([("type", Value::from("B")), ("age", "old".into())]);
        let errors = validate_value(&bad, &u, "type").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("attend number"));
        // champ manquant
        let missing = Value::record([("type", Value::from("A"))]);
        assert!(validate_value(&missing, &u, "type").is_err());
        // pas de discriminant
        assert!(validate_value(&Value::Null, &u, "type").is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let e = ValidationError::new("oups".into());
        assert_eq!(e.to_string(), "Validation error: oups");
    }
}
