// =============================================================================
// UNION — La description d'une union de variantes
// =============================================================================
//
// Une UnionType décrit, à l'exécution, ce qu'un système de types structurel
// exprimerait statiquement :
//
//   type UnionSample =
//     | { type: "A", name: string }
//     | { type: "B", age: number }
//     | "abc"
//     | "xyz"
//
// Chaque membre est une VariantShape :
//   - Literal : un littéral nu ("abc", 42), la valeur EST le discriminant
//   - Record  : un record dont un champ littéral porte le discriminant
//
// Le champ discriminant n'est PAS fixé par l'union : c'est l'appelant de
// `matchOn` qui le nomme ("type", "kind"...). La même union peut donc être
// routée sur plusieurs champs différents.
//
// En JSON (voir `registry`) :
//
// ```json
// { "name": "UnionSample",
//   "variants": [
//     { "record": "A", "fields": { "type": { "literal": "A" }, "name": "string" } },
//     { "record": "B", "fields": { "type": { "literal": "B" }, "age": "number" } },
//     "abc",
//     "xyz"
//   ] }
// ```
//
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::discriminant::{Discriminant, Value};

/// Le type d'un champ de record.
///
/// `Literal` est le seul type utilisable comme discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Un littéral exact (`kind: "Developer"`)
    Literal(Discriminant),
    String,
    Number,
    Boolean,
    /// N'importe quelle valeur (y compris un record imbriqué)
    Any,
}

impl FieldType {
    /// Vérifie qu'une valeur concrète habite ce type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Literal(d) => value.as_discriminant().as_ref() == Some(d),
            FieldType::String => matches!(value, Value::Str(_)),
            FieldType::Number => matches!(value, Value::Num(_)),
            FieldType::Boolean => matches!(value, Value::Bool(_)),
            FieldType::Any => true,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Literal(d) => write!(f, "{}", d),
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Any => write!(f, "any"),
        }
    }
}

/// Un membre structuré de l'union.
///
/// Le `name` sert uniquement à l'affichage et aux messages d'erreur ;
/// le routage se fait sur la valeur d'un champ littéral.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordShape {
    #[serde(rename = "record")]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldType>,
}

impl RecordShape {
    pub fn new(name: &str) -> Self {
        RecordShape {
            name: name.to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// Ajoute un champ typé
    pub fn with_field(mut self, field: &str, ty: FieldType) -> Self {
        self.fields.insert(field.to_string(), ty);
        self
    }

    /// Ajoute un champ littéral (typiquement le discriminant)
    pub fn with_literal(self, field: &str, value: impl Into<Discriminant>) -> Self {
        self.with_field(field, FieldType::Literal(value.into()))
    }

    /// La valeur du champ discriminant, si ce champ existe ET est littéral.
    pub fn discriminant(&self, field: &str) -> Option<&Discriminant> {
        match self.fields.get(field) {
            Some(FieldType::Literal(d)) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (field, ty)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", field, ty)?;
        }
        write!(f, " }}")
    }
}

/// Un membre de l'union : littéral nu ou record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantShape {
    Literal(Discriminant),
    Record(RecordShape),
}

impl VariantShape {
    pub fn literal(value: impl Into<Discriminant>) -> Self {
        VariantShape::Literal(value.into())
    }

    /// Le discriminant de cette variante pour le champ `field`.
    ///
    /// Un littéral se désigne lui-même quel que soit le champ ;
    /// un record n'a de discriminant que si `field` est un de ses champs littéraux.
    pub fn discriminant(&self, field: &str) -> Option<&Discriminant> {
        match self {
            VariantShape::Literal(d) => Some(d),
            VariantShape::Record(record) => record.discriminant(field),
        }
    }

    /// Nom lisible de la variante (pour les erreurs)
    pub fn label(&self) -> String {
        match self {
            VariantShape::Literal(d) => d.to_string(),
            VariantShape::Record(record) => record.name.clone(),
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, VariantShape::Record(_))
    }
}

impl fmt::Display for VariantShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantShape::Literal(d) => write!(f, "{}", d),
            VariantShape::Record(record) => write!(f, "{}", record),
        }
    }
}

/// L'union complète : une liste ordonnée de variantes.
///
/// L'ordre n'a pas de sens sémantique, il est conservé pour l'affichage
/// et pour que Extract / Exclude restent stables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionType {
    pub name: String,
    #[serde(default)]
    pub variants: Vec<VariantShape>,
}

impl UnionType {
    /// Crée une union vide (le type `never`)
    pub fn new(name: &str) -> Self {
        UnionType {
            name: name.to_string(),
            variants: Vec::new(),
        }
    }

    pub fn from_variants(name: &str, variants: Vec<VariantShape>) -> Self {
        UnionType {
            name: name.to_string(),
            variants,
        }
    }

    /// Ajoute un littéral nu
    pub fn add_literal(&mut self, value: impl Into<Discriminant>) -> &mut Self {
        self.variants.push(VariantShape::literal(value));
        self
    }

    /// Ajoute un record
    pub fn add_record(&mut self, record: RecordShape) -> &mut Self {
        self.variants.push(VariantShape::Record(record));
        self
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Union vide = `never` : aucune valeur ne l'habite.
    pub fn is_never(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn contains(&self, variant: &VariantShape) -> bool {
        self.variants.contains(variant)
    }

    /// Les littéraux nus de l'union
    pub fn literals(&self) -> impl Iterator<Item = &Discriminant> {
        self.variants.iter().filter_map(|v| match v {
            VariantShape::Literal(d) => Some(d),
            VariantShape::Record(_) => None,
        })
    }

    /// Les records de l'union
    pub fn records(&self) -> impl Iterator<Item = &RecordShape> {
        self.variants.iter().filter_map(|v| match v {
            VariantShape::Record(r) => Some(r),
            VariantShape::Literal(_) => None,
        })
    }
}

impl fmt::Display for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {} = ", self.name)?;
        if self.variants.is_empty() {
            return write!(f, "never");
        }
        for (i, variant) in self.variants.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", variant)?;
        }
        Ok(())
    }
}
