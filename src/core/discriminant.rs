// =============================================================================
// DISCRIMINANT — Les clés scalaires et les valeurs à l'exécution
// =============================================================================
//
// Un DISCRIMINANT est la valeur qui identifie une variante d'union.
// Il n'existe que deux sortes de discriminants : les chaînes et les nombres.
//
// Deux styles de discriminant cohabitent :
//   - littéral nu : la valeur EST la clé            ("SalesPerson", 42)
//   - champ       : la valeur est un record, un champ porte la clé
//                   ({ kind: "Developer", name: "John" } sur le champ "kind")
//
// Une Value est la donnée concrète que l'on route : un littéral, ou un
// record dont les champs sont eux-mêmes des Values.
//
// ÉGALITÉ DES NOMBRES : les nombres sont des f64 comparés par valeur,
// avec -0.0 == 0.0 et NaN == NaN (sinon une clé NaN serait introuvable).
// Une chaîne "1" et le nombre 1 sont deux clés DISTINCTES.
//
// =============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// La clé d'une variante : une chaîne ou un nombre.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Discriminant {
    Str(String),
    Num(f64),
}

impl Discriminant {
    /// Représentation canonique d'un nombre, pour Eq / Hash / Ord.
    fn canonical_bits(n: f64) -> u64 {
        if n == 0.0 {
            0.0f64.to_bits()
        } else if n.is_nan() {
            f64::NAN.to_bits()
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for Discriminant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Discriminant::Str(a), Discriminant::Str(b)) => a == b,
            (Discriminant::Num(a), Discriminant::Num(b)) => {
                Self::canonical_bits(*a) == Self::canonical_bits(*b)
            }
            _ => false,
        }
    }
}

impl Eq for Discriminant {}

impl Hash for Discriminant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Discriminant::Str(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Discriminant::Num(n) => {
                1u8.hash(state);
                Self::canonical_bits(*n).hash(state);
            }
        }
    }
}

impl Ord for Discriminant {
    /// Les chaînes d'abord, puis les nombres dans l'ordre total des f64.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Discriminant::Str(a), Discriminant::Str(b)) => a.cmp(b),
            (Discriminant::Str(_), Discriminant::Num(_)) => Ordering::Less,
            (Discriminant::Num(_), Discriminant::Str(_)) => Ordering::Greater,
            (Discriminant::Num(a), Discriminant::Num(b)) => {
                let a = f64::from_bits(Self::canonical_bits(*a));
                let b = f64::from_bits(Self::canonical_bits(*b));
                a.total_cmp(&b)
            }
        }
    }
}

impl PartialOrd for Discriminant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Notation des types d'union : chaînes entre guillemets, échappées.
impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discriminant::Str(s) => write!(f, "{:?}", s),
            Discriminant::Num(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Discriminant {
    fn from(s: &str) -> Self {
        Discriminant::Str(s.to_string())
    }
}

impl From<String> for Discriminant {
    fn from(s: String) -> Self {
        Discriminant::Str(s)
    }
}

impl From<f64> for Discriminant {
    fn from(n: f64) -> Self {
        Discriminant::Num(n)
    }
}

impl From<i32> for Discriminant {
    fn from(n: i32) -> Self {
        Discriminant::Num(n as f64)
    }
}

impl From<i64> for Discriminant {
    fn from(n: i64) -> Self {
        Discriminant::Num(n as f64)
    }
}

/// Une valeur concrète routée par le dispatcher.
///
/// Se désérialise depuis du JSON brut : `"A"`, `3`, `{"kind": "Developer", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Construit un record à partir de paires (champ, valeur).
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Lit un champ d'un record. `None` pour un littéral.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(field),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    /// La valeur elle-même vue comme discriminant (littéral nu).
    pub fn as_discriminant(&self) -> Option<Discriminant> {
        match self {
            Value::Str(s) => Some(Discriminant::Str(s.clone())),
            Value::Num(n) => Some(Discriminant::Num(*n)),
            _ => None,
        }
    }

    /// Calcule la clé de routage pour `matchOn` :
    /// le littéral lui-même, ou la valeur du champ `field` d'un record.
    pub fn discriminant_on(&self, field: &str) -> Option<Discriminant> {
        match self {
            Value::Record(fields) => fields.get(field).and_then(Value::as_discriminant),
            other => other.as_discriminant(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", k, v)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Num(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Discriminant> for Value {
    fn from(d: Discriminant) -> Self {
        match d {
            Discriminant::Str(s) => Value::Str(s),
            Discriminant::Num(n) => Value::Num(n),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_string_and_number_are_distinct_keys() {
        assert_ne!(Discriminant::from("1"), Discriminant::from(1));
        assert_eq!(Discriminant::from(1), Discriminant::from(1.0));
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        let mut set = HashSet::new();
        set.insert(Discriminant::from(0.0));
        assert!(set.contains(&Discriminant::from(-0.0)));
    }

    #[test]
    fn test_ordering_strings_before_numbers() {
        let mut keys = vec![
            Discriminant::from(2),
            Discriminant::from("b"),
            Discriminant::from(-1),
            Discriminant::from("a"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                Discriminant::from("a"),
                Discriminant::from("b"),
                Discriminant::from(-1),
                Discriminant::from(2),
            ]
        );
    }

    #[test]
    fn test_discriminant_on_literal_and_record() {
        let lit = Value::from("SalesPerson");
        assert_eq!(lit.discriminant_on("kind"), Some("SalesPerson".into()));

        let rec = Value::record([("kind", Value::from("Developer")), ("name", "John".into())]);
        assert_eq!(rec.discriminant_on("kind"), Some("Developer".into()));
        assert_eq!(rec.discriminant_on("type"), None);
        assert_eq!(rec.as_discriminant(), None);
    }

    #[test]
    fn test_value_from_json() {
        let v: Value = serde_json::from_str(r#"{"tag": "C", "n": 5}"#).unwrap();
        assert_eq!(v.discriminant_on("tag"), Some("C".into()));
        assert_eq!(v.get("n"), Some(&Value::Num(5.0)));

        let lit: Value = serde_json::from_str("3").unwrap();
        assert_eq!(lit.as_discriminant(), Some(Discriminant::from(3)));

        let null: Value = serde_json::from_str("null").unwrap();
        assert_eq!(null, Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Discriminant::from("A").to_string(), "\"A\"");
        assert_eq!(Discriminant::from(5).to_string(), "5");
        let rec = Value::record([("tag", Value::from("C")), ("n", 5.into())]);
        assert_eq!(rec.to_string(), "{ n: 5, tag: \"C\" }");
    }

    #[test]
    fn test_display_escapes_quotes() {
        let tricky = Discriminant::from(r#"a" | "b"#);
        assert_eq!(tricky.to_string(), r#""a\" | \"b""#);
        assert_eq!(Value::from(r#"x"y"#).to_string(), r#""x\"y""#);
    }
}
