// =============================================================================
// REGISTRY — Le registre des unions (configuration)
// =============================================================================
//
// Quand les unions ne sont pas déclarées en Rust mais décrites dans un
// fichier (JSON), le registre joue le rôle du système de types :
// il garde, par nom, les UnionType validées, et c'est contre elles que
// les tables de handlers sont vérifiées.
//
// Format attendu :
//
// ```json
// { "unions": [
//     { "name": "Status", "variants": ["idle", "busy", 3] },
//     { "name": "Shape",  "variants": [
//         { "record": "Circle", "fields": { "kind": { "literal": "circle" }, "r": "number" } }
//     ] }
// ] }
// ```
//
// =============================================================================

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::union::UnionType;
use super::validate::{validate_union, ValidationError};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("description d'unions illisible : {0}")]
    Parse(#[from] serde_json::Error),

    #[error("union '{name}' invalide : {}", format_errors(.errors))]
    Invalid {
        name: String,
        errors: Vec<ValidationError>,
    },

    #[error("union '{0}' déjà enregistrée")]
    Duplicate(String),

    #[error("union '{0}' inconnue")]
    UnknownUnion(String),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Forme sérialisée du registre
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    unions: Vec<UnionType>,
}

/// Registre nom → union validée.
#[derive(Debug, Clone, Default)]
pub struct UnionRegistry {
    unions: BTreeMap<String, UnionType>,
}

impl UnionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge un registre depuis une chaîne JSON
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Charge un registre depuis n'importe quelle source (fichier, stdin...)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_reader(reader)?;
        Self::from_file(file)
    }

    fn from_file(file: RegistryFile) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for union in file.unions {
            registry.register(union)?;
        }
        info!(unions = registry.len(), "union registry loaded");
        Ok(registry)
    }

    /// Valide puis enregistre une union
    pub fn register(&mut self, union: UnionType) -> Result<&UnionType, RegistryError> {
        if let Err(errors) = validate_union(&union) {
            return Err(RegistryError::Invalid {
                name: union.name,
                errors,
            });
        }
        if self.unions.contains_key(&union.name) {
            return Err(RegistryError::Duplicate(union.name));
        }
        debug!(union = %union.name, variants = union.len(), "union registered");
        let name = union.name.clone();
        Ok(&*self.unions.entry(name).or_insert(union))
    }

    pub fn get(&self, name: &str) -> Result<&UnionType, RegistryError> {
        self.unions
            .get(name)
            .ok_or_else(|| RegistryError::UnknownUnion(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.unions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.unions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unions.is_empty()
    }

    /// Sérialise le registre (même format que `from_json`)
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let file = RegistryFile {
            unions: self.unions.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}
