// =============================================================================
// HANDLERS — La table discriminant → handler, et sa vérification
// =============================================================================
//
// Une table de handlers associe à chaque discriminant une fonction qui
// reçoit la valeur rétrécie à cette variante. Elle peut aussi porter un
// handler de REPLI (`otherwise`) qui reçoit la valeur entière.
//
// Le repli est un emplacement explicite, pas une clé magique "_" :
// une union qui contient le littéral "_" reste routable normalement.
//
// INVARIANT (vérifié par `check` / `check_on`) :
//   clés(table) = TagSet(U)
//   OU clés(table) ⊆ TagSet(U) ET repli présent
//
// Cycle de vie :
//   Handlers  → table en construction, NON vérifiée
//   Matcher   → table vérifiée contre une union, seule forme que le
//               dispatcher accepte
//
// La vérification a lieu une fois, avant tout appel de handler.
//
// Un Matcher retient AUSSI comment il a été vérifié (Routing) : par
// valeur (`check`, pour `match`) ou sur un champ (`check_on`, pour
// `matchOn`). Le dispatcher refuse de l'utiliser autrement.
//
// =============================================================================

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::algebra::{literal_tag_set, tag_set, TagSet};
use super::discriminant::{Discriminant, Value};
use super::error::{DispatchError, DispatchResult};
use super::union::UnionType;

/// Un handler : reçoit la valeur (rétrécie) et renvoie un résultat quelconque.
pub type Handler<'a, R> = Box<dyn Fn(&Value) -> R + 'a>;

/// Comment une table a été vérifiée, donc comment elle doit être routée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routing {
    /// `check` : la valeur est sa propre clé
    ByValue,
    /// `check_on` : clé = `value[field]` pour un record
    OnField(String),
    /// `assume_verified` : aucune garantie, toutes les formes acceptées
    Unchecked,
}

impl Routing {
    /// `requested` : `None` pour `match`, `Some(field)` pour `matchOn`.
    pub fn allows(&self, requested: Option<&str>) -> bool {
        match (self, requested) {
            (Routing::Unchecked, _) => true,
            (Routing::ByValue, None) => true,
            (Routing::OnField(field), Some(requested)) => field == requested,
            _ => false,
        }
    }
}

impl fmt::Display for Routing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Routing::ByValue => write!(f, "par valeur"),
            Routing::OnField(field) => write!(f, "sur le champ '{}'", field),
            Routing::Unchecked => write!(f, "sans vérification"),
        }
    }
}

/// Table de handlers en construction.
pub struct Handlers<'a, R> {
    arms: HashMap<Discriminant, Handler<'a, R>>,
    otherwise: Option<Handler<'a, R>>,
}

impl<'a, R> Handlers<'a, R> {
    /// Crée une table vide
    pub fn new() -> Self {
        Handlers {
            arms: HashMap::new(),
            otherwise: None,
        }
    }

    /// Associe un handler à un discriminant.
    /// Une seconde association sur la même clé remplace la première.
    pub fn on<F>(mut self, key: impl Into<Discriminant>, handler: F) -> Self
    where
        F: Fn(&Value) -> R + 'a,
    {
        self.arms.insert(key.into(), Box::new(handler));
        self
    }

    /// Installe le handler de repli, appelé avec la valeur entière
    /// quand aucune clé explicite ne correspond.
    pub fn otherwise<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Value) -> R + 'a,
    {
        self.otherwise = Some(Box::new(handler));
        self
    }

    /// Les clés explicites de la table
    pub fn keys(&self) -> impl Iterator<Item = &Discriminant> {
        self.arms.keys()
    }

    pub fn has_otherwise(&self) -> bool {
        self.otherwise.is_some()
    }

    /// Vérifie que la table couvre `required` (directement ou via le repli).
    pub fn is_complete(&self, required: &TagSet) -> bool {
        self.otherwise.is_some() || required.iter().all(|tag| self.arms.contains_key(tag))
    }

    /// Vérifie la table contre un ensemble de tags requis.
    ///
    /// Conditions :
    /// - aucune clé hors de `required`
    /// - toute clé de `required` a un handler, sauf si un repli est présent
    fn verify(
        self,
        union: &UnionType,
        required: &TagSet,
        routing: Routing,
    ) -> DispatchResult<Matcher<'a, R>> {
        let mut unknown: Vec<&Discriminant> =
            self.keys().filter(|key| !required.contains(*key)).collect();
        unknown.sort();
        if let Some(key) = unknown.first() {
            warn!(union = %union.name, key = %key, "handler key outside of the union");
            return Err(DispatchError::UnknownHandlerKey {
                union: union.name.clone(),
                key: (*key).clone(),
            });
        }

        if !self.is_complete(required) {
            let missing: Vec<Discriminant> = required
                .iter()
                .filter(|tag| !self.arms.contains_key(*tag))
                .cloned()
                .collect();
            warn!(union = %union.name, missing = missing.len(), "incomplete handler mapping");
            return Err(DispatchError::IncompleteMapping {
                union: union.name.clone(),
                missing,
            });
        }

        debug!(
            union = %union.name,
            arms = self.arms.len(),
            otherwise = self.has_otherwise(),
            routing = %routing,
            "handler mapping verified"
        );
        Ok(Matcher {
            union: union.name.clone(),
            routing,
            arms: self.arms,
            otherwise: self.otherwise,
        })
    }

    /// Vérification pour `match` : l'union ne contient que des littéraux nus,
    /// chaque littéral est sa propre clé.
    pub fn check(self, union: &UnionType) -> DispatchResult<Matcher<'a, R>> {
        let required = literal_tag_set(union)?;
        self.verify(union, &required, Routing::ByValue)
    }

    /// Vérification pour `matchOn` : les records sont routés sur `field`,
    /// les littéraux sur eux-mêmes. Le Matcher n'est valable que pour `field`.
    pub fn check_on(self, union: &UnionType, field: &str) -> DispatchResult<Matcher<'a, R>> {
        let required = tag_set(union, field)?;
        self.verify(union, &required, Routing::OnField(field.to_string()))
    }

    /// Produit un Matcher SANS vérification.
    ///
    /// Une clé non couverte fera paniquer le dispatch : à réserver aux
    /// tables dont la complétude est garantie autrement.
    pub fn assume_verified(self, union_name: &str) -> Matcher<'a, R> {
        Matcher {
            union: union_name.to_string(),
            routing: Routing::Unchecked,
            arms: self.arms,
            otherwise: self.otherwise,
        }
    }
}

impl<R> Default for Handlers<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Handlers<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort();
        f.debug_struct("Handlers")
            .field("keys", &keys)
            .field("otherwise", &self.has_otherwise())
            .finish()
    }
}

/// Une table de handlers vérifiée contre une union.
pub struct Matcher<'a, R> {
    union: String,
    routing: Routing,
    arms: HashMap<Discriminant, Handler<'a, R>>,
    otherwise: Option<Handler<'a, R>>,
}

/// Résultat de la résolution d'une clé.
pub enum Resolved<'m, 'a, R> {
    /// Handler explicite pour la clé
    Arm(&'m Handler<'a, R>),
    /// Pas de handler explicite : le repli
    Otherwise(&'m Handler<'a, R>),
    /// Ni l'un ni l'autre : le contrat de vérification a été contourné
    Missing,
}

impl<'a, R> Matcher<'a, R> {
    /// Nom de l'union contre laquelle la table a été vérifiée
    pub fn union_name(&self) -> &str {
        &self.union
    }

    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    /// Cherche le handler d'une clé : explicite, puis repli.
    /// `None` en entrée (valeur sans discriminant) ne trouve que le repli.
    pub fn resolve(&self, key: Option<&Discriminant>) -> Resolved<'_, 'a, R> {
        if let Some(handler) = key.and_then(|k| self.arms.get(k)) {
            return Resolved::Arm(handler);
        }
        match &self.otherwise {
            Some(handler) => Resolved::Otherwise(handler),
            None => Resolved::Missing,
        }
    }
}

impl<R> fmt::Debug for Matcher<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.arms.keys().collect();
        keys.sort();
        f.debug_struct("Matcher")
            .field("union", &self.union)
            .field("routing", &self.routing)
            .field("keys", &keys)
            .field("otherwise", &self.otherwise.is_some())
            .finish()
    }
}
