// =============================================================================
// DISPATCH — match / matchOn : router une valeur vers UN handler
// =============================================================================
//
// Deux formes d'appel, chacune directe ou différée :
//
//   match_value(v, m)           → la valeur v EST sa clé (littéral nu)
//   match_deferred(m)           → |v| match_value(v, m)
//   match_on(f, v, m)           → clé = v[f] pour un record, v pour un littéral
//   match_on_deferred(f, m)     → |v| match_on(f, v, m)
//
// Algorithme (identique pour les quatre) :
//   1. Calculer la clé de v
//   2. Chercher le handler explicite, sinon le repli
//   3. Appeler le handler avec v et renvoyer son résultat TEL QUEL
//
// Le dispatcher n'enveloppe rien : si le handler renvoie un Result ou un
// Future, l'appelant reçoit ce Result ou ce Future, sans attente ni
// transformation.
//
// CLÉ INTROUVABLE : un Matcher a été vérifié contre l'union, donc une clé
// sans handler ni repli signifie qu'une valeur HORS de l'union est arrivée
// jusqu'ici (ou qu'on a utilisé `assume_verified`). C'est une violation
// d'invariant : panic, pas d'erreur récupérable.
//
// MAUVAIS ROUTAGE : un Matcher vérifié sur "kind" n'a rien prouvé pour
// "type", ni pour `match` par valeur. L'utiliser ainsi contourne la
// vérification : même traitement, panic avant tout appel de handler.
//
// =============================================================================

use tracing::{error, trace};

use super::discriminant::{Discriminant, Value};
use super::handlers::{Matcher, Resolved};

/// Refuse un Matcher vérifié pour une autre forme de routage.
/// `requested` : `None` pour `match`, `Some(field)` pour `matchOn`.
fn ensure_routing<R>(handlers: &Matcher<'_, R>, requested: Option<&str>) {
    if handlers.routing().allows(requested) {
        return;
    }
    let used = match requested {
        Some(field) => format!("sur le champ '{}'", field),
        None => "par valeur".to_string(),
    };
    error!(
        union = handlers.union_name(),
        verified = %handlers.routing(),
        used = %used,
        "matcher used with a routing it was not verified for"
    );
    panic!(
        "la table de '{}' a été vérifiée {} mais est routée {}",
        handlers.union_name(),
        handlers.routing(),
        used
    );
}

/// Résout la clé et appelle le handler choisi.
fn invoke<R>(handlers: &Matcher<'_, R>, key: Option<&Discriminant>, value: &Value) -> R {
    match handlers.resolve(key) {
        Resolved::Arm(handler) => {
            trace!(union = handlers.union_name(), key = ?key, "dispatch");
            handler(value)
        }
        Resolved::Otherwise(handler) => {
            trace!(union = handlers.union_name(), key = ?key, "dispatch to otherwise");
            handler(value)
        }
        Resolved::Missing => {
            error!(union = handlers.union_name(), value = %value, "no handler for value");
            match key {
                Some(key) => panic!(
                    "aucun handler pour le discriminant {} dans '{}'",
                    key,
                    handlers.union_name()
                ),
                None => panic!(
                    "la valeur {} n'a pas de discriminant dans '{}'",
                    value,
                    handlers.union_name()
                ),
            }
        }
    }
}

/// `match(value, handlers)` : la valeur est elle-même la clé.
pub fn match_value<R>(value: &Value, handlers: &Matcher<'_, R>) -> R {
    ensure_routing(handlers, None);
    let key = value.as_discriminant();
    invoke(handlers, key.as_ref(), value)
}

/// `match(handlers)` : forme différée, composable (`.map(...)`, pipe).
pub fn match_deferred<'a, R: 'a>(handlers: Matcher<'a, R>) -> impl Fn(&Value) -> R + 'a {
    ensure_routing(&handlers, None);
    move |value: &Value| match_value(value, &handlers)
}

/// `matchOn(field, value, handlers)` : clé = `value[field]` pour un record,
/// la valeur elle-même pour un littéral nu.
///
/// `handlers` doit avoir été vérifié par `check_on` sur ce même `field`.
pub fn match_on<R>(field: &str, value: &Value, handlers: &Matcher<'_, R>) -> R {
    ensure_routing(handlers, Some(field));
    let key = value.discriminant_on(field);
    invoke(handlers, key.as_ref(), value)
}

/// `matchOn(field, handlers)` : forme différée de `match_on`.
/// Le routage est contrôlé dès la construction, pas au premier appel.
pub fn match_on_deferred<'a, R: 'a>(
    field: &str,
    handlers: Matcher<'a, R>,
) -> impl Fn(&Value) -> R + 'a {
    ensure_routing(&handlers, Some(field));
    let field = field.to_string();
    move |value: &Value| {
        let key = value.discriminant_on(&field);
        invoke(&handlers, key.as_ref(), value)
    }
}
