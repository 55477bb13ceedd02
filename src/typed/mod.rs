// =============================================================================
// TYPED — Unions déclarées en Rust : l'exhaustivité par le compilateur
// =============================================================================
//
// Quand l'union est connue à la compilation, on n'a pas besoin de la passe
// de vérification du module `core` : une enum Rust + un `match` sans bras
// `_` suffisent, et `rustc` refuse toute table de handlers incomplète.
//
// Ce module fournit :
//   - les traits générés par `tagged_union!` (Tag, TaggedUnion, Cases)
//   - `match_with` / `matcher` : le dispatch direct et différé
//   - `Variant` / `partition` : Extract / Exclude au niveau des types,
//     une sous-union étant une enum qui se plonge dans l'union complète
//
// PONT avec `core` : `TaggedUnion::describe(field)` produit la UnionType
// équivalente, pour que l'algèbre décrite et l'enum déclarée concordent.
// Seuls les TAGS sont décrits : les champs des payloads ne le sont pas.
//
// =============================================================================

pub mod macros;

use std::fmt::Debug;
use std::hash::Hash;

use crate::core::algebra::TagSet;
use crate::core::discriminant::Discriminant;
use crate::core::union::UnionType;

/// L'enum des discriminants d'une union (sans payload).
pub trait Tag: Copy + Eq + Ord + Hash + Debug + 'static {
    /// TagSet de l'union : tous les discriminants, dans l'ordre de déclaration
    const ALL: &'static [Self];

    /// Le nom du discriminant, tel qu'écrit dans la déclaration
    fn name(&self) -> &'static str;

    fn discriminant(&self) -> Discriminant {
        Discriminant::from(self.name())
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.name() == name)
    }
}

/// Une union étiquetée déclarée en Rust.
pub trait TaggedUnion: Sized {
    type Tag: Tag;

    /// Le discriminant de cette valeur
    fn tag(&self) -> Self::Tag;

    /// La description équivalente, les records étant routés sur `field`.
    ///
    /// Chaque record n'y porte que son champ discriminant : la description
    /// suffit pour TagSet / Extract / Exclude et pour vérifier des handlers,
    /// mais `validate_value` n'y contrôle que le tag, pas le payload.
    fn describe(field: &str) -> UnionType;
}

/// Une table de handlers qui couvre toute l'union `U`.
///
/// Implémenté par les structs générées `…Cases` (un handler par variante)
/// et `…Partial` (handlers optionnels + repli).
pub trait Cases<U> {
    type Output;

    fn apply(&self, value: U) -> Self::Output;
}

/// `match(value, handlers)` : forme directe.
pub fn match_with<U, C: Cases<U>>(value: U, cases: &C) -> C::Output {
    cases.apply(value)
}

/// `match(handlers)` : forme différée, réutilisable (`.map(matcher(...))`).
pub fn matcher<U, C: Cases<U>>(cases: C) -> impl Fn(U) -> C::Output {
    move |value| cases.apply(value)
}

/// Le TagSet d'une union déclarée
pub fn tag_set<U: TaggedUnion>() -> TagSet {
    U::Tag::ALL.iter().map(Tag::discriminant).collect()
}

/// `impl Variant<U> for V` plonge la sous-union `V` dans l'union `U`.
///
/// `extract` est Extract<U, tags(V)> ; en cas d'échec la valeur est
/// rendue intacte, c'est alors un membre de Exclude<U, tags(V)>.
/// On exige `V::extract(v.insert()) == Ok(v)`.
pub trait Variant<U>: Sized {
    fn insert(self) -> U;

    fn extract(value: U) -> Result<Self, U>;
}

/// Sépare une suite de valeurs en (extraites dans `V`, exclues restées `U`).
pub fn partition<U, V, I>(values: I) -> (Vec<V>, Vec<U>)
where
    V: Variant<U>,
    I: IntoIterator<Item = U>,
{
    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for value in values {
        match V::extract(value) {
            Ok(v) => kept.push(v),
            Err(u) => dropped.push(u),
        }
    }
    (kept, dropped)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{algebra, validate};
    use crate::tagged_union;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Developer {
        pub name: String,
        pub programming_language: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Designer {
        pub name: String,
        pub favorite_tool: String,
    }

    tagged_union! {
        #[derive(Debug, Clone, PartialEq)]
        pub enum Person {
            tag: PersonTag,
            cases: PersonCases,
            partial: PersonPartial,
            records { Developer(Developer), Designer(Designer) }
            literals { SalesPerson, Artist }
        }
    }

    /// Une sous-union : seulement les records
    #[derive(Debug, Clone, PartialEq)]
    enum Staff {
        Developer(Developer),
        Designer(Designer),
    }

    impl Variant<Person> for Staff {
        fn insert(self) -> Person {
            match self {
                Staff::Developer(d) => Person::Developer(d),
                Staff::Designer(d) => Person::Designer(d),
            }
        }

        fn extract(value: Person) -> Result<Self, Person> {
            match value {
                Person::Developer(d) => Ok(Staff::Developer(d)),
                Person::Designer(d) => Ok(Staff::Designer(d)),
                other => Err(other),
            }
        }
    }

    fn john() -> Person {
        Person::Developer(Developer {
            name: "John Smith".into(),
            programming_language: "Rust".into(),
        })
    }

    fn lorem() -> Person {
        Person::Designer(Designer {
            name: "Lorem Ipsum".into(),
            favorite_tool: "Figma".into(),
        })
    }

    fn full_cases<'a>() -> PersonCases<'a, String> {
        PersonCases {
            Developer: Box::new(|dev: Developer| {
                format!("Hello I am {}, using {}", dev.name, dev.programming_language)
            }),
            Designer: Box::new(|_: Designer| "DESIGNER".to_string()),
            SalesPerson: Box::new(|_: PersonTag| "sales person".to_string()),
            Artist: Box::new(|_: PersonTag| "artist".to_string()),
        }
    }

    #[test]
    fn test_full_cases() {
        let cases = full_cases();
        assert_eq!(match_with(john(), &cases), "Hello I am John Smith, using Rust");
        assert_eq!(match_with(lorem(), &cases), "DESIGNER");
        assert_eq!(match_with(Person::SalesPerson, &cases), "sales person");
        assert_eq!(match_with(Person::Artist, &cases), "artist");
    }

    #[test]
    fn test_deferred_is_the_direct_form() {
        let deferred = matcher(full_cases());
        let direct = full_cases();
        for p in [john(), lorem(), Person::SalesPerson, Person::Artist] {
            assert_eq!(deferred(p.clone()), match_with(p, &direct));
        }
    }

    #[test]
    fn test_deferred_composes_with_iterators() {
        let out: Vec<String> = vec![Person::Artist, john()]
            .into_iter()
            .map(matcher(full_cases()))
            .collect();
        assert_eq!(out, vec!["artist", "Hello I am John Smith, using Rust"]);
    }

    #[test]
    fn test_partial_cases_fall_back() {
        let cases: PersonPartial<'_, i64> = PersonPartial {
            Developer: Some(Box::new(|dev: Developer| dev.name.len() as i64)),
            ..PersonPartial::new(|_: Person| 999_999_999)
        };
        assert_eq!(match_with(john(), &cases), 10);
        assert_eq!(match_with(Person::SalesPerson, &cases), 999_999_999);
        assert_eq!(match_with(lorem(), &cases), 999_999_999);
    }

    #[test]
    fn test_otherwise_receives_the_whole_value() {
        let cases: PersonPartial<'_, String> = PersonPartial {
            SalesPerson: Some(Box::new(|_: PersonTag| "explicit".to_string())),
            ..PersonPartial::new(|p: Person| format!("{:?}", p.tag()))
        };
        assert_eq!(match_with(Person::Artist, &cases), "Artist");
        assert_eq!(match_with(lorem(), &cases), "Designer");
        assert_eq!(match_with(Person::SalesPerson, &cases), "explicit");
    }

    #[test]
    fn test_literal_handler_receives_its_tag() {
        let cases: PersonPartial<'_, PersonTag> = PersonPartial {
            Artist: Some(Box::new(|tag: PersonTag| tag)),
            SalesPerson: Some(Box::new(|tag: PersonTag| tag)),
            ..PersonPartial::new(|p: Person| p.tag())
        };
        assert_eq!(match_with(Person::Artist, &cases), PersonTag::Artist);
        assert_eq!(match_with(john(), &cases), PersonTag::Developer);
    }

    #[test]
    fn test_tags() {
        assert_eq!(john().tag(), PersonTag::Developer);
        assert_eq!(Person::Artist.tag(), PersonTag::Artist);
        assert_eq!(PersonTag::ALL.len(), 4);
        assert_eq!(PersonTag::Designer.name(), "Designer");
        assert_eq!(PersonTag::from_name("SalesPerson"), Some(PersonTag::SalesPerson));
        assert_eq!(PersonTag::from_name("Nobody"), None);
    }

    #[test]
    fn test_describe_agrees_with_algebra() {
        let described = Person::describe("kind");
        assert_eq!(described.name, "Person");
        assert_eq!(algebra::tag_set(&described, "kind").unwrap(), tag_set::<Person>());
        assert_eq!(described.records().count(), 2);
        assert_eq!(described.literals().count(), 2);
    }

    #[test]
    fn test_describe_carries_tags_only() {
        let described = Person::describe("kind");
        for record in described.records() {
            assert_eq!(record.fields.len(), 1);
            assert!(record.discriminant("kind").is_some());
        }
        // le payload n'est pas décrit : seul le tag est contrôlé
        let bare = crate::core::discriminant::Value::record([("kind", "Developer")]);
        assert!(validate::validate_value(&bare, &described, "kind").is_ok());
    }

    #[test]
    fn test_variant_extract_and_partition() {
        let staff = Staff::extract(john()).unwrap();
        assert_eq!(staff.clone().insert(), john());
        assert_eq!(Staff::extract(Person::Artist), Err(Person::Artist));

        let (kept, dropped): (Vec<Staff>, Vec<Person>) =
            partition(vec![john(), Person::SalesPerson, lorem(), Person::Artist]);
        assert_eq!(kept.len(), 2);
        assert_eq!(dropped, vec![Person::SalesPerson, Person::Artist]);
    }

    #[test]
    fn test_handler_results_are_not_wrapped() {
        let cases: PersonPartial<'_, Result<u8, String>> = PersonPartial {
            Developer: Some(Box::new(|_: Developer| Err("no dev".to_string()))),
            ..PersonPartial::new(|_: Person| Ok(1))
        };
        assert_eq!(match_with(john(), &cases), Err("no dev".to_string()));
        assert_eq!(match_with(Person::Artist, &cases), Ok(1));
    }
}
