// =============================================================================
// MACROS — `tagged_union!` : déclarer une union et ses tables de handlers
// =============================================================================
//
// À partir d'une seule déclaration, la macro génère :
//
//   enum Person           → l'union (records avec payload + littéraux nus)
//   enum PersonTag        → les discriminants, sans payload
//   struct PersonCases    → UN handler par variante, tous obligatoires
//   struct PersonPartial  → handlers optionnels + repli `otherwise` obligatoire
//
// L'EXHAUSTIVITÉ est garantie par le compilateur :
//   - un littéral de struct `PersonCases { ... }` auquel il manque un champ
//     ne compile pas ;
//   - `PersonPartial::new(otherwise)` ne se construit pas sans repli ;
//   - le `match` généré dans `apply` n'a pas de bras `_`.
//
// Les champs portent le nom exact des variantes (`Developer`, `SalesPerson`),
// d'où le `#[allow(non_snake_case)]`.
//
// `describe` ne décrit que les tags : un record y a pour seul champ son
// discriminant littéral, les types de payload restent côté Rust.
//
// =============================================================================

/// Déclare une union étiquetée et ses tables de handlers vérifiées par `rustc`.
///
/// ```
/// use tagmatch::tagged_union;
/// use tagmatch::typed::{match_with, TaggedUnion};
///
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct Developer { pub name: String }
///
/// tagged_union! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum Staff {
///         tag: StaffTag,
///         cases: StaffCases,
///         partial: StaffPartial,
///         records { Developer(Developer) }
///         literals { Intern }
///     }
/// }
///
/// let hello: StaffCases<'_, String> = StaffCases {
///     Developer: Box::new(|d: Developer| format!("Hi {}", d.name)),
///     Intern: Box::new(|_: StaffTag| "hey intern".to_string()),
/// };
/// let john = Staff::Developer(Developer { name: "John".into() });
/// assert_eq!(john.tag(), StaffTag::Developer);
/// assert_eq!(match_with(john, &hello), "Hi John");
/// ```
///
/// Oublier une variante sans repli est refusé à la compilation :
///
/// ```compile_fail
/// use tagmatch::tagged_union;
///
/// tagged_union! {
///     pub enum Light {
///         tag: LightTag,
///         cases: LightCases,
///         partial: LightPartial,
///         records { }
///         literals { Red, Green }
///     }
/// }
///
/// let cases: LightCases<'_, u8> = LightCases {
///     Red: Box::new(|_: LightTag| 1),
/// };
/// ```
#[macro_export]
macro_rules! tagged_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            tag: $tag:ident,
            cases: $cases:ident,
            partial: $partial:ident,
            records { $( $rec:ident ( $payload:ty ) ),* $(,)? }
            literals { $( $lit:ident ),* $(,)? }
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $rec($payload), )*
            $( $lit, )*
        }

        /// Les discriminants de l'union
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $tag {
            $( $rec, )*
            $( $lit, )*
        }

        impl $crate::typed::Tag for $tag {
            const ALL: &'static [Self] = &[ $( $tag::$rec, )* $( $tag::$lit, )* ];

            fn name(&self) -> &'static str {
                match *self {
                    $( $tag::$rec => stringify!($rec), )*
                    $( $tag::$lit => stringify!($lit), )*
                }
            }
        }

        impl $crate::typed::TaggedUnion for $name {
            type Tag = $tag;

            fn tag(&self) -> $tag {
                match self {
                    $( $name::$rec(..) => $tag::$rec, )*
                    $( $name::$lit => $tag::$lit, )*
                }
            }

            /// Tags seulement : chaque record n'a que son champ discriminant.
            #[allow(unused_variables)]
            fn describe(field: &str) -> $crate::core::union::UnionType {
                #[allow(unused_mut)]
                let mut described = $crate::core::union::UnionType::new(stringify!($name));
                $(
                    described.add_record(
                        $crate::core::union::RecordShape::new(stringify!($rec))
                            .with_literal(field, stringify!($rec)),
                    );
                )*
                $( described.add_literal(stringify!($lit)); )*
                described
            }
        }

        /// Un handler par variante : la table complète
        #[allow(non_snake_case)]
        $vis struct $cases<'a, R> {
            $( pub $rec: ::std::boxed::Box<dyn Fn($payload) -> R + 'a>, )*
            $( pub $lit: ::std::boxed::Box<dyn Fn($tag) -> R + 'a>, )*
        }

        impl<'a, R> $crate::typed::Cases<$name> for $cases<'a, R> {
            type Output = R;

            fn apply(&self, value: $name) -> R {
                match value {
                    $( $name::$rec(payload) => (self.$rec)(payload), )*
                    $( $name::$lit => (self.$lit)($tag::$lit), )*
                }
            }
        }

        /// Handlers optionnels + repli : la table partielle
        #[allow(non_snake_case)]
        $vis struct $partial<'a, R> {
            $( pub $rec: ::std::option::Option<::std::boxed::Box<dyn Fn($payload) -> R + 'a>>, )*
            $( pub $lit: ::std::option::Option<::std::boxed::Box<dyn Fn($tag) -> R + 'a>>, )*
            pub otherwise: ::std::boxed::Box<dyn Fn($name) -> R + 'a>,
        }

        impl<'a, R> $partial<'a, R> {
            /// Une table où seul le repli est renseigné
            pub fn new<F>(otherwise: F) -> Self
            where
                F: Fn($name) -> R + 'a,
            {
                $partial {
                    $( $rec: ::std::option::Option::None, )*
                    $( $lit: ::std::option::Option::None, )*
                    otherwise: ::std::boxed::Box::new(otherwise),
                }
            }
        }

        impl<'a, R> $crate::typed::Cases<$name> for $partial<'a, R> {
            type Output = R;

            fn apply(&self, value: $name) -> R {
                match value {
                    $(
                        $name::$rec(payload) => match &self.$rec {
                            ::std::option::Option::Some(handler) => handler(payload),
                            ::std::option::Option::None => (self.otherwise)($name::$rec(payload)),
                        },
                    )*
                    $(
                        $name::$lit => match &self.$lit {
                            ::std::option::Option::Some(handler) => handler($tag::$lit),
                            ::std::option::Option::None => (self.otherwise)($name::$lit),
                        },
                    )*
                }
            }
        }
    };
}
