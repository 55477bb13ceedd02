// =============================================================================
// TAGMATCH — Point d'entrée : démonstration du dispatcher
// =============================================================================
//
// Ce main.rs montre un exemple complet :
//   1. Charger des unions décrites en JSON (registre)
//   2. Calculer TagSet / Extract / Exclude
//   3. Vérifier des tables de handlers (complète, partielle, incomplète)
//   4. Router des valeurs avec match / matchOn, directs et différés
//   5. La même union déclarée en Rust, vérifiée par le compilateur
//
// Niveau de logs : RUST_LOG=tagmatch=debug cargo run
//
// =============================================================================

use tagmatch::core::algebra::{self, tags};
use tagmatch::core::registry::UnionRegistry;
use tagmatch::core::validate;
use tagmatch::typed::{self, match_with, TaggedUnion};
use tagmatch::{match_deferred, match_on, match_on_deferred, tagged_union, Handlers, Value};
use tracing_subscriber::EnvFilter;

const UNIONS: &str = r#"{
    "unions": [
        { "name": "Person", "variants": [
            { "record": "Developer", "fields": {
                "kind": { "literal": "Developer" }, "name": "string", "lang": "string" } },
            { "record": "Designer", "fields": {
                "kind": { "literal": "Designer" }, "name": "string", "tool": "string" } },
            "SalesPerson",
            "Artist"
        ] },
        { "name": "Abc", "variants": [
            "A", "B",
            { "record": "C", "fields": { "tag": { "literal": "C" }, "n": "number" } }
        ] },
        { "name": "Answer", "variants": ["abc", "xyz"] }
    ]
}"#;

#[derive(Debug, Clone)]
pub struct Developer {
    pub name: String,
    pub lang: String,
}

tagged_union! {
    #[derive(Debug, Clone)]
    pub enum Person {
        tag: PersonTag,
        cases: PersonCases,
        partial: PersonPartial,
        records { Developer(Developer) }
        literals { SalesPerson, Artist }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tagmatch=info")),
        )
        .with_target(false)
        .init();

    println!("╔══════════════════════════════════════════════════╗");
    println!("║      TAGMATCH — match / matchOn exhaustifs       ║");
    println!("║      Dispatcher pour unions étiquetées           ║");
    println!("╚══════════════════════════════════════════════════╝\n");

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 1 : Charger les unions (le "système de types")
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 1 : Registre des unions ═══\n");

    let registry = match UnionRegistry::from_json(UNIONS) {
        Ok(registry) => registry,
        Err(e) => {
            println!("✗ {}", e);
            return;
        }
    };
    for name in registry.names() {
        if let Ok(union) = registry.get(name) {
            println!("  {}", union);
        }
    }
    println!();

    let (person, abc, answer) = match (
        registry.get("Person"),
        registry.get("Abc"),
        registry.get("Answer"),
    ) {
        (Ok(p), Ok(a), Ok(x)) => (p, a, x),
        _ => {
            println!("✗ union manquante dans le registre");
            return;
        }
    };

    match validate::validate_discriminant_field(person, "kind") {
        Ok(()) => println!("✓ 'kind' discrimine tous les records de Person\n"),
        Err(errors) => {
            for e in errors {
                println!("✗ {}", e);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 2 : L'algèbre des variantes
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 2 : TagSet / Extract / Exclude ═══\n");

    match algebra::tag_set(person, "kind") {
        Ok(all) => {
            let names: Vec<String> = all.iter().map(|t| t.to_string()).collect();
            println!("  TagSet<Person, kind> = {}", names.join(" | "));
        }
        Err(e) => println!("✗ {}", e),
    }
    match algebra::partition(person, "kind", &tags(["Developer", "Artist"])) {
        Ok((kept, dropped)) => {
            println!("  {}", kept);
            println!("  {}", dropped);
        }
        Err(e) => println!("✗ {}", e),
    }
    if let Err(e) = algebra::tag_set(person, "wrongTagName") {
        println!("  ✗ {}", e);
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 3 : Vérifier les tables de handlers
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 3 : Vérification des handlers ═══\n");

    let incomplete = Handlers::new()
        .on("Developer", |_: &Value| "dev".to_string())
        .check_on(person, "kind");
    match incomplete {
        Ok(_) => println!("  ? table incomplète acceptée"),
        Err(e) => println!("  ✓ refusée avant tout appel : {}", e),
    }

    let greet = Handlers::new()
        .on("Developer", |d: &Value| match d.get("name") {
            Some(Value::Str(name)) => format!("Hi {}", name),
            _ => "Hi".to_string(),
        })
        .on("Designer", |_| "DESIGNER".to_string())
        .on("SalesPerson", |_| "sales person".to_string())
        .on("Artist", |_| "artist".to_string())
        .check_on(person, "kind");
    let greet = match greet {
        Ok(m) => m,
        Err(e) => {
            println!("✗ {}", e);
            return;
        }
    };
    println!("  ✓ table complète : {:?}\n", greet);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 4 : Router des valeurs
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 4 : match / matchOn ═══\n");

    let john = Value::record([
        ("kind", Value::from("Developer")),
        ("name", "John".into()),
        ("lang", "X".into()),
    ]);
    println!("  matchOn(kind, {}) = {}", john, match_on("kind", &john, &greet));
    let sales = Value::from("SalesPerson");
    println!("  matchOn(kind, {}) = {}", sales, match_on("kind", &sales, &greet));

    if let Ok(m) = Handlers::new().on("A", |_| 1).otherwise(|_| -1).check_on(abc, "tag") {
        let route = match_on_deferred("tag", m);
        let c = Value::record([("tag", Value::from("C")), ("n", 5.into())]);
        for v in [Value::from("A"), Value::from("B"), c] {
            println!("  matchOn(tag)({}) = {}", v, route(&v));
        }
    }

    if let Ok(m) = Handlers::new()
        .on("abc", |_| "ABC")
        .on("xyz", |_| "XYZ")
        .check(answer)
    {
        let answer_of = match_deferred(m);
        let answers: Vec<&str> = ["xyz", "abc"]
            .iter()
            .map(|s| answer_of(&Value::from(*s)))
            .collect();
        println!("  match(...) sur [xyz, abc] = {:?}", answers);
    }

    // une donnée externe est filtrée avant d'être routée
    let stranger = Value::record([("kind", Value::from("Developer")), ("name", 42.into())]);
    match validate::validate_value(&stranger, person, "kind") {
        Ok(()) => println!("  {} = {}", stranger, match_on("kind", &stranger, &greet)),
        Err(errors) => {
            for e in errors {
                println!("  ✗ {} écartée : {}", stranger, e.message);
            }
        }
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 5 : La même chose, vérifiée par rustc
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 5 : Union déclarée en Rust ═══\n");

    let cases: PersonCases<'_, String> = PersonCases {
        Developer: Box::new(|d: Developer| format!("Hello I am {}, using {}", d.name, d.lang)),
        SalesPerson: Box::new(|_: PersonTag| "sales person".to_string()),
        Artist: Box::new(|_: PersonTag| "artist".to_string()),
    };
    let dev = Person::Developer(Developer {
        name: "John Smith".into(),
        lang: "Rust".into(),
    });
    println!("  {:?} → {}", dev.tag(), match_with(dev.clone(), &cases));

    let fallback: PersonPartial<'_, String> = PersonPartial {
        Artist: Some(Box::new(|_: PersonTag| "artist".to_string())),
        ..PersonPartial::new(|p: Person| format!("otherwise({:?})", p.tag()))
    };
    let routed: Vec<String> = vec![Person::SalesPerson, Person::Artist, dev]
        .into_iter()
        .map(typed::matcher(fallback))
        .collect();
    println!("  partial → {:?}", routed);
    println!("  {}", Person::describe("kind"));

    println!("\n═══════════════════════════════════════════════════");
    println!("Dispatch terminé !");
    println!("  {} unions enregistrées", registry.len());
    println!("  exhaustivité : vérifiée avant exécution (core) ou par rustc (typed)");
    println!("═══════════════════════════════════════════════════");
}
