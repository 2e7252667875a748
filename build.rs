// Compiles data/enemy_pool.ron into the binary.
//
// The authored RON is parsed and validated here, encoded with postcard into
// OUT_DIR/enemy_pool.bin, and a phf name -> index map is generated alongside
// it in OUT_DIR/generated_data.rs for `include!` from src/enemy_pool.rs.

use schema::CombatantTemplate;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const POOL_FILE: &str = "data/enemy_pool.ron";
const ENEMY_ROSTER_SIZE: usize = 5;

fn main() {
    println!("cargo:rerun-if-changed={}", POOL_FILE);
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    let pool = load_pool(&manifest_dir.join(POOL_FILE));
    validate_pool(&pool);

    let bytes = postcard::to_allocvec(&pool).expect("Failed to encode enemy pool with postcard");
    fs::write(out_dir.join("enemy_pool.bin"), bytes).expect("Failed to write enemy_pool.bin");

    write_generated_source(&out_dir.join("generated_data.rs"), &pool);
}

fn load_pool(path: &Path) -> Vec<CombatantTemplate> {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    ron::from_str(&text).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

fn validate_pool(pool: &[CombatantTemplate]) {
    assert!(
        pool.len() >= ENEMY_ROSTER_SIZE,
        "Enemy pool needs at least {} entries, found {}",
        ENEMY_ROSTER_SIZE,
        pool.len()
    );

    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for template in pool {
        assert!(
            names.insert(template.name.as_str()),
            "Duplicate enemy pool name: {}",
            template.name
        );
        assert!(ids.insert(template.id), "Duplicate enemy pool id: {}", template.id);
        assert!(
            (1..=2).contains(&template.categories.len()),
            "{} must have one or two categories",
            template.name
        );
    }
}

fn write_generated_source(path: &Path, pool: &[CombatantTemplate]) {
    let mut index = phf_codegen::Map::new();
    for (i, template) in pool.iter().enumerate() {
        index.entry(template.name.as_str(), &i.to_string());
    }

    let mut file = fs::File::create(path).expect("Failed to create generated_data.rs");
    writeln!(
        file,
        "static ENEMY_POOL_BYTES: &[u8] = include_bytes!(concat!(env!(\"OUT_DIR\"), \"/enemy_pool.bin\"));"
    )
    .expect("Failed to write generated_data.rs");
    writeln!(
        file,
        "static ENEMY_POOL_INDEX: phf::Map<&'static str, usize> = {};",
        index.build()
    )
    .expect("Failed to write generated_data.rs");
}
