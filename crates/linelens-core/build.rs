use std::env;
use std::fs;
use std::path::Path;

// Rewrites README.md links for rustdoc before lib.rs includes it:
// `](src/domain)` becomes `](domain)` so links resolve to modules rather
// than source files, and `.rs)` suffixes are dropped likewise.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=README.md");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR");
    let content = fs::read_to_string(Path::new(&crate_dir).join("README.md")).unwrap_or_default();
    let rewritten = content.replace("](src/", "](").replace(".rs)", ")");

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR");
    fs::write(Path::new(&out_dir).join("README_GENERATED.md"), rewritten)
        .expect("failed to write README_GENERATED.md");
}
