use std::env;

fn main() {
    // Only run the custom build logic if we're not inside a docs.rs build
    if env::var("DOCS_RS").is_err() {
        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed=tauri.conf.json");

        tauri_build::build()
    }
}
