// build.rs
fn main() {
    // embed_migrations! reads the directory at compile time
    println!("cargo:rerun-if-changed=migrations");
}
