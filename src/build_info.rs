/// Git description of the source this binary was built from.
pub fn git_describe() -> &'static str {
    env!("GIT_DESCRIBE")
}

pub fn git_hash() -> &'static str {
    env!("GIT_HASH")
}

pub fn print_report(name: &str) {
    println!("{{");
    println!("  \"name\": \"{}\",", name);
    println!("  \"version\": \"{}\",", env!("CARGO_PKG_VERSION"));
    println!("  \"git_describe\": \"{}\",", git_describe());
    println!("  \"git_hash\": \"{}\"", git_hash());
    println!("}}");
}
