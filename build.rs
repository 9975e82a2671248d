use std::env;

fn main() {
    // ESP-IDF link arguments are only emitted when building for the chip,
    // host builds (library tests) have nothing to link against.
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "espidf" {
        embuild::espidf::sysenv::output();
    }

    println!("cargo:rerun-if-changed=build.rs");
}
