use rustc_version::{version, Result};

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-env=RUSTC_VERSION={}", version()?);
    Ok(())
}
