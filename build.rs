//! Build script for bakecost
//!
//! Embeds a per-checkout build counter and the compile time.

use std::fs;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn main() {
    println!("cargo:rerun-if-changed=src");

    let previous: u64 = fs::read_to_string(BUILD_NUMBER_FILE)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build_number = previous + 1;

    if let Err(e) = fs::write(BUILD_NUMBER_FILE, build_number.to_string()) {
        println!("cargo:warning=could not persist build number: {}", e);
    }

    println!("cargo:rustc-env=BAKECOST_BUILD_NUMBER={}", build_number);
    println!(
        "cargo:rustc-env=BAKECOST_BUILD_TIMESTAMP={}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
}
