fn main() {
    println!("cargo:rerun-if-env-changed=METASWEEP_RELEASE_VERSION");

    // The release to fetch defaults to the version this shim was packaged as.
    // Packaging pipelines may pin a different release at build time.
    let version = match std::env::var("METASWEEP_RELEASE_VERSION") {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => std::env::var("CARGO_PKG_VERSION").unwrap_or_default(),
    };

    // Strip 'v' prefix if present (e.g., "v1.0.0" -> "1.0.0")
    let version = version.strip_prefix('v').unwrap_or(&version);

    println!("cargo:rustc-env=METASWEEP_BUILD_VERSION={}", version);
}
