use std::env;
use std::path::Path;

// Packet.lib (Npcap SDK) is looked up in <workspace>/lib when linking on Windows.
fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|err| {
        eprintln!("The CARGO_MANIFEST_DIR environment variable is not set: {err}");
        std::process::exit(1);
    });

    let Some(workspace_root) = Path::new(&manifest_dir).parent() else {
        eprintln!("Failed to get workspace directory of {manifest_dir}");
        std::process::exit(1);
    };

    let lib_path = workspace_root.join("lib");
    println!("cargo:rustc-link-search=native={}", lib_path.display());
    println!("cargo:rerun-if-changed=build.rs");
}
