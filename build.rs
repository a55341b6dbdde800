// Build script for visioncore
//
// The `link` feature links against the VisionCore C shim (libvisioncore),
// found through the normal library search path. Set VISIONCORE_LIB_DIR to
// point the linker somewhere else.

fn main() {
    println!("cargo:rerun-if-env-changed=VISIONCORE_LIB_DIR");
    if std::env::var_os("CARGO_FEATURE_LINK").is_some() {
        if let Ok(dir) = std::env::var("VISIONCORE_LIB_DIR") {
            println!("cargo:rustc-link-search=native={dir}");
        }
    }
}
