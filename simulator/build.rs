//! Build script for fuel-gauge-simulator.
//!
//! On Windows, links against a vendored SDL2 and places `SDL2.dll` next to
//! the binary. Other platforms use the system SDL2.

use std::path::{Path, PathBuf};
use std::{env, fs};

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let Some(workspace) = Path::new(&manifest_dir).parent() else {
        return;
    };
    let vendor_sdl2 = workspace.join("vendor").join("sdl2");
    println!("cargo:rerun-if-changed={}", vendor_sdl2.display());

    if !vendor_sdl2.exists() {
        println!("cargo:warning=SDL2.lib and SDL2.dll expected in {}", vendor_sdl2.display());
        return;
    }
    println!("cargo:rustc-link-search=native={}", vendor_sdl2.display());

    // OUT_DIR is target/<profile>/build/<pkg>/out; the binary lands in target/<profile>
    let Some(profile_dir) = env::var("OUT_DIR").ok().map(PathBuf::from).and_then(|out| {
        out.ancestors()
            .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
            .map(Path::to_path_buf)
    }) else {
        return;
    };

    let dll_src = vendor_sdl2.join("SDL2.dll");
    let dll_dst = profile_dir.join("SDL2.dll");
    if dll_src.exists()
        && !dll_dst.exists()
        && let Err(e) = fs::copy(&dll_src, &dll_dst)
    {
        println!("cargo:warning=Failed to copy SDL2.dll: {e}");
    }
}
