//! Build utilities for the Connector crates.
//!
//! This crate provides build script helpers for locating and linking the
//! native `rtiddsconnector` shared library. It is designed to be used in the
//! `build.rs` of crates that call into the library through FFI.
//!
//! # Requirements
//!
//! - An RTI Connector native library installation
//! - `RTI_CONNECTOR_LIB_DIR` pointing at the directory that holds
//!   `librtiddsconnector.so` (`rtiddsconnector.dll`, `librtiddsconnector.dylib`)
//!
//! When the variable is unset the build still succeeds, but the
//! `rti_connector` cfg is not emitted and the FFI session is compiled out.
//!
//! # Example Usage
//!
//! In your `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     connector_build::connector_env_var_changed();
//!     connector_build::link_connector_lib();
//! }
//! ```

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Environment variable naming the native library directory.
pub const LIB_DIR_ENV: &str = "RTI_CONNECTOR_LIB_DIR";

/// Name of the native library, without platform prefix or suffix.
pub const LIB_NAME: &str = "rtiddsconnector";

/// cfg emitted when the native library is available.
pub const LINKED_CFG: &str = "rti_connector";

/// Emits cargo directives to rebuild when the native library location changes.
///
/// # Emitted Directives
///
/// - Declares the `rti_connector` cfg so `check-cfg` accepts it
/// - Sets `rustc-cfg=rti_connector` when [`find_connector_lib_dir`] finds the library
/// - Registers `RTI_CONNECTOR_LIB_DIR` for change detection
pub fn connector_env_var_changed() {
    println!("cargo::rustc-check-cfg=cfg({LINKED_CFG})");
    if find_connector_lib_dir().is_some() {
        println!("cargo:rustc-cfg={LINKED_CFG}");
    }
    println!("cargo:rerun-if-env-changed={LIB_DIR_ENV}");
}

/// Directory holding the native library, if configured and present.
pub fn find_connector_lib_dir() -> Option<PathBuf> {
    lib_dir_from(env::var_os(LIB_DIR_ENV))
}

fn lib_dir_from(value: Option<OsString>) -> Option<PathBuf> {
    let value = value.filter(|v| !v.is_empty())?;
    let dir = PathBuf::from(value);
    if contains_library(&dir) {
        Some(dir)
    } else {
        None
    }
}

/// Platform file name of the native library.
pub fn library_file_name() -> String {
    format!(
        "{}{LIB_NAME}{}",
        env::consts::DLL_PREFIX,
        env::consts::DLL_SUFFIX
    )
}

fn contains_library(dir: &Path) -> bool {
    dir.join(library_file_name()).is_file()
}

/// Emits the link directives for the native library.
///
/// Does nothing when the library cannot be found, so crates depending on it
/// still build; their FFI code is gated on the `rti_connector` cfg.
pub fn link_connector_lib() {
    let Some(dir) = find_connector_lib_dir() else {
        println!("cargo:warning={LIB_NAME} not found; set {LIB_DIR_ENV} to enable the native backend");
        return;
    };

    println!("cargo:rustc-link-search=native={}", dir.display());
    println!("cargo:rustc-link-lib=dylib={LIB_NAME}");

    #[cfg(not(target_os = "windows"))]
    println!("cargo:rustc-link-arg=-Wl,-rpath,{}", dir.display());
}
