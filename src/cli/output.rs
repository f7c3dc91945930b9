//! Console output helpers honoring the global CLI flags.
//!
//! The flags are exported as environment variables by `main` so any module
//! can check them without threading state through every call.

/// True when `--quiet` was passed.
pub fn is_quiet() -> bool {
    std::env::var("SITEGRAB_QUIET").is_ok()
}

/// True when `--verbose` was passed.
pub fn is_verbose() -> bool {
    std::env::var("SITEGRAB_VERBOSE").is_ok()
}
