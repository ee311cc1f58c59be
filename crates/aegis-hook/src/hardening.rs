//! Process-wide hardening, run once via `#[ctor::ctor]` before `main` (and
//! therefore before any stdin byte is read). Disables core dumps and
//! ptrace attachment, and strips environment variables that could hijack
//! dynamic linking or override trusted config paths.

const SANITIZED_ENV_VARS: &[&str] = &["LD_PRELOAD", "LD_LIBRARY_PATH", "DYLD_INSERT_LIBRARIES"];

#[ctor::ctor]
fn harden_process() {
    disable_core_dumps();
    disable_ptrace();
    sanitize_env();
}

fn disable_core_dumps() {
    let limit = libc::rlimit { rlim_cur: 0, rlim_max: 0 };
    // SAFETY: `limit` is a valid, fully-initialized `rlimit` and
    // `RLIMIT_CORE` never aliases memory the rest of the process depends on.
    unsafe {
        libc::setrlimit(libc::RLIMIT_CORE, &limit);
    }
}

#[cfg(target_os = "linux")]
fn disable_ptrace() {
    // SAFETY: PR_SET_DUMPABLE takes no pointer arguments; passing 0 only
    // ever narrows what another process may do to this one.
    unsafe {
        libc::prctl(libc::PR_SET_DUMPABLE, 0, 0, 0, 0);
    }
}

#[cfg(not(target_os = "linux"))]
fn disable_ptrace() {}

fn sanitize_env() {
    for var in SANITIZED_ENV_VARS {
        std::env::remove_var(var);
    }
}
