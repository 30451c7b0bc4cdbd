// Copyright (c) 2016 rust-threshold-secret-sharing developers
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Shamir's threshold secret sharing over GF(2^w).
//!
//! A secret given as a hex string is split into `N` shares such that any
//! `T` of them reconstruct it exactly, while fewer than `T` reveal nothing.
//! Arithmetic takes place in a binary Galois field GF(2^w) with `w`
//! configurable in `[3, 20]`, so share counts scale up to `2^w - 1`.
//!
//! ```
//! use gf2w_secret_sharing::{Context, RngChoice, combine};
//!
//! let mut ctx = Context::new(Some(8), Some(RngChoice::Platform)).unwrap();
//! let shares = ctx.share("abc123", 5, 3, None).unwrap();
//! let refs: Vec<&str> = shares[..3].iter().map(String::as_str).collect();
//! assert_eq!(combine(&refs, 0).unwrap(), "abc123");
//! ```
//!
//! The crate also exposes a global convenience wrapper (free functions
//! [`init`], [`share`], [`combine`], …) mirroring the reference library's
//! API shape; see the module-level docs on [`context`] for why `combine`
//! never needs (or mutates) the global context.

pub mod chunk;
mod context;
pub mod error;
pub mod field;
pub mod poly;
pub mod rng;
pub mod share;

pub use context::{Config, Context, RngChoice, DEFAULT_PAD_LENGTH, DEFAULT_WIDTH};
pub use error::{ErrorCode, SssError};
pub use field::{MAX_WIDTH, MIN_WIDTH};
pub use rng::{DeterministicRng, PlatformRng, RngProvider, RngTag, UserRng};
pub use share::ShareComponents;

use std::sync::{Mutex, OnceLock};

use error::{Result, SssError as Error};

static GLOBAL: OnceLock<Mutex<Option<Context>>> = OnceLock::new();

fn global() -> &'static Mutex<Option<Context>> {
    GLOBAL.get_or_init(|| Mutex::new(None))
}

/// (Re-)initializes the global context: builds field tables for `w`
/// (default [`DEFAULT_WIDTH`]) and installs the requested RNG variant.
/// Discards any previously installed global context.
pub fn init(w: Option<u8>, rng_choice: Option<RngChoice>) -> Result<()> {
    let ctx = Context::new(w, rng_choice)?;
    *global().lock().expect("global context lock poisoned") = Some(ctx);
    Ok(())
}

fn with_global<T>(f: impl FnOnce(&mut Context) -> Result<T>) -> Result<T> {
    let mut guard = global().lock().expect("global context lock poisoned");
    match guard.as_mut() {
        Some(ctx) => f(ctx),
        None => Err(Error::init(
            "no global context: call init() before using the global API",
        )),
    }
}

/// Installs a new RNG on the global context. See [`Context::set_rng`].
pub fn set_rng(rng_choice: Option<RngChoice>) -> Result<bool> {
    with_global(|ctx| ctx.set_rng(rng_choice))
}

/// Snapshot of the global context's configuration.
pub fn get_config() -> Result<Config> {
    with_global(|ctx| Ok(ctx.get_config()))
}

/// Splits `secret_hex` using the global context. See [`Context::share`].
pub fn share(secret_hex: &str, n: u32, t: u32, pad_length: Option<usize>) -> Result<Vec<String>> {
    with_global(|ctx| ctx.share(secret_hex, n, t, pad_length))
}

/// Combines shares at `at` (`0` recovers the secret). Width-self-describing
/// and independent of whatever global context is installed; see
/// [`context`]'s design notes.
pub fn combine(shares: &[&str], at: u32) -> Result<String> {
    context::combine(shares, at)
}

/// Computes and encodes a new share at `x = id` from an existing set.
pub fn new_share(id: u32, shares: &[&str]) -> Result<String> {
    context::new_share(id, shares)
}

/// Decodes a share string into its `(w, id, data)` components.
pub fn extract_share_components(share_str: &str) -> Result<ShareComponents> {
    share::decode_share(share_str)
}

/// Returns `⌈bits/4⌉` hex characters of randomness from the global
/// context's RNG if one is installed, otherwise from a fresh platform RNG.
pub fn random(bits: u32) -> Result<String> {
    let mut guard = global().lock().expect("global context lock poisoned");
    match guard.as_mut() {
        Some(ctx) => ctx.random(bits),
        None => context::random(bits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test_helpers::with_clean_global;

    mod serial_test_helpers {
        use std::sync::Mutex;

        // The global context is process-wide, so tests that touch it run
        // serialized against a dedicated lock (separate from the crate's
        // own global lock) rather than against the real OS-level global
        // state racing across `cargo test`'s default thread pool.
        static TEST_LOCK: Mutex<()> = Mutex::new(());

        pub fn with_clean_global<T>(f: impl FnOnce() -> T) -> T {
            let _guard = TEST_LOCK.lock().expect("test lock poisoned");
            f()
        }
    }

    #[test]
    fn global_wrapper_requires_init() {
        with_clean_global(|| {
            // Not asserting on prior global state (other tests may have
            // called init); only that init() + share()/combine() compose.
            init(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
            let shares = share("abc123", 5, 3, None).unwrap();
            let refs: Vec<&str> = shares[..3].iter().map(String::as_str).collect();
            assert_eq!(combine(&refs, 0).unwrap(), "abc123");
        });
    }

    #[test]
    fn combine_does_not_require_matching_global_width() {
        with_clean_global(|| {
            init(Some(10), Some(RngChoice::DeterministicTest)).unwrap();
            // Shares produced under w=8 combine fine even though the
            // global context is w=10: combine derives its own tables.
            let mut ctx8 = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
            let shares = ctx8.share("ff", 3, 2, None).unwrap();
            let refs: Vec<&str> = shares.iter().map(String::as_str).collect();
            assert_eq!(combine(&refs[..2], 0).unwrap(), "ff");
            assert_eq!(get_config().unwrap().bits, 10);
        });
    }
}
