// Copyright (c) 2016 rust-threshold-secret-sharing developers
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! CSPRNG abstraction: a pluggable source of random bit-strings, used to
//! draw polynomial coefficients in the sharing step.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, SssError};

/// Bounded retry count for the all-zero rejection loop (spec §5: MAY cap at
/// a constant and surface `RngFailureError` on exhaustion).
const MAX_RNG_RETRIES: u32 = 16;

/// Identifies which RNG variant is currently installed, exposed via
/// [`crate::Config::rng_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngTag {
    Platform,
    DeterministicTest,
    UserSupplied,
}

impl RngTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RngTag::Platform => "platform",
            RngTag::DeterministicTest => "test",
            RngTag::UserSupplied => "user-supplied",
        }
    }
}

/// A source of random bit-strings.
///
/// Implementations need not perform the all-zero rejection themselves;
/// callers go through [`draw_nonzero_bits`], which wraps any `RngProvider`
/// with the rejection loop and retry cap.
pub trait RngProvider: Send {
    /// Returns a string of exactly `n` characters, each `'0'` or `'1'`.
    fn fill(&mut self, n: usize) -> Result<String>;

    fn tag(&self) -> RngTag;
}

/// The host OS CSPRNG, via `rand::rngs::OsRng`.
pub struct PlatformRng {
    inner: OsRng,
}

impl PlatformRng {
    pub fn new() -> Self {
        PlatformRng { inner: OsRng }
    }
}

impl Default for PlatformRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngProvider for PlatformRng {
    fn fill(&mut self, n: usize) -> Result<String> {
        Ok(random_bit_string(&mut self.inner, n))
    }

    fn tag(&self) -> RngTag {
        RngTag::Platform
    }
}

/// Fixed 32-bit-word fill for reproducible test vectors. MUST NOT be
/// selected by auto-detection; only reachable via an explicit tag.
pub struct DeterministicRng {
    word: u32,
}

impl DeterministicRng {
    /// The canonical test constant used by the literal scenarios in
    /// spec §8.
    pub const DEFAULT_WORD: u32 = 0xDEAD_BEEF;

    pub fn new() -> Self {
        DeterministicRng {
            word: Self::DEFAULT_WORD,
        }
    }

    pub fn with_word(word: u32) -> Self {
        DeterministicRng { word }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngProvider for DeterministicRng {
    fn fill(&mut self, n: usize) -> Result<String> {
        let mut bits = String::with_capacity(n);
        for i in 0..n {
            let bit = (self.word >> (i % 32)) & 1;
            bits.push(if bit == 1 { '1' } else { '0' });
        }
        Ok(bits)
    }

    fn tag(&self) -> RngTag {
        RngTag::DeterministicTest
    }
}

/// Adapts a caller-supplied `RngCore` into an `RngProvider`.
pub struct UserRng<R: RngCore + Send> {
    inner: R,
}

impl<R: RngCore + Send> UserRng<R> {
    pub fn new(inner: R) -> Self {
        UserRng { inner }
    }
}

impl<R: RngCore + Send> RngProvider for UserRng<R> {
    fn fill(&mut self, n: usize) -> Result<String> {
        Ok(random_bit_string(&mut self.inner, n))
    }

    fn tag(&self) -> RngTag {
        RngTag::UserSupplied
    }
}

fn random_bit_string<R: RngCore + ?Sized>(rng: &mut R, n: usize) -> String {
    let mut bits = String::with_capacity(n);
    let mut remaining = n;
    while remaining > 0 {
        let word = rng.next_u32();
        let take = remaining.min(32);
        for i in 0..take {
            let bit = (word >> i) & 1;
            bits.push(if bit == 1 { '1' } else { '0' });
        }
        remaining -= take;
    }
    bits
}

/// Draws `n` random bits from `rng`, re-drawing on an all-zero result, up
/// to [`MAX_RNG_RETRIES`] attempts. An all-zero leading coefficient would
/// collapse a polynomial term, so callers never expect to see one.
pub fn draw_nonzero_bits(rng: &mut dyn RngProvider, n: usize) -> Result<String> {
    for _ in 0..MAX_RNG_RETRIES {
        let bits = rng.fill(n)?;
        if bits.bytes().any(|b| b != b'0') {
            return Ok(bits);
        }
    }
    Err(SssError::rng_failure(format!(
        "RNG produced an all-zero {n}-bit value {MAX_RNG_RETRIES} times in a row"
    )))
}

/// Runs the self-test of spec §4.2: draw `w` bits and confirm the result
/// parses as a positive base-2 integer of the expected length.
pub fn self_test(rng: &mut dyn RngProvider, w: usize) -> Result<()> {
    let bits = rng.fill(w).map_err(|e| {
        SssError::invalid_rng(format!("RNG self-test failed to produce output: {e}"))
    })?;
    if bits.len() != w {
        return Err(SssError::invalid_rng(format!(
            "RNG self-test expected {w} bits but got {}",
            bits.len()
        )));
    }
    let value = u64::from_str_radix(&bits, 2).map_err(|_| {
        SssError::invalid_rng("RNG self-test output did not parse as a base-2 integer")
    })?;
    if value == 0 {
        return Err(SssError::invalid_rng(
            "RNG self-test produced an all-zero value",
        ));
    }
    Ok(())
}
