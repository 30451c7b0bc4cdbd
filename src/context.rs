// Copyright (c) 2016 rust-threshold-secret-sharing developers
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Public API orchestration: an explicit, immutable-once-built
//! configuration (`Context`) that owns a field engine and an RNG, plus the
//! operations that compose the lower modules.
//!
//! This replaces the reference implementation's single mutable global
//! with an owned value (spec design note: "re-architected as an explicit,
//! immutable configuration value owned by a context/instance passed to
//! operations"). [`crate::init`]/[`crate::share`]/etc. are a thin global
//! convenience wrapper kept for API parity; see `lib.rs`.

use tracing::debug;

use crate::chunk;
use crate::error::{Result, SssError};
use crate::field::FieldTables;
use crate::poly::{self, Share as PolyShare};
use crate::rng::{self, DeterministicRng, PlatformRng, RngProvider, RngTag};
use crate::share::{self, ShareComponents};

/// Default field width used by [`Context::new`] when none is given.
pub const DEFAULT_WIDTH: u8 = 8;
/// Default padding length used by [`Context::share`] when none is given.
pub const DEFAULT_PAD_LENGTH: usize = 128;

const MIN_RANDOM_BITS: u32 = 2;
const MAX_RANDOM_BITS: u32 = 65536;

/// Selects which RNG variant to install.
pub enum RngChoice {
    /// The host OS CSPRNG.
    Platform,
    /// Fixed-output RNG for reproducible test vectors. MUST NOT be used
    /// in production.
    DeterministicTest,
    /// A caller-supplied provider (hardware RNG, mock, etc.).
    Custom(Box<dyn RngProvider>),
}

impl RngChoice {
    fn instantiate(self) -> Box<dyn RngProvider> {
        match self {
            RngChoice::Platform => Box::new(PlatformRng::new()),
            RngChoice::DeterministicTest => Box::new(DeterministicRng::new()),
            RngChoice::Custom(provider) => provider,
        }
    }
}

/// Read-only snapshot of a [`Context`]'s configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub radix: u32,
    pub bits: u8,
    pub max_shares: u32,
    pub has_rng: bool,
    pub rng_tag: RngTag,
}

/// An initialized configuration: field tables for a fixed width plus an
/// installed RNG. Mutated only by [`Context::set_rng`]; `combine` never
/// mutates a `Context` (see [`combine`], the free function).
pub struct Context {
    tables: FieldTables,
    rng: Box<dyn RngProvider>,
}

impl Context {
    /// Builds field tables for `w` (default [`DEFAULT_WIDTH`]) and installs
    /// the requested RNG (default [`RngChoice::Platform`]).
    pub fn new(w: Option<u8>, rng_choice: Option<RngChoice>) -> Result<Context> {
        let w = w.unwrap_or(DEFAULT_WIDTH);
        let tables = FieldTables::build(w)?;
        let mut rng = rng_choice.unwrap_or(RngChoice::Platform).instantiate();
        rng::self_test(&mut *rng, w as usize)
            .map_err(|e| SssError::init(format!("RNG failed self-test during init: {e}")))?;
        debug!(bits = w, rng = rng.tag().as_str(), "initialized context");
        Ok(Context { tables, rng })
    }

    pub fn bits(&self) -> u8 {
        self.tables.w()
    }

    pub fn max_shares(&self) -> u32 {
        self.tables.n_max()
    }

    /// Installs a new RNG, running its self-test first.
    ///
    /// With `Some(choice)`, a self-test failure is a hard error. With
    /// `None` (auto-detect), the prior RNG is left installed and `Ok(false)`
    /// is returned instead of throwing, since failure to auto-detect a
    /// platform RNG is an expected, recoverable outcome.
    pub fn set_rng(&mut self, choice: Option<RngChoice>) -> Result<bool> {
        match choice {
            Some(choice) => {
                let mut candidate = choice.instantiate();
                rng::self_test(&mut *candidate, self.tables.w() as usize)?;
                debug!(rng = candidate.tag().as_str(), "installed rng");
                self.rng = candidate;
                Ok(true)
            }
            None => {
                let mut candidate: Box<dyn RngProvider> = Box::new(PlatformRng::new());
                match rng::self_test(&mut *candidate, self.tables.w() as usize) {
                    Ok(()) => {
                        debug!("auto-detected platform rng");
                        self.rng = candidate;
                        Ok(true)
                    }
                    Err(_) => Ok(false),
                }
            }
        }
    }

    pub fn get_config(&self) -> Config {
        Config {
            radix: 16,
            bits: self.tables.w(),
            max_shares: self.tables.n_max(),
            has_rng: true,
            rng_tag: self.rng.tag(),
        }
    }

    /// Splits `secret_hex` into `n` shares, any `t` of which reconstruct it.
    pub fn share(
        &mut self,
        secret_hex: &str,
        n: u32,
        t: u32,
        pad_length: Option<usize>,
    ) -> Result<Vec<String>> {
        let n_max = self.tables.n_max();
        if n > n_max {
            return Err(SssError::invalid_parameter(format!(
                "share count must be an integer between 2 and {n_max}, inclusive \
                 (width {} only supports up to {n_max} shares; initialize with a larger width for more)",
                self.tables.w()
            )));
        }
        if n < 2 {
            return Err(SssError::between_inclusive("share count", 2, n_max as i64));
        }
        if t < 2 || t > n {
            return Err(SssError::between_inclusive("threshold", 2, n as i64));
        }

        let pad_length = pad_length.unwrap_or(DEFAULT_PAD_LENGTH);
        let secret_chunks = chunk::encode_secret(secret_hex, self.tables.w(), pad_length)?;

        let mut per_share_chunks: Vec<Vec<u32>> = vec![Vec::with_capacity(secret_chunks.len()); n as usize];
        for &secret_chunk in &secret_chunks {
            let points = poly::share_one_chunk(secret_chunk, n, t, &mut *self.rng, &self.tables)?;
            for (idx, point) in points.into_iter().enumerate() {
                per_share_chunks[idx].push(point.y);
            }
        }

        debug!(n, t, bits = self.tables.w(), chunks = secret_chunks.len(), "split secret");

        per_share_chunks
            .into_iter()
            .enumerate()
            .map(|(idx, chunks)| {
                let data_hex = chunk::chunks_to_data_hex(&chunks, self.tables.w());
                share::encode_share(self.tables.w(), idx as u32 + 1, &data_hex)
            })
            .collect()
    }

    /// Computes the share payload at `x = id` from an existing set of
    /// shares and encodes it as a new share string.
    pub fn new_share(&self, id: u32, shares: &[&str]) -> Result<String> {
        new_share(id, shares)
    }

    /// Decodes a share string into its components.
    pub fn extract_share_components(&self, share_str: &str) -> Result<ShareComponents> {
        share::decode_share(share_str)
    }

    /// Returns `⌈bits/4⌉` hex characters of randomness.
    pub fn random(&mut self, bits: u32) -> Result<String> {
        random_with_rng(&mut *self.rng, bits)
    }
}

fn random_with_rng(rng: &mut dyn RngProvider, bits: u32) -> Result<String> {
    if !(MIN_RANDOM_BITS..=MAX_RANDOM_BITS).contains(&bits) {
        return Err(SssError::between_inclusive(
            "bits",
            MIN_RANDOM_BITS as i64,
            MAX_RANDOM_BITS as i64,
        ));
    }
    let bit_string = rng.fill(bits as usize)?;
    Ok(chunk::binary_to_hex(&bit_string))
}

/// Standalone `random` usable before any [`Context`] exists.
pub fn random(bits: u32) -> Result<String> {
    let mut rng = PlatformRng::new();
    random_with_rng(&mut rng, bits)
}

/// Combines shares at evaluation point `at` (`0` recovers the secret).
///
/// Per spec design note: this derives a transient field engine from the
/// shares' own declared width and never mutates a caller-held [`Context`],
/// even if that context was built for a different width.
pub fn combine(shares: &[&str], at: u32) -> Result<String> {
    if shares.is_empty() {
        return Err(SssError::invalid_parameter(
            "combine requires at least one share",
        ));
    }

    let decoded: Vec<ShareComponents> = shares
        .iter()
        .map(|s| share::decode_share(s))
        .collect::<Result<_>>()?;

    let w = decoded[0].w;
    if decoded.iter().any(|c| c.w != w) {
        return Err(SssError::mismatched_shares(
            "all shares passed to combine must share the same width",
        ));
    }
    let data_len = decoded[0].data.len();
    if decoded.iter().any(|c| c.data.len() != data_len) {
        return Err(SssError::mismatched_shares(
            "all shares passed to combine must have the same data length",
        ));
    }

    let tables = FieldTables::build(w)?;

    // First occurrence of each x wins; duplicates are silently dropped.
    let mut seen = Vec::new();
    let mut unique = Vec::new();
    for c in &decoded {
        if !seen.contains(&c.id) {
            seen.push(c.id);
            unique.push(c);
        }
    }

    let chunk_lists: Vec<Vec<u32>> = unique
        .iter()
        .map(|c| chunk::data_hex_to_chunks(&c.data, w))
        .collect::<Result<_>>()?;

    let chunk_count = chunk_lists[0].len();
    if chunk_lists.iter().any(|c| c.len() != chunk_count) {
        return Err(SssError::mismatched_shares(
            "shares disagree on the number of chunks carried",
        ));
    }

    debug!(shares = unique.len(), at, bits = w, chunk_count, "combining shares");

    let mut result_chunks = Vec::with_capacity(chunk_count);
    for pos in 0..chunk_count {
        let points: Vec<PolyShare> = unique
            .iter()
            .zip(chunk_lists.iter())
            .map(|(c, chunks)| PolyShare { x: c.id, y: chunks[pos] })
            .collect();
        result_chunks.push(poly::combine_one_chunk(&points, at, &tables));
    }

    if at == 0 {
        chunk::decode_chunks(&result_chunks, w)
    } else {
        // Raw re-share payload: serialize per-chunk so a later `combine`
        // can split it back up via `data_hex_to_chunks`.
        Ok(chunk::chunks_to_data_hex(&result_chunks, w))
    }
}

/// Computes the share payload at `x = id` and encodes it as a share string.
pub fn new_share(id: u32, shares: &[&str]) -> Result<String> {
    if shares.is_empty() {
        return Err(SssError::invalid_parameter(
            "newShare requires at least one existing share",
        ));
    }
    if id == 0 {
        return Err(SssError::invalid_parameter(
            "share id must be a positive integer",
        ));
    }
    let w = share::decode_share(shares[0])?.w;
    let n_max = (1u32 << w) - 1;
    if id > n_max {
        return Err(SssError::between_inclusive("share id", 1, n_max as i64));
    }

    let data_hex = combine(shares, id)?;
    share::encode_share(w, id, &data_hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_then_combine_recovers_secret() {
        let mut ctx = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
        let shares = ctx.share("abc123", 5, 3, None).unwrap();
        assert_eq!(shares.len(), 5);
        for s in &shares {
            assert!(s.starts_with('8'));
        }
        let refs: Vec<&str> = shares[..3].iter().map(String::as_str).collect();
        assert_eq!(combine(&refs, 0).unwrap(), "abc123");
    }

    #[test]
    fn preserves_leading_zero_secret() {
        let mut ctx = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
        let shares = ctx.share("00000000", 5, 3, None).unwrap();
        let refs: Vec<&str> = shares[1..4].iter().map(String::as_str).collect();
        assert_eq!(combine(&refs, 0).unwrap(), "00000000");
    }

    #[test]
    fn mismatched_widths_are_rejected() {
        let mut ctx8 = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
        let s8 = ctx8.share("ff", 3, 2, None).unwrap();
        let mut ctx10 = Context::new(Some(10), Some(RngChoice::DeterministicTest)).unwrap();
        let s10 = ctx10.share("ff", 3, 2, None).unwrap();

        let mixed = vec![s8[0].as_str(), s10[0].as_str()];
        let err = combine(&mixed, 0).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::MismatchedSharesError);
    }

    #[test]
    fn new_share_is_consistent_with_combine() {
        let mut ctx = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
        let shares = ctx.share("ff", 5, 3, None).unwrap();
        let first_three: Vec<&str> = shares[..3].iter().map(String::as_str).collect();
        let n6 = new_share(6, &first_three).unwrap();

        let combo = vec![shares[1].as_str(), shares[2].as_str(), n6.as_str()];
        assert_eq!(combine(&combo, 0).unwrap(), "ff");
    }

    #[test]
    fn duplicate_share_ids_are_first_wins() {
        let mut ctx = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
        let shares = ctx.share("ab", 4, 3, None).unwrap();
        let with_dupe = vec![
            shares[0].as_str(),
            shares[1].as_str(),
            shares[0].as_str(),
            shares[2].as_str(),
        ];
        assert_eq!(combine(&with_dupe, 0).unwrap(), "ab");
    }

    #[test]
    fn rejects_threshold_above_share_count() {
        let mut ctx = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
        assert!(ctx.share("ab", 2, 3, None).is_err());
    }

    #[test]
    fn random_returns_requested_hex_length() {
        let hex = random(128).unwrap();
        assert_eq!(hex.len(), 32);
    }
}
