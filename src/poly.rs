// Copyright (c) 2016 rust-threshold-secret-sharing developers
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Polynomial kernel: Horner evaluation for sharing, Lagrange interpolation
//! for combination. Both operate chunk-at-a-time over GF(2^w).

use crate::error::Result;
use crate::field::FieldTables;
use crate::rng::{draw_nonzero_bits, RngProvider};

/// One point `(x, y)` on the sharing polynomial for a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share {
    pub x: u32,
    pub y: u32,
}

/// Splits one secret chunk into `n` shares under threshold `t`.
///
/// Draws `t - 1` random nonzero field elements as the polynomial's
/// higher-order coefficients, then evaluates `f(x) = s + c_1 x + ... +
/// c_{t-1} x^{t-1}` at `x = 1..=n` via Horner's method.
pub fn share_one_chunk(
    secret_chunk: u32,
    n: u32,
    t: u32,
    rng: &mut dyn RngProvider,
    tables: &FieldTables,
) -> Result<Vec<Share>> {
    let mut coefficients = Vec::with_capacity(t as usize);
    coefficients.push(secret_chunk);
    for _ in 1..t {
        let bits = draw_nonzero_bits(rng, tables.w() as usize)?;
        let c = u32::from_str_radix(&bits, 2).expect("bit string is valid base-2");
        coefficients.push(c);
    }

    let mut shares = Vec::with_capacity(n as usize);
    for x in 1..=n {
        let mut y = *coefficients.last().expect("threshold is at least 1");
        // Horner's method, highest-order coefficient first. When the
        // running accumulator is zero it is replaced directly by the next
        // coefficient, rather than multiplying zero by x through `fmul`.
        for &c in coefficients[..coefficients.len() - 1].iter().rev() {
            y = if y == 0 { c } else { tables.fadd(tables.fmul(y, x), c) };
        }
        shares.push(Share { x, y });
    }
    Ok(shares)
}

/// Evaluates the interpolating polynomial defined by `points` at `at`
/// (`at == 0` recovers the secret chunk; `at != 0` generates a new share).
pub fn combine_one_chunk(points: &[Share], at: u32, tables: &FieldTables) -> u32 {
    let n_max = tables.n_max();
    let mut acc = 0u32;

    for (i, pi) in points.iter().enumerate() {
        if pi.y == 0 {
            // A zero y contributes nothing regardless of the Lagrange
            // coefficient.
            continue;
        }

        let mut log_num = 0i64;
        let mut skip = false;
        for (j, pj) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            if at == pj.x {
                // Numerator factor (at XOR x_j) is zero: the whole term
                // vanishes.
                skip = true;
                break;
            }
            let numerator_factor = at ^ pj.x;
            let denominator_factor = pi.x ^ pj.x;
            log_num += tables.log_of(numerator_factor) as i64;
            log_num -= tables.log_of(denominator_factor) as i64;
        }
        if skip {
            continue;
        }

        let exponent = (((log_num % n_max as i64) + n_max as i64) % n_max as i64) as u32;
        let coefficient = tables.exp_of(exponent);
        acc = tables.fadd(acc, tables.fmul(pi.y, coefficient));
    }

    acc
}
