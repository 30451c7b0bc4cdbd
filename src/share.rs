// Copyright (c) 2016 rust-threshold-secret-sharing developers
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Share codec: encodes and decodes the public `<W><ID><DATA>` share
//! string. The grammar is a single tagged character followed by two hex
//! runs, small and fixed enough that a hand-checked parse reads more
//! plainly than a `regex` dependency would for one pattern.

use crate::error::{Result, SssError};
use crate::field::{MAX_WIDTH, MIN_WIDTH};

/// Components of a decoded share string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareComponents {
    pub w: u8,
    pub id: u32,
    pub data: String,
}

fn n_max_for(w: u8) -> u32 {
    (1u32 << w) - 1
}

/// Number of hex characters needed to represent `n_max` without a leading
/// zero, i.e. `ceil(log16(n_max))`.
fn id_hex_len(n_max: u32) -> usize {
    format!("{n_max:x}").len()
}

fn width_to_base36(w: u8) -> char {
    std::char::from_digit(w as u32, 36)
        .expect("w fits in a single base-36 digit")
        .to_ascii_uppercase()
}

fn base36_to_width(c: char) -> Result<u8> {
    let value = c.to_digit(36).ok_or_else(|| {
        SssError::invalid_share(format!(
            "share string must start with a base-36 width tag, found '{c}'"
        ))
    })?;
    if !(MIN_WIDTH as u32..=MAX_WIDTH as u32).contains(&value) {
        return Err(SssError::between_inclusive(
            "bits",
            MIN_WIDTH as i64,
            MAX_WIDTH as i64,
        ));
    }
    Ok(value as u8)
}

/// Encodes `(w, id, data_hex)` into the canonical share string.
pub fn encode_share(w: u8, id: u32, data_hex: &str) -> Result<String> {
    let n_max = n_max_for(w);
    if id == 0 || id > n_max {
        return Err(SssError::between_inclusive("share id", 1, n_max as i64));
    }
    let id_len = id_hex_len(n_max);
    let mut out = String::with_capacity(1 + id_len + data_hex.len());
    out.push(width_to_base36(w));
    out.push_str(&format!("{id:0id_len$x}"));
    out.push_str(data_hex);
    Ok(out)
}

/// Decodes a share string into its `(w, id, data_hex)` components.
pub fn decode_share(share_str: &str) -> Result<ShareComponents> {
    let mut chars = share_str.chars();
    let tag = chars.next().ok_or_else(|| {
        SssError::invalid_share("share string is empty; expected a width tag")
    })?;
    let w = base36_to_width(tag)?;

    let n_max = n_max_for(w);
    let id_len = id_hex_len(n_max);
    let rest = &share_str[tag.len_utf8()..];

    if rest.len() <= id_len {
        return Err(SssError::invalid_share(format!(
            "share string is too short: expected a {id_len}-character share id followed by data"
        )));
    }
    let (id_hex, data) = rest.split_at(id_len);
    if !id_hex.bytes().all(|b| b.is_ascii_hexdigit())
        || !data.bytes().all(|b| b.is_ascii_hexdigit())
        || data.is_empty()
    {
        return Err(SssError::invalid_share(
            "share string does not match the expected <width><id><data> hex grammar",
        ));
    }

    let id = u32::from_str_radix(id_hex, 16)
        .map_err(|_| SssError::invalid_share("share id is not valid hex"))?;
    if id == 0 || id > n_max {
        return Err(SssError::between_inclusive("share id", 1, n_max as i64));
    }

    Ok(ShareComponents {
        w,
        id,
        data: data.to_string(),
    })
}
