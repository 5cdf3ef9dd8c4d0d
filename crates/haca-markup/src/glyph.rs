//! Glitch glyph generation

use rand::Rng;

/// Block glyphs opening a garbled span
pub const GARBLE_PREFIX: &str = "█▓▒░";

/// Block glyphs closing a garbled span
pub const GARBLE_SUFFIX: &str = "░▒▓█";

/// Number of random characters between prefix and suffix
pub const GARBLE_CORE_LEN: usize = 6;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Produce one garbled glyph run: prefix, six uppercase base-36 chars, suffix
pub fn garble<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut out = String::with_capacity(GARBLE_PREFIX.len() * 2 + GARBLE_CORE_LEN);
    out.push_str(GARBLE_PREFIX);
    for _ in 0..GARBLE_CORE_LEN {
        out.push(char::from(BASE36[rng.gen_range(0..BASE36.len())]));
    }
    out.push_str(GARBLE_SUFFIX);
    out
}

/// True if `s` has the exact shape [`garble`] produces
#[must_use]
pub fn is_garble(s: &str) -> bool {
    let Some(core) = s
        .strip_prefix(GARBLE_PREFIX)
        .and_then(|rest| rest.strip_suffix(GARBLE_SUFFIX))
    else {
        return false;
    };
    core.len() == GARBLE_CORE_LEN && core.bytes().all(|b| BASE36.contains(&b))
}
