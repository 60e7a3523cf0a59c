//! Multipart boundary generation.

use crate::encoding::encode_base64url;
use crate::error::Result;
use rand::{CryptoRng, RngCore};

/// Number of random bytes behind a boundary (120 bits).
pub const BOUNDARY_BYTES: usize = 15;

/// Length of a generated boundary token.
pub const BOUNDARY_LEN: usize = 20;

/// Generates a multipart boundary from a cryptographically secure source.
///
/// The token is 15 random bytes encoded as unpadded base64url, so it only
/// contains `A-Z a-z 0-9 - _` and never needs quoting.
///
/// # Errors
///
/// Returns `Error::RandomSource` if the random source fails. There is no
/// fallback to a weaker source.
pub fn generate_boundary<R>(rng: &mut R) -> Result<String>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = [0u8; BOUNDARY_BYTES];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(encode_base64url(&bytes))
}
