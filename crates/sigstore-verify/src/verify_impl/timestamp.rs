//! RFC 3161 timestamp verification against trusted timestamp authorities

use super::chain::verify_certificate_chain;
use crate::error::{Error, Result};
use sigstore_trust_root::{filter_cert_authorities, CertAuthority};
use sigstore_tsa::ParsedTimestamp;

/// Verify that `token` timestamps `data` and was issued by one of the
/// trusted authorities.
///
/// Candidates are the authorities valid at the token's time whose leaf is
/// the signer named by the token. The first candidate whose chain and
/// signature both verify is accepted.
pub fn verify_rfc3161_timestamp(
    token: &ParsedTimestamp,
    data: &[u8],
    authorities: &[CertAuthority],
) -> Result<()> {
    let time = token.time();
    let candidates: Vec<CertAuthority> = filter_cert_authorities(authorities, time)
        .into_iter()
        .filter(|ca| ca.chain.first().map_or(false, |leaf| token.is_signed_by(leaf)))
        .collect();

    if candidates.is_empty() {
        return Err(Error::timestamp(format!(
            "no timestamp authority matches the token signer at {}",
            time
        )));
    }

    let mut last_error = None;
    for authority in candidates {
        match verify_with_authority(token, data, authority) {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::debug!("timestamp authority rejected token: {}", e);
                last_error = Some(Box::new(e));
            }
        }
    }

    Err(Error::Timestamp {
        message: "no timestamp authority could verify the token".to_string(),
        cause: last_error,
    })
}

fn verify_with_authority(
    token: &ParsedTimestamp,
    data: &[u8],
    authority: CertAuthority,
) -> Result<()> {
    let leaf = authority
        .chain
        .first()
        .cloned()
        .ok_or_else(|| Error::timestamp("timestamp authority has no certificates"))?;

    verify_certificate_chain(token.time(), &leaf, std::slice::from_ref(&authority))?;

    token
        .verify(data, &leaf)
        .map_err(|e| Error::timestamp(e.to_string()))
}
