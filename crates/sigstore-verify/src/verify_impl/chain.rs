//! Certificate chain construction and validation
//!
//! The bundle only carries the signing certificate, so the path to a trusted
//! root is rebuilt from each configured authority's chain. Every candidate
//! path is enumerated, the shortest one that reaches a root through at least
//! one trusted certificate is kept, and it is then checked structurally and
//! against the verification time.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sigstore_crypto::Certificate;
use sigstore_trust_root::{filter_cert_authorities, CertAuthority};

/// Upper bound on the number of certificates in a candidate path
const MAX_CHAIN_DEPTH: usize = 32;

/// Build and validate the path from `leaf` to a trusted root at `timestamp`.
///
/// Authorities valid at `timestamp` are tried in order and the first that
/// yields a valid path wins. The returned chain is leaf first and does not
/// repeat the self-signed root.
pub fn verify_certificate_chain(
    timestamp: DateTime<Utc>,
    leaf: &Certificate,
    authorities: &[CertAuthority],
) -> Result<Vec<Certificate>> {
    let candidates = filter_cert_authorities(authorities, timestamp);
    if candidates.is_empty() {
        return Err(Error::certificate(format!(
            "no certificate authority is valid at {}",
            timestamp
        )));
    }

    let mut last_error = None;
    for authority in &candidates {
        match verify_with_authority(timestamp, leaf, authority) {
            Ok(chain) => {
                tracing::debug!("certificate chain of length {} verified", chain.len());
                return Ok(chain);
            }
            Err(e) => {
                tracing::debug!("certificate authority rejected leaf: {}", e);
                last_error = Some(Box::new(e));
            }
        }
    }

    Err(Error::Certificate {
        message: "no certificate authority could verify the certificate chain".to_string(),
        cause: last_error,
    })
}

fn verify_with_authority(
    timestamp: DateTime<Utc>,
    leaf: &Certificate,
    authority: &CertAuthority,
) -> Result<Vec<Certificate>> {
    let chain = CertificatePool::new(&authority.chain, leaf).shortest_trusted_path()?;
    check_path(&chain)?;

    if let Some(cert) = chain.iter().find(|cert| !cert.valid_at(timestamp)) {
        return Err(Error::certificate(format!(
            "certificate {} is not valid at {}",
            cert.subject(),
            timestamp
        )));
    }

    Ok(chain)
}

/// Leaf plus the certificates of one trusted chain, deduplicated
struct CertificatePool<'a> {
    certs: Vec<Certificate>,
    trusted: &'a [Certificate],
    leaf: usize,
}

impl<'a> CertificatePool<'a> {
    fn new(trusted: &'a [Certificate], leaf: &Certificate) -> Self {
        let mut certs: Vec<Certificate> = Vec::with_capacity(trusted.len() + 1);
        for cert in trusted.iter().chain(std::iter::once(leaf)) {
            if !certs.contains(cert) {
                certs.push(cert.clone());
            }
        }
        let leaf = certs.iter().position(|c| c == leaf).unwrap_or(certs.len() - 1);
        Self {
            certs,
            trusted,
            leaf,
        }
    }

    /// Issuers of `certs[index]`: itself if it is a self-signed root,
    /// otherwise pool members selected by key identifier or name whose key
    /// verifies its signature.
    fn issuers(&self, index: usize) -> Vec<usize> {
        let cert = &self.certs[index];
        if cert.is_self_issued() && cert.verify_issued_by(cert) {
            return vec![index];
        }

        let authority_key_id = cert.authority_key_id();
        self.certs
            .iter()
            .enumerate()
            .filter(|(_, candidate)| {
                match (&authority_key_id, candidate.subject_key_id()) {
                    (Some(aki), Some(ski)) => *aki == ski,
                    _ => candidate.subject() == cert.issuer(),
                }
            })
            .filter(|(_, candidate)| cert.verify_issued_by(candidate))
            .map(|(i, _)| i)
            .collect()
    }

    /// Depth-first enumeration of every path from the leaf to a root.
    ///
    /// Paths are reported in the order a recursive search would find them,
    /// a certificate never appears twice on one path and paths longer than
    /// [`MAX_CHAIN_DEPTH`] are abandoned.
    fn root_paths(&self) -> Vec<Vec<usize>> {
        let mut complete = Vec::new();
        let mut stack = vec![vec![self.leaf]];

        while let Some(path) = stack.pop() {
            let Some(&current) = path.last() else {
                continue;
            };
            let issuers = self.issuers(current);
            // Reverse so the first issuer is explored first
            for &issuer in issuers.iter().rev() {
                if issuer == current {
                    complete.push(path.clone());
                } else if !path.contains(&issuer) && path.len() < MAX_CHAIN_DEPTH {
                    let mut next = path.clone();
                    next.push(issuer);
                    stack.push(next);
                }
            }
        }

        complete
    }

    fn shortest_trusted_path(&self) -> Result<Vec<Certificate>> {
        let mut best: Option<Vec<usize>> = None;
        for path in self.root_paths() {
            if !self.is_trusted(&path) {
                continue;
            }
            if best.as_ref().map_or(true, |b| path.len() < b.len()) {
                best = Some(path);
            }
        }

        let path = best.ok_or_else(|| Error::certificate("no trusted certificate path found"))?;
        Ok(path.into_iter().map(|i| self.certs[i].clone()).collect())
    }

    /// A path counts as trusted when one of the leaf's issuers on it comes
    /// from the authority's chain. A self-signed leaf is its own issuer.
    fn is_trusted(&self, path: &[usize]) -> bool {
        let issuers = if path.len() > 1 { &path[1..] } else { path };
        issuers
            .iter()
            .any(|&i| self.trusted.contains(&self.certs[i]))
    }
}

/// Structural checks on a leaf-first chain
fn check_path(chain: &[Certificate]) -> Result<()> {
    if chain.is_empty() {
        return Err(Error::certificate(
            "certificate chain must contain at least one certificate",
        ));
    }

    if !chain[1..].iter().all(Certificate::is_ca) {
        return Err(Error::certificate("intermediate certificate is not a CA"));
    }

    for pair in chain.windows(2).rev() {
        if pair[0].issuer() != pair[1].subject() {
            return Err(Error::certificate("incorrect certificate name chaining"));
        }
    }

    // A CA's path length bounds the intermediates below it, not the leaf
    for (i, cert) in chain.iter().enumerate() {
        if let Some(path_len) = cert.path_len_constraint() {
            if (path_len as usize) + 1 < i {
                return Err(Error::certificate("path length constraint exceeded"));
            }
        }
    }

    Ok(())
}
