//! Signed note and checkpoint parsing.
//!
//! Transparency logs publish their state as a signed note
//! (golang.org/x/mod/sumdb/note): a text body, a blank line, then one
//! signature line per signer:
//!
//! ```text
//! <origin>
//! <tree_size>
//! <root_hash_base64>
//! [extra lines]
//!
//! — <signer_name> <base64(key_hint || signature)>
//! ```
//!
//! Signature lines begin with the Unicode em dash (U+2014). Lines after the
//! separator that do not have that shape are skipped, so a note may carry
//! annotations alongside its signatures.

use crate::{Error, Result};
use base64::Engine;

const SIGNATURE_PREFIX: &str = "\u{2014} ";

/// One signature line of a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSignature {
    /// Signer identity (text between the em dash and the signature)
    pub name: String,
    /// First four bytes of the decoded signature, identifying the key
    pub key_hint: [u8; 4],
    /// Signature bytes following the key hint
    pub signature: Vec<u8>,
}

impl NoteSignature {
    /// Parse a signature line, returning `None` when the line does not have
    /// the `— <name> <base64>` shape.
    pub fn from_line(line: &str) -> Option<Self> {
        let rest = line.strip_prefix(SIGNATURE_PREFIX)?;
        let (name, encoded) = rest.rsplit_once(' ')?;
        if name.is_empty() || name.contains(char::is_whitespace) {
            return None;
        }
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .ok()?;
        if decoded.len() < 5 {
            return None;
        }
        let mut key_hint = [0u8; 4];
        key_hint.copy_from_slice(&decoded[..4]);
        Some(NoteSignature {
            name: name.to_string(),
            key_hint,
            signature: decoded[4..].to_vec(),
        })
    }
}

/// A note split into its signed text and its signatures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedNote {
    /// Text before the blank line separator
    pub note: String,
    /// Parsed signature lines
    pub signatures: Vec<NoteSignature>,
}

impl SignedNote {
    /// Parse a signed note. At least one well-formed signature line is required.
    pub fn from_text(text: &str) -> Result<Self> {
        let (note, signature_block) = text
            .split_once("\n\n")
            .ok_or_else(|| Error::Checkpoint("missing blank line separator".to_string()))?;

        let signatures: Vec<NoteSignature> = signature_block
            .lines()
            .filter_map(NoteSignature::from_line)
            .collect();

        if signatures.is_empty() {
            return Err(Error::Checkpoint("no signatures found in note".to_string()));
        }

        Ok(SignedNote {
            note: note.to_string(),
            signatures,
        })
    }

    /// Bytes covered by every signature: the note text plus its final newline
    pub fn signed_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.note.len() + 1);
        data.extend_from_slice(self.note.as_bytes());
        data.push(b'\n');
        data
    }

    /// Parse the note text as a log checkpoint
    pub fn checkpoint(&self) -> Result<LogCheckpoint> {
        LogCheckpoint::from_text(&self.note)
    }
}

/// Log state carried in a checkpoint note body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCheckpoint {
    pub origin: String,
    pub tree_size: u64,
    pub root_hash: Vec<u8>,
    /// Lines after the root hash, kept verbatim
    pub extra: Vec<String>,
}

impl LogCheckpoint {
    /// Parse `origin`, decimal tree size and base64 root hash from the first
    /// three lines.
    pub fn from_text(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() < 3 {
            return Err(Error::Checkpoint(format!(
                "checkpoint needs at least 3 lines, found {}",
                lines.len()
            )));
        }

        let origin = lines[0];
        if origin.is_empty() {
            return Err(Error::Checkpoint("empty origin".to_string()));
        }

        let tree_size = lines[1]
            .parse::<u64>()
            .map_err(|_| Error::Checkpoint(format!("invalid tree size: {}", lines[1])))?;

        let root_hash = base64::engine::general_purpose::STANDARD
            .decode(lines[2])
            .map_err(|e| Error::Checkpoint(format!("invalid root hash base64: {}", e)))?;

        Ok(LogCheckpoint {
            origin: origin.to_string(),
            tree_size,
            root_hash,
            extra: lines[3..].iter().map(|l| l.to_string()).collect(),
        })
    }
}
