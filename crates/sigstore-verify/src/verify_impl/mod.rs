//! Building blocks of bundle verification

pub mod body;
pub mod chain;
pub mod content;
pub mod key;
pub mod sct;
pub mod timestamp;
pub mod tlog;
