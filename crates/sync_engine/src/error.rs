//! Sync engine error types

use contracts::ContractError;
use thiserror::Error;

/// Sync engine specific error
///
/// Ordinary anomalies (gaps, dangling references, missing cameras) are not
/// errors: they degrade to "no active shot" or "no propagation". Propagation
/// needs no runtime guard since a notification makes at most one hop.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Result alias
pub type Result<T> = std::result::Result<T, SyncError>;
