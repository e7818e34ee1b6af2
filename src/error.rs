//! Soft errors: content and configuration problems.
//!
//! Engine invariant violations (double start, unbound state access, ...) are
//! not represented here; they abort through `assert!`/`panic!` at the point
//! of detection.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("scenario declares no maps")]
    NoMaps,

    #[error("unknown ground symbol '{symbol}' in map '{map}'")]
    UnknownGroundSymbol { map: String, symbol: char },

    #[error("unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },

    #[error("unknown capability '{0}'")]
    UnknownCapability(String),

    #[error("unknown carried object action '{0}'")]
    UnknownCarriedObjectAction(String),
}

pub type Result<T> = std::result::Result<T, Error>;
