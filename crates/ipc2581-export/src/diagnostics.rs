//! Tolerable per-item failures
//!
//! A layout item that cannot be expressed is skipped with a [`SkipReason`];
//! the builder records it as a [`Diagnostic`] and keeps going.

use std::fmt;

use thiserror::Error;

use crate::builder::Stage;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("{what} has an empty arc list")]
    EmptyArcList { what: String },

    #[error("padstack '{padstack}' has no hole parameters")]
    MissingHoleParameters { padstack: String },

    #[error("padstack '{padstack}' {pad_use} pad on layer '{layer}' has no parameters")]
    NoPadParameters {
        padstack: String,
        layer: String,
        pad_use: &'static str,
    },

    #[error("unknown padstack definition '{0}'")]
    UnknownPadstack(String),

    #[error("padstack '{padstack}' has no pad on layer '{layer}'")]
    NoPadOnLayer { padstack: String, layer: String },

    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    #[error("unknown layer '{0}'")]
    UnknownLayer(String),
}

/// A skipped item together with the stage that skipped it
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub reason: SkipReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.reason)
    }
}
