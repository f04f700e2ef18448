//! Core library for Atelier, an art-supply catalog browsing app.
//!
//! Holds everything below the UI layer: the remote catalog snapshot
//! ([`catalog`]), locally-persisted favorites with snapshot-copy semantics
//! ([`favorites`] over [`storage`]), free-text product lookup ([`lookup`]),
//! and the chat assistant that answers deterministically from local data
//! before falling back to a grounded generative-model call ([`chat`],
//! [`llm`]). Screens own their stores and reload persisted state on focus;
//! this crate performs no rendering and installs no global state.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod favorites;
pub mod llm;
pub mod lookup;
pub mod model;
pub mod storage;
pub mod upload;

pub use error::{AtelierError, Result};
