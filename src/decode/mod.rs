//! Payload classifiers and decoders.
//!
//! Every function here is pure over `(id, bytes, context)`: unrecognised input yields an
//! `Unknown` kind or `None`, never an error.
pub(crate) mod bitmap;
pub(crate) mod markup;
pub(crate) mod member;
pub(crate) mod script;
pub(crate) mod shape;
pub(crate) mod sound;
pub(crate) mod text;
pub(crate) mod xmed;
