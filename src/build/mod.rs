//! Writers: the classic container writer and synthetic payload builders whose output the
//! readers in this crate parse back.

pub(crate) mod container;
pub(crate) mod library;
pub(crate) mod options;
pub(crate) mod script;
pub(crate) mod shape;
