//! Filesystem primitives.

pub mod atomic;

pub use atomic::JsonFileStore;
