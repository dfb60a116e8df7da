//! The local song library that imports land in.

mod songs;

pub use songs::*;

#[cfg(test)]
mod tests;
