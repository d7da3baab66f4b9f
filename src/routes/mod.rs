//! Route handlers. Each takes the raw query or body string and returns the
//! response body: JSON for data, an HTML error span otherwise.

pub mod cards;
pub mod config;
pub mod game;
pub mod storage;
pub mod util;
