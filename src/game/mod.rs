//! The word-guessing game.
//!
//! A hidden card is shown with its letters and digits masked. The player
//! guesses single characters and element thresholds to reveal parts of it,
//! then names the card. Pure game logic lives in `token`, `reveal`, `mask`,
//! `daily` and `session`; `snapshot` and `streak` persist it through a
//! [`snapshot::KeyValueStore`]; `state` and `play` hold the page-wide state
//! behind the WASM routes.

pub mod daily;
pub mod mask;
pub mod play;
pub mod results;
pub mod reveal;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod streak;
pub mod token;
