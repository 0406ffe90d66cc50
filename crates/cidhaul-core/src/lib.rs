//! Identifier recognition, document walking, and content
//! classification for content-addressed assets.
//!
//! Everything in this crate is pure: no I/O, no network, no clocks.
//! The traversal engine in `cidhaul-engine` composes these pieces
//! around a gateway fetcher and a content store.

mod cid;
mod scan;
mod sniff;
mod walk;

pub use cid::{Cid, ParseCidError};
pub use scan::{find_cids, scan_text};
pub use sniff::{FileKind, sniff};
pub use walk::{discover, walk_json, walk_text};
