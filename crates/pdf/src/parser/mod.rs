//! PDF decoding: the lopdf backend and the content-stream walker that turns
//! page operators into [`PositionedTextItem`](crate::PositionedTextItem)s.

pub mod backend;
pub mod extract;
