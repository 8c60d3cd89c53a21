//! Network I/O: documents, single-file artifacts and Direct6 pieces.

pub mod chunked;
pub mod download;
