//! Storage module for canonical receipt payloads
//!
//! Each receipt is one pretty-printed JSON document under
//! `<data_dir>/receipts/<id>.json`. SQLite holds the searchable summary; the
//! payload is the source of truth for OCR text and per-field reasoning.

mod payload;

pub use payload::PayloadStore;
