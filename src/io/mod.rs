//! # IO Module - Trajectory Output
//!
//! Handles the one external interface this crate's core defines an output format
//! for: the CSV trajectory sink (§6). Single-replicate runs write directly;
//! multi-replicate batches fan all replicate workers into one dedicated writer
//! thread (`trajectory::spawn_writer`) so the file sees one writer at a time.

pub mod trajectory;
