//! The two batch stages (QR code generation and label sheet composition)
//! plus the shelf URL lookup the printed codes lead to.

pub mod composer;
pub mod generator;
pub mod logo;
pub mod resolver;
