//! GAVEL: bidding engine for sequential collection auctions
//!
//! Library crate exposing all modules for use by integration tests
//! and the replay binary.

pub mod config;
pub mod types;
pub mod strategy;
pub mod storage;
pub mod replay;
