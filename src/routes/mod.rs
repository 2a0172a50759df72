//! Route modules for the bookkeeping engine

pub mod auth;
pub mod businesses;
pub mod health;
pub mod receipts;
pub mod upload;
