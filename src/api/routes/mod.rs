//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod practice;
pub mod progress;
pub mod typo;
pub mod wordbank;
