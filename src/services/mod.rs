//! Service layer: persistence-backed operations the routes dispatch into.

pub mod auth;
pub mod design;
pub mod logs;
pub mod options;
pub mod schedule;
pub mod session;
pub mod tracker;
pub mod worker;
