//! Inkpot - blog backend services
//!
//! This library provides the persistence-backed category and comment
//! services of a blogging platform: tagging articles into named groups,
//! and visitor comments with moderation and email notification. The HTTP
//! controller layer lives elsewhere; this crate exposes the services it
//! calls into.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
