//! # IO Module
//!
//! The HTTP boundary: Axum handlers that translate JSON requests into domain
//! calls and domain errors into status codes.

pub mod rest;
