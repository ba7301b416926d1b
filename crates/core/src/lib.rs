//! Core domain logic for RegDesk.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `calculators` - Stateless financial calculators (EMI, SIP, tax, GST, ...)
//! - `blog` - Blog post domain and service over a repository trait
//! - `contact` - Contact form validation and lead notification text
//! - `chat` - Chat conversation validation
//! - `auth` - Admin credential check and password hashing
//! - `storage` - Image upload storage over OpenDAL

pub mod auth;
pub mod blog;
pub mod calculators;
pub mod chat;
pub mod contact;
pub mod storage;
