//! Repository implementations for data access.

pub mod blog;

pub use blog::BlogRepository;
