//! Service layer for tagfs.
//!
//! Services take the store as injected repository capabilities (never a
//! process-wide singleton) and perform all validation — existence checks,
//! color normalization, the cycle guard — before delegating writes.

pub mod files;
pub mod tags;

pub use files::FileService;
pub use tags::TagService;
