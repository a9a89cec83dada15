//! Headless rendition of the Acme Blogs page: pick a user, see their posts
//! with author details, and expand each post's comments.

pub mod config;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod listeners;
pub mod page;
pub mod render;
pub mod serializable;
#[cfg(test)]
mod testing;
pub mod toggle;
