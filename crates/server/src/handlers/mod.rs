//! HTTP request handlers.

pub mod assets;
pub mod health;
pub mod parents;
pub mod quotas;

pub use assets::*;
pub use health::*;
pub use parents::*;
pub use quotas::*;
