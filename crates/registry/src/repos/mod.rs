//! Repository traits for registry operations.

pub mod assets;
pub mod parents;

pub use assets::AssetRepo;
pub use parents::ParentRepo;
