mod directory;
pub use directory::*;
