pub mod conda;

pub use conda::CondaToolchain;
