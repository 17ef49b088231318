pub mod world;

pub use world::{Colony, World};
