pub mod ant;
pub mod memory;
pub mod relationships;
pub mod tasks;

pub use ant::Ant;
pub use memory::{Memory, MemoryKind, MemoryLog};
pub use relationships::{Relationship, RelationshipMap};
pub use tasks::TaskKind;
