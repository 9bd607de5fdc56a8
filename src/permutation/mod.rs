pub mod cursor;
pub mod cycle_walk;
pub mod engine;
pub mod feistel;

pub use cursor::Cursor;
pub use cycle_walk::{worst_case_steps, CycleWalker, DEFAULT_WALK_LIMIT};
pub use engine::Permutation;
pub use feistel::{DomainBits, FeistelNetwork};
