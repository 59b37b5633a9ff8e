//! Session registry backend.

mod memory;

pub use memory::InMemoryCache;
