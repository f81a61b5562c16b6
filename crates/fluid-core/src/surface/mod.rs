// # Style Host Implementations
//
// This module provides implementations of the StyleHost trait.

pub mod memory;

pub use memory::MemoryStyleHost;
