pub mod host;
pub mod storage;

#[cfg(test)]
mod tests;

pub use host::HeadlessHost;
pub use storage::MemoryStorage;
