pub mod chat;
pub mod context;
pub mod event_bus;
pub mod persist;
pub mod pool;
pub mod ports;
pub mod store;
pub mod summarize;
