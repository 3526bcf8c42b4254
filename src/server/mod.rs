// Server module entry
// Listener setup, connection handling, accept loop and signal-driven shutdown

pub mod connection;
pub mod listener;
pub mod serve;
pub mod signal;

// Re-export commonly used items
pub use listener::create_listener;
pub use serve::run;
pub use signal::{start_signal_handler, SignalHandler};
