// Server module entry
// Listener creation, connection handling, accept loop and signal handling

pub mod connection;
mod idle;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::run_site;
pub use signal::{start_signal_handler, SignalHandler};
