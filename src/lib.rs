pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod listener;

pub use config::Config;
pub use event::InboundEvent;
pub use listener::{Listener, ListenerOptions, Outcome};
