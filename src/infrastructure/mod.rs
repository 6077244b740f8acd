pub mod bluetooth;
pub mod events;
pub mod logging;
