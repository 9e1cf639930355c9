//! Connects an application that speaks only through ports to host
//! capabilities.
//!
//! Inbound messages are routed by a single dispatcher: `textToSVG` requests
//! render through a font cache that loads each font once, storage requests
//! go to a [`KeyValueStore`](storage::KeyValueStore). Zoom suppression and the
//! resize relay attach to an [`EventSource`](events::EventSource).

pub mod bridge;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod messages;
pub mod ports;
pub mod storage;
pub mod text_service;

pub use bridge::Bridge;
pub use config::Config;
pub use error::{Error, Result};
pub use messages::{Inbound, Outbound};
pub use ports::{AppPorts, BridgePorts, Outbox};
