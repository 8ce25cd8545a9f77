pub mod environment;

pub use environment::{
    Ambient, BoxFuture, HostCapabilities, HostEnvironment, ProxyBridge, create_host, detect,
    detect_with,
};
