pub mod bridge;
mod detect;
mod factory;
pub mod memory;
pub mod proxy;
pub mod server;
pub mod traits;

pub use bridge::{
    CallbackHttp, FetchHttp, NativeCallback, NativeNotifier, NativePreferences, NativeTransport,
    ProxyBridge,
};
pub use detect::{
    Ambient, HOST_GLOBALS_ENV, HostEnvironment, ProcessAmbient, StaticAmbient, detect,
    detect_with,
};
pub use factory::create_host;
pub use memory::MemoryHost;
pub use proxy::ProxyHost;
pub use server::ServerHost;
pub use traits::{BoxFuture, HostCapabilities, TimeoutUnit};
