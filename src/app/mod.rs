pub mod dispatch;

pub use dispatch::{dispatch, dispatch_with, execute, load_config};
