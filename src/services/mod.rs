pub mod api_client;
pub mod geolocation;
pub mod ping_dispatcher;
pub mod network_monitor;

pub use api_client::{ApiClient, CrossingApi};
pub use geolocation::{BrowserGeolocation, PositionSampler, WatchHandle};
pub use ping_dispatcher::PingDispatcher;
pub use network_monitor::{NetworkMonitor, NetworkStatus};
