pub mod tracking_viewmodel;
pub mod feed_viewmodel;
pub mod contrast_viewmodel;

pub use tracking_viewmodel::TrackingSession;
pub use feed_viewmodel::CrossingFeedPoller;
pub use contrast_viewmodel::BackgroundContrastSampler;
