pub mod location;
pub mod crossing;
pub mod notification;
pub mod contrast;

pub use location::{PositionReading, SamplingOptions, PingRequest, PingAck, NewCrossing};
pub use crossing::CrossingSummary;
pub use notification::{UnreadCountResponse, UnreadCounter};
pub use contrast::{Rgba, ProbedElement, Shade, EdgeSpan, ContrastSample};
