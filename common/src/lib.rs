//! Wire types shared between the measurement engine and the control-channel
//! transport that carries it. No logic lives here, only serde shapes.

pub mod control;
pub mod options;
pub mod result;

pub use control::ControlEnvelope;
pub use options::{
    DnsOptions, HttpOptions, MeasurementOptions, MeasurementRequest, MtrOptions, PingOptions,
    TracerouteOptions,
};
pub use result::{
    DnsAnswer, DnsResult, DnsValue, Hop, HopStats, HttpResult, PingResult, PingStats,
    ResultEnvelope, Timings, TlsCertificateView, TracerouteResult,
};
