//! Network Layer
//!
//! HTTP plumbing between the session components and the REST backend:
//! transport, wire format, endpoint selection and liveness probing.

pub mod endpoint;
pub mod monitor;
pub mod protocol;
pub mod transport;

pub use endpoint::EndpointResolver;
pub use monitor::{ConnectionMonitor, ConnectionStatus};
pub use protocol::{
    ApiReply, AuthRequest, AuthResponse, Board, GameState, Liveness, MoveRequest,
    NewGameRequest,
};
pub use transport::{ReqwestTransport, Transport};
