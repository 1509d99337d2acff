pub mod byte_stream;
pub mod config;
pub mod errors;
pub mod flags;
pub mod reassembler;
pub mod receiver;
pub mod segment;
pub mod sender;
pub mod state;
pub mod timer;
pub mod wrap32;

// -- Re-export structs for more concise usage

pub use byte_stream::ByteStream;
pub use config::TcpConfig;
pub use errors::TcpError;
pub use flags::TcpFlags;
pub use reassembler::Reassembler;
pub use receiver::TcpReceiver;
pub use segment::TcpSegment;
pub use sender::TcpSender;
pub use state::{ReceiverState, SenderState};
pub use wrap32::Wrap32;
