//! Host transport between the launcher and the privileged browser side.

pub mod channel;
pub mod contract;
pub mod handler;
pub mod snapshot;
pub mod stdio;

pub use channel::{HostClient, HostServer, host_channel};
pub use handler::{BookmarkNode, PlatformHandler, RequestHandler};
pub use snapshot::{PlatformAction, Snapshot, SnapshotPlatform};
