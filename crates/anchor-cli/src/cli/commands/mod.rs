mod dispatch;
pub mod events;
pub mod helpers;
pub mod init;
pub mod query;
pub mod submit;
pub mod verify;

pub use dispatch::dispatch;
