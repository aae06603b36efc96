//! Navigation and input control for panorama scenes.
//!
//! Platform-free: the web frontend feeds browser events into a [`Session`]
//! and performs the [`Effect`]s it returns. Everything here runs on the host
//! for tests.

pub mod animation;
pub mod camera;
pub mod capability;
pub mod constants;
pub mod controls;
pub mod dispatcher;
pub mod error;
pub mod frame;
pub mod model;
pub mod navigation;
pub mod permission;
pub mod picking;
pub mod registry;
pub mod scene;
pub mod session;

pub use animation::*;
pub use camera::*;
pub use capability::*;
pub use constants::*;
pub use controls::*;
pub use dispatcher::*;
pub use error::*;
pub use frame::*;
pub use model::*;
pub use navigation::*;
pub use permission::*;
pub use picking::*;
pub use registry::*;
pub use scene::*;
pub use session::*;
