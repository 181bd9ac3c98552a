//! First-person locomotion & inventory controller
//!
//! Movement, mouse-look, jumping, footstep scheduling, ammo/health and the
//! pointer lock for a single character. The controller is driven by a host
//! (the Bevy client, or a test) through explicit tick calls and answers with
//! `ControllerEvent`s; it never touches physics, audio or rendering itself.

pub mod config;
pub mod contact;
pub mod controller;
pub mod cursor;
pub mod footsteps;
pub mod grounding;
pub mod inventory;
pub mod orientation;
pub mod player;
pub mod signals;

pub use config::*;
pub use contact::*;
pub use controller::*;
pub use cursor::*;
pub use footsteps::*;
pub use grounding::*;
pub use inventory::*;
pub use orientation::*;
pub use player::*;
pub use signals::*;
