// SPDX-License-Identifier: MPL-2.0
//! Video player for Flix.
//!
//! The player drives a platform [`MediaEngine`](crate::application::port::MediaEngine)
//! through [`PlayerStateMachine`], which owns every piece of transient UI
//! state: controls visibility, gesture overlays, the progress slider,
//! orientation and Picture-in-Picture. [`PlayerSession`] runs the machine
//! on a tokio task and publishes [`PlayerSnapshot`]s.

pub mod controls;
pub mod gestures;
pub mod machine;
pub mod message;
pub mod orientation;
pub mod pip;
pub mod progress;
pub mod session;
pub mod timer;
pub mod tracks;

pub use controls::ControlsVisibility;
pub use gestures::{DragGesture, DragTarget, SeekDirection};
pub use machine::{PlayerSnapshot, PlayerStateMachine, PlayerTimings};
pub use message::{ControlSignal, PlayerMessage};
pub use orientation::{DeviceOrientation, OrientationController};
pub use pip::PipController;
pub use progress::ProgressTracker;
pub use session::{PlayerHandle, PlayerSession};
