// SPDX-License-Identifier: MPL-2.0
//! Screen orientation: rotate button, sensor readings and the lock.

use crate::application::port::ScreenOrientation;

/// Physical orientation derived from the rotation sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceOrientation {
    Landscape,
    Portrait,
    #[default]
    Undefined,
}

impl DeviceOrientation {
    /// Classifies a sensor angle in degrees. Negative angles (sensor flat or
    /// unknown) yield `None`.
    #[must_use]
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees < 0 {
            return None;
        }
        let orientation = match degrees {
            60..=120 | 240..=300 => DeviceOrientation::Landscape,
            301..=360 | 0..=30 | 150..=210 => DeviceOrientation::Portrait,
            _ => DeviceOrientation::Undefined,
        };
        Some(orientation)
    }
}

/// Orientation requests made on behalf of the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrientationController {
    locked: bool,
    /// Last explicit request from the rotate button.
    requested: Option<DeviceOrientation>,
    sensed: DeviceOrientation,
}

impl OrientationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn requested(&self) -> Option<DeviceOrientation> {
        self.requested
    }

    #[must_use]
    pub fn sensed(&self) -> DeviceOrientation {
        self.sensed
    }

    /// Flips the lock and returns the new state.
    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }

    /// Rotate button: force the opposite of the screen's current layout.
    pub fn rotate(&mut self, showing_landscape: bool) -> ScreenOrientation {
        if showing_landscape {
            self.requested = Some(DeviceOrientation::Portrait);
            ScreenOrientation::Portrait
        } else {
            self.requested = Some(DeviceOrientation::Landscape);
            ScreenOrientation::Landscape
        }
    }

    /// Handles a sensor reading.
    ///
    /// Only changes of the sensed orientation count. When the device is
    /// turned away from the last explicit request, control goes back to
    /// the sensor. Returns the request to make, if any.
    pub fn on_sensor(&mut self, degrees: i32) -> Option<ScreenOrientation> {
        let sensed = DeviceOrientation::from_degrees(degrees)?;
        if sensed == self.sensed {
            return None;
        }
        self.sensed = sensed;

        if self.locked || sensed == DeviceOrientation::Undefined {
            return None;
        }
        match self.requested {
            Some(requested) if requested != sensed => {
                self.requested = None;
                Some(ScreenOrientation::FollowSensor)
            }
            _ => None,
        }
    }
}
