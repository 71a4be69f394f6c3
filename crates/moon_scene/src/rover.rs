//! Rover lifecycle.

use physics::RigidBodyHandle;

use crate::loader::LoadError;

/// Where the rover is in its lifecycle.
///
/// `Unloaded` is the normal state until the asset arrives; ticks in that
/// state (and after a failed load) do nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RoverState {
    #[default]
    Unloaded,
    /// Physics body exists and is integrated every tick.
    Active(RigidBodyHandle),
    LoadFailed(LoadError),
}

impl RoverState {
    pub fn is_active(&self) -> bool {
        matches!(self, RoverState::Active(_))
    }

    /// Physics handle while active.
    pub fn handle(&self) -> Option<RigidBodyHandle> {
        match self {
            RoverState::Active(handle) => Some(*handle),
            _ => None,
        }
    }
}
