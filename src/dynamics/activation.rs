/// The sleep and wake state of a rigid body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ActivationState {
    /// The body is awake and simulated.
    #[default]
    Active = 1,
    /// The body, and its whole island, is asleep.
    IslandSleeping = 2,
    /// The body has been at rest long enough and may fall asleep with its island.
    WantsDeactivation = 3,
    /// The body never falls asleep.
    DisableDeactivation = 4,
    /// The body is neither simulated nor woken up by its neighbors.
    DisableSimulation = 5,
}

impl ActivationState {
    /// Is a body with this state simulated?
    #[inline]
    pub fn is_active(self) -> bool {
        self != ActivationState::IslandSleeping && self != ActivationState::DisableSimulation
    }

    /// Can this state be overridden by the automatic sleep/wake transitions?
    #[inline]
    pub fn is_forced(self) -> bool {
        self == ActivationState::DisableDeactivation || self == ActivationState::DisableSimulation
    }
}
