use crate::math::Real;
use crate::query::DEFAULT_CONTACT_BREAKING_THRESHOLD;

/// Parameters for a time-step of the dynamics world.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct IntegrationParameters {
    /// The length of the fixed sub-steps (default: `1.0 / 60.0`).
    pub fixed_time_step: Real,
    /// The maximum number of sub-steps performed by a single call to `step_simulation`
    /// (default: `1`).
    ///
    /// Zero makes every step a single variable-length sub-step.
    pub max_sub_steps: usize,
    /// The number of iterations of the constraint solver (default: `10`).
    pub solver_iterations: usize,
    /// The ratio of the penetration corrected at each sub-step (default: `0.2`).
    pub erp: Real,
    /// The ratio of the previous impulses reapplied at the beginning of a solve
    /// (default: `0.85`).
    pub warmstarting_factor: Real,
    /// Whether each island is solved separately (default: `true`).
    pub split_islands: bool,
    /// The time a body must stay at rest before falling asleep (default: `2.0`).
    ///
    /// Zero disables sleeping.
    pub deactivation_time: Real,
    /// Prevents all bodies from falling asleep (default: `false`).
    pub disable_deactivation: bool,
    /// The distance beyond which cached contacts are dropped (default: `0.02`).
    pub contact_breaking_threshold: Real,
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self {
            fixed_time_step: 1.0 / 60.0,
            max_sub_steps: 1,
            solver_iterations: 10,
            erp: 0.2,
            warmstarting_factor: 0.85,
            split_islands: true,
            deactivation_time: 2.0,
            disable_deactivation: false,
            contact_breaking_threshold: DEFAULT_CONTACT_BREAKING_THRESHOLD,
        }
    }
}
