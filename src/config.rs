use std::time::Duration;

/// Wall-clock time one gate takes to animate.
pub const ROTATION_DURATION: Duration = Duration::from_millis(100);

/// Number of recorded trail positions along one rotation path.
pub const TRAIL_STEPS: usize = 64;

/// Drift above this is counted as a normalization correction.
pub const STRICT_NORM_TOLERANCE: f64 = 1e-12;

/// How whitespace and commas inside a gate sequence are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeparatorPolicy {
    /// Reported and skipped like any other unknown character.
    #[default]
    Strict,
    /// Skipped silently.
    Ignore,
}

impl SeparatorPolicy {
    pub fn is_separator(c: char) -> bool {
        c.is_whitespace() || c == ','
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub rotation_duration: Duration,
    pub trail_steps: usize,
    pub separator_policy: SeparatorPolicy,
    pub strict_norm_tolerance: f64,
}

impl EngineConfig {
    pub fn with_rotation_duration(mut self, duration: Duration) -> Self {
        self.rotation_duration = duration;
        self
    }

    /// At least one step is always kept.
    pub fn with_trail_steps(mut self, steps: usize) -> Self {
        self.trail_steps = steps.max(1);
        self
    }

    pub fn with_separator_policy(mut self, policy: SeparatorPolicy) -> Self {
        self.separator_policy = policy;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rotation_duration: ROTATION_DURATION,
            trail_steps: TRAIL_STEPS,
            separator_policy: SeparatorPolicy::default(),
            strict_norm_tolerance: STRICT_NORM_TOLERANCE,
        }
    }
}
