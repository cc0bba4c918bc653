/// Environment variable sampled by [`Environment::from_env`].
pub const REDUCED_MOTION_ENV: &str = "VEIL_REDUCED_MOTION";

/// Host-level preferences sampled once and injected into controllers.
///
/// Controllers never re-query the host; they keep the snapshot they were
/// constructed with.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Environment {
    pub prefers_reduced_motion: bool,
}

impl Environment {
    #[inline]
    pub const fn new(prefers_reduced_motion: bool) -> Self {
        Self { prefers_reduced_motion }
    }

    /// Samples the process environment (`VEIL_REDUCED_MOTION`).
    pub fn from_env() -> Self {
        let prefers_reduced_motion = std::env::var(REDUCED_MOTION_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        if prefers_reduced_motion {
            log::info!("reduced motion requested; spoiler animation disabled");
        }

        Self { prefers_reduced_motion }
    }

    /// The rate cap actually applied: 0 under reduced motion.
    #[inline]
    pub fn effective_fps(self, configured: f64) -> f64 {
        if self.prefers_reduced_motion { 0.0 } else { configured }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "reduce"
    )
}
