use crate::env::State;
use crate::error::CoreError;

/// What happened to the agent during the physics steps since the last
/// decision, as classified by the external game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpEvent {
    /// Landed on the next platform not previously reached.
    Advanced,
    /// Dropped back onto an already-cleared platform.
    FellBack,
    /// Fell below the current platform.
    Died,
    /// Nothing terminal happened this cycle.
    None,
}

/// Reward configuration for the platformer variant.
///
/// The idle shaping is a function of the raw horizontal distance to the
/// target (in simulation units) and the viewport width, kept as a field so
/// callers can swap the formula without touching the adapter.
#[derive(Debug, Clone, Copy)]
pub struct JumpRewardTable {
    pub advanced: f64,
    pub fell_back: f64,
    pub died: f64,
    pub idle_shaping: fn(distance: f64, width: f64) -> f64,
}

/// Default distance-shaped idle penalty.
pub fn shaped_idle_penalty(distance: f64, width: f64) -> f64 {
    -((distance.abs() / width * 100.0 / 2.0).floor())
}

impl Default for JumpRewardTable {
    fn default() -> Self {
        Self {
            advanced: 50.0,
            fell_back: -5.0,
            died: -50.0,
            idle_shaping: shaped_idle_penalty,
        }
    }
}

/// Ordered sequence of platform x positions, lowest platform first.
///
/// Lookups past the generated content fail with [`CoreError::NoTarget`]
/// instead of indexing out of bounds.
#[derive(Debug, Clone, Default)]
pub struct PlatformTrack {
    xs: Vec<f64>,
}

impl PlatformTrack {
    pub fn new(xs: Vec<f64>) -> Self {
        Self { xs }
    }

    pub fn push(&mut self, x: f64) {
        self.xs.push(x);
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn x_at(&self, index: usize) -> Result<f64, CoreError> {
        self.xs.get(index).copied().ok_or(CoreError::NoTarget {
            index,
            len: self.xs.len(),
        })
    }

    /// The platform the agent should be steering toward: the one after the
    /// platform it currently stands on.
    pub fn next_target(&self, current: usize) -> Result<f64, CoreError> {
        self.x_at(current + 1)
    }
}

impl FromIterator<f64> for PlatformTrack {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            xs: iter.into_iter().collect(),
        }
    }
}

/// State/reward adapter for the platformer.
///
/// The external simulation pushes its observable snapshot in with
/// [`set_snapshot`](JumpStateSpace::set_snapshot); `observe` and `reward`
/// are then pure functions of that snapshot. No hidden counters.
#[derive(Debug, Clone)]
pub struct JumpStateSpace {
    width: f64,
    track: PlatformTrack,
    rewards: JumpRewardTable,
    agent_x: f64,
    current_platform: usize,
}

impl JumpStateSpace {
    pub fn new(
        width: f64,
        track: PlatformTrack,
        rewards: JumpRewardTable,
    ) -> Result<Self, CoreError> {
        if !(width > 0.0) {
            return Err(CoreError::DegenerateConfiguration(
                "viewport width must be positive",
            ));
        }
        Ok(Self {
            width,
            track,
            rewards,
            agent_x: 0.0,
            current_platform: 0,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn track(&self) -> &PlatformTrack {
        &self.track
    }

    /// Record the simulation's current observables.
    pub fn set_snapshot(&mut self, agent_x: f64, current_platform: usize) {
        self.agent_x = agent_x;
        self.current_platform = current_platform;
    }

    /// Normalized `(agent_x / width, target_x / width)`.
    ///
    /// The components are not clamped; an agent that wrapped past the
    /// viewport edge yields an out-of-range first component.
    pub fn observe(&self) -> Result<State, CoreError> {
        let target_x = self.track.next_target(self.current_platform)?;
        Ok(State(self.agent_x / self.width, target_x / self.width))
    }

    pub fn reward(&self, event: JumpEvent) -> Result<f64, CoreError> {
        let reward = match event {
            JumpEvent::Advanced => self.rewards.advanced,
            JumpEvent::FellBack => self.rewards.fell_back,
            JumpEvent::Died => self.rewards.died,
            JumpEvent::None => {
                let target_x = self.track.next_target(self.current_platform)?;
                let distance = self.agent_x - target_x;
                let shaped = (self.rewards.idle_shaping)(distance, self.width);
                tracing::trace!(distance, shaped, "idle reward");
                shaped
            }
        };
        Ok(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> JumpStateSpace {
        let track = PlatformTrack::new(vec![100.0, 220.0, 40.0]);
        JumpStateSpace::new(400.0, track, JumpRewardTable::default()).unwrap()
    }

    #[test]
    fn observe_normalizes_by_width() {
        let mut s = space();
        s.set_snapshot(100.0, 0);
        assert_eq!(s.observe().unwrap(), State(0.25, 0.55));
    }

    #[test]
    fn observe_past_generated_track_is_no_target() {
        let mut s = space();
        s.set_snapshot(100.0, 2);
        // next target would be index 3 on a 3-element track
        assert_eq!(s.observe(), Err(CoreError::NoTarget { index: 3, len: 3 }));
    }

    #[test]
    fn wrapped_agent_observes_without_panic() {
        let mut s = space();
        s.set_snapshot(-40.0, 0);
        let obs = s.observe().unwrap();
        assert!(obs.0 < 0.0);
    }

    #[test]
    fn zero_width_is_degenerate() {
        let err =
            JumpStateSpace::new(0.0, PlatformTrack::default(), JumpRewardTable::default())
                .unwrap_err();
        assert!(matches!(err, CoreError::DegenerateConfiguration(_)));
    }

    #[test]
    fn reward_ordering() {
        let mut s = space();
        // 12px from the target shapes to -floor(12/400*50) = -1
        s.set_snapshot(232.0, 0);
        let died = s.reward(JumpEvent::Died).unwrap();
        let fell = s.reward(JumpEvent::FellBack).unwrap();
        let idle = s.reward(JumpEvent::None).unwrap();
        let advanced = s.reward(JumpEvent::Advanced).unwrap();
        assert_eq!((died, fell, idle, advanced), (-50.0, -5.0, -1.0, 50.0));
        assert!(died < fell && fell < idle && idle < advanced);
    }

    #[test]
    fn idle_reward_scales_with_distance() {
        let mut s = space();
        s.set_snapshot(20.0, 0);
        // distance 200 -> -floor(200/400*50) = -25
        assert_eq!(s.reward(JumpEvent::None).unwrap(), -25.0);
    }

    #[test]
    fn idle_reward_past_track_is_no_target() {
        let mut s = space();
        s.set_snapshot(20.0, 2);
        assert_eq!(
            s.reward(JumpEvent::None),
            Err(CoreError::NoTarget { index: 3, len: 3 })
        );
    }

    #[test]
    fn track_is_bounds_checked() {
        let track: PlatformTrack = [10.0, 20.0, 30.0].into_iter().collect();
        assert_eq!(track.x_at(2).unwrap(), 30.0);
        assert_eq!(track.x_at(3), Err(CoreError::NoTarget { index: 3, len: 3 }));
    }
}
