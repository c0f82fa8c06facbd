//! Tap the targets before they vanish
//!
//! A target spawns every 1.5s at a random spot and expires 3s later.
//! Positions are percentages of the play area.

use std::ops::Range;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::timers::{TimerKind, TimerRegistry};

pub const SPAWN_INTERVAL: Duration = Duration::from_millis(1500);
pub const TARGET_LIFETIME: Duration = Duration::from_secs(3);

/// Horizontal spawn band, percent of width
pub const X_RANGE: Range<f64> = 10.0..80.0;
/// Vertical spawn band, percent of height
pub const Y_RANGE: Range<f64> = 20.0..70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub spawned_at: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TapTargets {
    targets: Vec<Target>,
    score: u32,
    next_id: u32,
}

impl TapTargets {
    pub fn start(timers: &mut TimerRegistry, now: Instant) -> Self {
        timers.schedule_every(TimerKind::TargetSpawn, now, SPAWN_INTERVAL);
        Self {
            targets: Vec::new(),
            score: 0,
            next_id: 0,
        }
    }

    /// Place a new target and arm its expiry
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, timers: &mut TimerRegistry, at: Instant) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.targets.push(Target {
            id,
            x: rng.gen_range(X_RANGE),
            y: rng.gen_range(Y_RANGE),
            spawned_at: at,
        });
        timers.schedule_once(TimerKind::TargetExpiry(id), at, TARGET_LIFETIME);
        id
    }

    /// Remove a target whose time ran out
    pub fn expire(&mut self, id: u32) {
        self.targets.retain(|t| t.id != id);
    }

    /// Hit a target. Returns false if it was already gone.
    pub fn tap(&mut self, id: u32, timers: &mut TimerRegistry) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.id != id);
        if self.targets.len() == before {
            return false;
        }
        timers.cancel_kind(TimerKind::TargetExpiry(id));
        self.score += 1;
        true
    }

    /// Live targets, oldest first
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drive(
        game: &mut TapTargets,
        timers: &mut TimerRegistry,
        rng: &mut StdRng,
        now: Instant,
    ) {
        while let Some(fire) = timers.poll_due(now) {
            match fire.kind {
                TimerKind::TargetSpawn => {
                    game.spawn(rng, timers, fire.deadline);
                }
                TimerKind::TargetExpiry(id) => game.expire(id),
                other => panic!("unexpected timer {:?}", other),
            }
        }
    }

    #[test]
    fn test_spawns_every_interval_inside_region() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = TapTargets::start(&mut timers, start);

        drive(&mut game, &mut timers, &mut rng, start + Duration::from_millis(2999));
        assert_eq!(game.targets().len(), 1);

        drive(&mut game, &mut timers, &mut rng, start + Duration::from_millis(3000));
        assert_eq!(game.targets().len(), 2);

        for target in game.targets() {
            assert!(X_RANGE.contains(&target.x));
            assert!(Y_RANGE.contains(&target.y));
        }
    }

    #[test]
    fn test_targets_expire_after_lifetime() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = TapTargets::start(&mut timers, start);

        // Spawned at 1.5s, 3s, 4.5s; the first expires at 4.5s
        drive(&mut game, &mut timers, &mut rng, start + Duration::from_millis(4500));
        let ids: Vec<u32> = game.targets().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_tap_scores_and_removes() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = TapTargets::start(&mut timers, start);

        drive(&mut game, &mut timers, &mut rng, start + Duration::from_millis(1500));
        let id = game.targets()[0].id;

        assert!(game.tap(id, &mut timers));
        assert_eq!(game.score(), 1);
        assert!(game.targets().is_empty());
        assert!(!timers.is_active(TimerKind::TargetExpiry(id)));

        assert!(!game.tap(id, &mut timers));
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_no_cap_on_live_targets() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = TapTargets::start(&mut timers, start);

        for i in 0..50 {
            game.spawn(&mut rng, &mut timers, start + Duration::from_millis(i));
        }
        assert_eq!(game.targets().len(), 50);
    }
}
