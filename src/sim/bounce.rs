//! Rigid-disc bounce simulation
//!
//! A small fixed set of circular bodies inside a rectangular arena: repelled
//! by pointer proximity, colliding elastically with each other and the
//! walls, optionally tracked against a collision goal.
//!
//! Per-step order matters and is fixed: pairwise collision resolution, then
//! integration and wall bounce. Pointer repulsion is event-driven through
//! [`BounceSim::pointer_move`], not part of the step.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Arena, Body};
use super::math;
use crate::config::BounceConfig;
use crate::consts::FRAME_DT;

/// Session phase for the goal-tracking variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Bodies scattered and motionless, waiting for a start
    Idle,
    /// Active simulation
    Running,
    /// Goal reached; velocities frozen until the reset delay fires
    Finished,
}

/// Notifications for the host's goal/UI sink, drained per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Started,
    /// Normalized goal progress in `0..=1`
    Progress(f32),
    Finished { elapsed_secs: f32 },
    /// The post-finish delay fired and the session returned to idle
    Reset,
}

/// An owning session: all bodies, bounds and phase live here, so multiple
/// instances can run side by side and tests construct them directly.
pub struct BounceSim {
    config: BounceConfig,
    arena: Arena,
    bodies: Vec<Body>,
    phase: Phase,
    collision_count: u32,
    /// Sim-time seconds advanced by `step`; the debounce and reset clocks
    clock: f32,
    run_started_at: f32,
    /// Last counted collision per unordered pair `(i, j)` with `i < j`.
    /// Entries are never removed; body ordering is stable for the session.
    last_counted: HashMap<(usize, usize), f32>,
    /// Clock deadline for the pending post-finish reset
    reset_at: Option<f32>,
    rng: Pcg32,
    events: Vec<SessionEvent>,
}

impl BounceSim {
    /// Build a session from the measured boxes of the rendered marks.
    ///
    /// With a goal configured the session starts idle; with `goal == 0` it
    /// free-runs immediately, matching the always-on page effect.
    pub fn new(arena: Arena, sizes: &[Vec2], config: BounceConfig, seed: u64) -> Self {
        let bodies = sizes
            .iter()
            .map(|&size| Body::new(size, config.radius_fraction))
            .collect();
        let free_running = config.goal == 0;

        let mut sim = Self {
            config,
            arena,
            bodies,
            phase: Phase::Idle,
            collision_count: 0,
            clock: 0.0,
            run_started_at: 0.0,
            last_counted: HashMap::new(),
            reset_at: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };

        if free_running {
            sim.scatter(true);
            sim.phase = Phase::Running;
        } else {
            sim.scatter(false);
        }
        sim
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn collision_count(&self) -> u32 {
        self.collision_count
    }

    /// Normalized goal progress; 0.0 when no goal is configured
    pub fn progress(&self) -> f32 {
        if self.config.goal == 0 {
            0.0
        } else {
            self.collision_count as f32 / self.config.goal as f32
        }
    }

    /// Seconds of stepped time since the current run started
    pub fn elapsed_secs(&self) -> f32 {
        self.clock - self.run_started_at
    }

    /// Drain events produced since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a run. Cancels any pending reset; no-op unless idle.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.reset_at = None;
        self.collision_count = 0;
        self.last_counted.clear();
        self.run_started_at = self.clock;
        for body in &mut self.bodies {
            body.vel = random_scatter_vel(&mut self.rng, self.config.scatter_speed);
        }
        self.phase = Phase::Running;
        self.events.push(SessionEvent::Started);
        log::debug!("bounce session started ({} bodies)", self.bodies.len());
    }

    /// Explicit lifecycle stop: freeze everything and return to idle.
    /// The host calls this before unmounting instead of relying on teardown.
    pub fn stop(&mut self) {
        self.reset_at = None;
        for body in &mut self.bodies {
            body.vel = Vec2::ZERO;
        }
        self.phase = Phase::Idle;
    }

    /// Replace the arena bounds and fully reset derived state. Partial
    /// adjustment would leave stale positions against new bounds, so this
    /// re-scatters instead.
    pub fn resize(&mut self, arena: Arena) {
        self.arena = arena;
        self.reset_at = None;
        self.collision_count = 0;
        self.last_counted.clear();
        let free_running = self.config.goal == 0;
        self.scatter(free_running);
        self.phase = if free_running {
            Phase::Running
        } else {
            Phase::Idle
        };
        log::debug!("bounce arena resized to {}x{}", arena.width, arena.height);
    }

    /// Pointer proximity repulsion, applied on the host's pointer-move
    /// event. Bodies within the threshold get pushed away from the pointer,
    /// scaled linearly toward zero at the threshold edge. A pointer exactly
    /// on a body center applies no force.
    pub fn pointer_move(&mut self, pointer: Vec2) {
        if self.phase != Phase::Running {
            return;
        }
        let threshold = self.config.repel_threshold;
        for body in &mut self.bodies {
            let dist = pointer.distance(body.center());
            if dist >= threshold {
                continue;
            }
            let Some(normal) = math::contact_normal(pointer, body.center()) else {
                continue;
            };
            let force = (threshold - dist) / threshold;
            body.vel -= normal * force * self.config.repel_max_force;
        }
    }

    /// Advance one discrete step. `dt` is the host frame duration; passing
    /// [`FRAME_DT`](crate::consts::FRAME_DT) reproduces the per-frame
    /// original, other values scale displacement and damping.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.clock += dt;

        if let Some(deadline) = self.reset_at
            && self.clock >= deadline
        {
            self.reset_at = None;
            self.collision_count = 0;
            self.last_counted.clear();
            self.scatter(false);
            self.phase = Phase::Idle;
            self.events.push(SessionEvent::Reset);
            log::debug!("bounce session reset after finish delay");
        }

        if self.phase != Phase::Running {
            return;
        }

        self.resolve_collisions();
        self.integrate(dt / FRAME_DT);

        if self.config.goal > 0 && self.collision_count >= self.config.goal {
            self.finish();
        }
    }

    /// O(N^2) pass over unordered pairs: impulse response for approaching
    /// pairs, half-overlap separation for any overlapping pair, debounced
    /// counting keyed by the stable index pair.
    fn resolve_collisions(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (left, right) = self.bodies.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];

                let dist = a.center().distance(b.center());
                let min_dist = a.radius + b.radius;
                if dist >= min_dist {
                    continue;
                }

                // Coincident centers have no usable normal; leave the pair
                // for the next step once integration moves them apart.
                let Some(normal) = math::contact_normal(a.center(), b.center()) else {
                    continue;
                };

                let vn = math::normal_velocity(a.vel, b.vel, normal);
                if vn < 0.0 {
                    let impulse = math::equal_mass_impulse(vn);
                    a.vel -= impulse * normal;
                    b.vel += impulse * normal;

                    let key = (i, j);
                    let counted_recently = self
                        .last_counted
                        .get(&key)
                        .is_some_and(|&t| self.clock - t <= self.config.debounce_secs);
                    if !counted_recently {
                        self.last_counted.insert(key, self.clock);
                        self.collision_count += 1;
                        if self.config.goal > 0 {
                            self.collision_count = self.collision_count.min(self.config.goal);
                            self.events.push(SessionEvent::Progress(
                                self.collision_count as f32 / self.config.goal as f32,
                            ));
                        }
                    }
                }

                // Push both halves of the overlap apart so sustained contact
                // cannot accumulate
                let overlap = (min_dist - dist) / 2.0;
                let a_center = a.center() + normal * overlap;
                let b_center = b.center() - normal * overlap;
                a.set_center(a_center);
                b.set_center(b_center);
            }
        }
    }

    /// Integration, friction and elastic wall bounce, per body
    fn integrate(&mut self, scale: f32) {
        let extent = self.arena.extent();
        let damping = if scale == 1.0 {
            self.config.damping
        } else {
            self.config.damping.powf(scale)
        };

        for body in &mut self.bodies {
            body.pos += body.vel * scale;
            body.vel *= damping;

            let mut center = body.center();
            let contact = math::clamp_circle(&mut center, body.radius, extent);
            if contact.any() {
                body.set_center(center);
                if contact.x {
                    body.vel.x = -body.vel.x;
                }
                if contact.y {
                    body.vel.y = -body.vel.y;
                }
            }
        }
    }

    fn finish(&mut self) {
        let elapsed_secs = self.elapsed_secs();
        for body in &mut self.bodies {
            body.vel = Vec2::ZERO;
        }
        self.phase = Phase::Finished;
        self.reset_at = Some(self.clock + self.config.reset_delay_secs);
        self.events.push(SessionEvent::Finished { elapsed_secs });
        log::info!(
            "bounce goal reached after {:.2}s, resetting in {:.0}s",
            elapsed_secs,
            self.config.reset_delay_secs
        );
    }

    /// Place every body at a random in-bounds position, optionally with a
    /// random velocity
    fn scatter(&mut self, randomize_vel: bool) {
        for body in &mut self.bodies {
            let max_x = (self.arena.width - body.size.x).max(0.0);
            let max_y = (self.arena.height - body.size.y).max(0.0);
            body.pos = Vec2::new(
                self.rng.random::<f32>() * max_x,
                self.rng.random::<f32>() * max_y,
            );
            body.vel = if randomize_vel {
                random_scatter_vel(&mut self.rng, self.config.scatter_speed)
            } else {
                Vec2::ZERO
            };
        }
    }
}

/// Random velocity in `+-speed/2` per axis
fn random_scatter_vel(rng: &mut Pcg32, speed: f32) -> Vec2 {
    Vec2::new(
        (rng.random::<f32>() - 0.5) * speed,
        (rng.random::<f32>() - 0.5) * speed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SIZE: Vec2 = Vec2::new(40.0, 40.0);

    fn test_sim(goal: u32, body_count: usize) -> BounceSim {
        let sizes = vec![SIZE; body_count];
        let config = BounceConfig {
            goal,
            ..BounceConfig::default()
        };
        BounceSim::new(Arena::new(800.0, 600.0), &sizes, config, 42)
    }

    /// Force a head-on contact between bodies 0 and 1
    fn stage_head_on(sim: &mut BounceSim, speed: f32) {
        let r = sim.bodies[0].radius;
        sim.bodies[0].set_center(Vec2::new(400.0 - r + 1.0, 300.0));
        sim.bodies[1].set_center(Vec2::new(400.0 + r - 1.0, 300.0));
        sim.bodies[0].vel = Vec2::new(speed, 0.0);
        sim.bodies[1].vel = Vec2::new(-speed, 0.0);
    }

    #[test]
    fn test_free_running_without_goal() {
        let sim = test_sim(0, 3);
        assert_eq!(sim.phase(), Phase::Running);
        assert!(sim.bodies().iter().any(|b| b.vel != Vec2::ZERO));
    }

    #[test]
    fn test_goal_variant_starts_idle() {
        let mut sim = test_sim(50, 3);
        assert_eq!(sim.phase(), Phase::Idle);
        assert!(sim.bodies().iter().all(|b| b.vel == Vec2::ZERO));

        sim.start();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.drain_events(), vec![SessionEvent::Started]);
    }

    #[test]
    fn test_wall_bounce_reflects_and_clamps() {
        let mut sim = test_sim(0, 1);
        let body = &mut sim.bodies[0];
        let radius = body.radius;
        body.set_center(Vec2::new(800.0 - radius - 1.0, 300.0));
        body.vel = Vec2::new(6.0, 0.0);

        sim.step(FRAME_DT);

        let body = &sim.bodies()[0];
        // Crossed the right wall: tangent reposition, exact elastic
        // reflection of the already-damped velocity
        assert_eq!(body.center().x, 800.0 - radius);
        assert_eq!(body.center().y, 300.0);
        assert_eq!(body.vel.x, -6.0 * 0.98);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_head_on_exchange() {
        let mut sim = test_sim(0, 2);
        stage_head_on(&mut sim, 5.0);

        sim.step(FRAME_DT);

        // Full exchange along the line of centers, then one damping factor
        let damping = 0.98;
        assert!((sim.bodies()[0].vel.x - (-5.0 * damping)).abs() < 1e-4);
        assert!((sim.bodies()[1].vel.x - (5.0 * damping)).abs() < 1e-4);
    }

    #[test]
    fn test_overlap_fully_separated() {
        let mut sim = test_sim(0, 2);
        let r = sim.bodies[0].radius;
        // Deep overlap, drifting apart so no impulse fires
        sim.bodies[0].set_center(Vec2::new(400.0 - r / 2.0, 300.0));
        sim.bodies[1].set_center(Vec2::new(400.0 + r / 2.0, 300.0));
        sim.bodies[0].vel = Vec2::ZERO;
        sim.bodies[1].vel = Vec2::ZERO;

        sim.resolve_collisions();

        let dist = sim.bodies()[0].center().distance(sim.bodies()[1].center());
        assert!((dist - 2.0 * r).abs() < 1e-3);
    }

    #[test]
    fn test_collision_debounce_counts_once() {
        let mut sim = test_sim(0, 2);
        // Hold the pair in contact for many consecutive frames within the
        // 100 ms window: 5 frames at 60 Hz is ~83 ms
        for _ in 0..5 {
            stage_head_on(&mut sim, 5.0);
            sim.step(FRAME_DT);
        }
        assert_eq!(sim.collision_count(), 1);

        // Once the window passes, the same pair counts again
        sim.step(0.2);
        stage_head_on(&mut sim, 5.0);
        sim.step(FRAME_DT);
        assert_eq!(sim.collision_count(), 2);
    }

    #[test]
    fn test_coincident_centers_no_nan() {
        let mut sim = test_sim(0, 2);
        let center = Vec2::new(400.0, 300.0);
        sim.bodies[0].set_center(center);
        sim.bodies[1].set_center(center);
        sim.bodies[0].vel = Vec2::new(1.0, 0.0);
        sim.bodies[1].vel = Vec2::new(-1.0, 0.0);

        sim.step(FRAME_DT);

        for body in sim.bodies() {
            assert!(body.pos.is_finite());
            assert!(body.vel.is_finite());
        }
    }

    #[test]
    fn test_pointer_repulsion_pushes_away() {
        let mut sim = test_sim(0, 1);
        sim.bodies[0].set_center(Vec2::new(400.0, 300.0));
        sim.bodies[0].vel = Vec2::ZERO;

        // Pointer just left of the body: impulse must point right
        sim.pointer_move(Vec2::new(350.0, 300.0));
        assert!(sim.bodies()[0].vel.x > 0.0);
        assert_eq!(sim.bodies()[0].vel.y, 0.0);

        // Magnitude: (200 - 50) / 200 * 10
        assert!((sim.bodies()[0].vel.x - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_pointer_on_center_is_noop() {
        let mut sim = test_sim(0, 1);
        sim.bodies[0].set_center(Vec2::new(400.0, 300.0));
        sim.bodies[0].vel = Vec2::ZERO;

        sim.pointer_move(Vec2::new(400.0, 300.0));
        assert_eq!(sim.bodies()[0].vel, Vec2::ZERO);
        assert!(sim.bodies()[0].vel.is_finite());
    }

    #[test]
    fn test_pointer_ignored_outside_running() {
        let mut sim = test_sim(50, 1);
        sim.bodies[0].set_center(Vec2::new(400.0, 300.0));
        sim.pointer_move(Vec2::new(350.0, 300.0));
        assert_eq!(sim.bodies()[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_goal_completion_and_reset() {
        let mut sim = test_sim(50, 2);
        sim.start();
        sim.drain_events();

        // Drive 50 debounced collisions by restaging a head-on contact and
        // letting the debounce window lapse between each
        while sim.phase() == Phase::Running {
            stage_head_on(&mut sim, 5.0);
            sim.step(FRAME_DT);
            sim.step(0.15);
        }

        assert_eq!(sim.phase(), Phase::Finished);
        assert_eq!(sim.collision_count(), 50);
        assert_eq!(sim.progress(), 1.0);
        assert!(sim.bodies().iter().all(|b| b.vel == Vec2::ZERO));

        let events = sim.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SessionEvent::Finished { .. }))
        );

        // Reset fires after the 5 s delay
        sim.step(4.0);
        assert_eq!(sim.phase(), Phase::Finished);
        sim.step(1.5);
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.collision_count(), 0);
        assert_eq!(sim.drain_events(), vec![SessionEvent::Reset]);
        let arena = sim.arena();
        for body in sim.bodies() {
            assert_eq!(body.vel, Vec2::ZERO);
            assert!(body.pos.x >= 0.0 && body.pos.x + body.size.x <= arena.width);
            assert!(body.pos.y >= 0.0 && body.pos.y + body.size.y <= arena.height);
        }
    }

    #[test]
    fn test_start_cancels_pending_reset() {
        let mut sim = test_sim(1, 2);
        sim.start();
        stage_head_on(&mut sim, 5.0);
        sim.step(FRAME_DT);
        assert_eq!(sim.phase(), Phase::Finished);

        // New session before the delay fires: the old reset must not land
        // in the middle of the fresh run
        sim.stop();
        sim.start();
        sim.drain_events();
        sim.step(6.0);
        assert_eq!(sim.phase(), Phase::Running);
        assert!(!sim.drain_events().contains(&SessionEvent::Reset));
    }

    #[test]
    fn test_resize_rescatters_in_bounds() {
        let mut sim = test_sim(0, 4);
        for _ in 0..30 {
            sim.step(FRAME_DT);
        }
        sim.resize(Arena::new(300.0, 200.0));
        assert_eq!(sim.phase(), Phase::Running);
        for body in sim.bodies() {
            assert!(body.pos.x + body.size.x <= 300.0);
            assert!(body.pos.y + body.size.y <= 200.0);
        }
    }

    #[test]
    fn test_determinism_same_seed() {
        let run = |seed| {
            let mut sim = test_sim(0, 4);
            sim.rng = Pcg32::seed_from_u64(seed);
            sim.resize(Arena::new(800.0, 600.0));
            for i in 0..120 {
                if i % 10 == 0 {
                    sim.pointer_move(Vec2::new(400.0, 300.0));
                }
                sim.step(FRAME_DT);
            }
            sim.bodies().iter().map(|b| b.pos).collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }

    proptest! {
        #[test]
        fn prop_bodies_stay_in_arena(
            seed in 0u64..1000,
            steps in 1usize..60,
            px in 0.0f32..800.0,
            py in 0.0f32..600.0,
        ) {
            let sizes = vec![SIZE; 3];
            let mut sim = BounceSim::new(
                Arena::new(800.0, 600.0),
                &sizes,
                BounceConfig::free_running(),
                seed,
            );
            for _ in 0..steps {
                sim.pointer_move(Vec2::new(px, py));
                sim.step(FRAME_DT);
            }
            let arena = sim.arena();
            for body in sim.bodies() {
                prop_assert!(arena.contains_circle(body.center(), body.radius - 1e-3));
            }
        }
    }
}
