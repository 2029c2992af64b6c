//! Headless demo driver
//!
//! Runs a goal-tracked bounce session without a render surface, driving it
//! with a scripted pointer sweep and logging session events. Useful for
//! eyeballing tuning changes from a terminal:
//!
//! ```sh
//! RUST_LOG=info cargo run -- [config.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;
    use std::fs;

    use glam::Vec2;

    use logofx::config::BounceConfig;
    use logofx::consts::FRAME_DT;
    use logofx::sim::{Arena, BounceSim, SessionEvent};

    const MARK_SIZE: f32 = 64.0;
    const MAX_STEPS: u32 = 60 * 120;

    pub fn run() -> Result<(), Box<dyn Error>> {
        env_logger::init();

        let config: BounceConfig = match std::env::args().nth(1) {
            Some(path) => serde_json::from_str(&fs::read_to_string(&path)?)?,
            None => BounceConfig::default(),
        };
        let goal = config.goal;

        let arena = Arena::new(800.0, 600.0);
        let sizes = vec![Vec2::splat(MARK_SIZE); 3];
        let mut sim = BounceSim::new(arena, &sizes, config, 0xB0C3);
        sim.start();

        for step in 0..MAX_STEPS {
            // Sweep the pointer in a slow figure across the arena so the
            // marks keep getting stirred into each other
            let t = step as f32 * FRAME_DT;
            let pointer = Vec2::new(
                arena.width * 0.5 + (t * 0.7).sin() * arena.width * 0.4,
                arena.height * 0.5 + (t * 1.1).cos() * arena.height * 0.4,
            );
            sim.pointer_move(pointer);
            sim.step(FRAME_DT);

            for event in sim.drain_events() {
                match event {
                    SessionEvent::Started => log::info!("session started"),
                    SessionEvent::Progress(p) => log::debug!("progress {:.0}%", p * 100.0),
                    SessionEvent::Finished { elapsed_secs } => {
                        log::info!("goal of {goal} collisions reached in {elapsed_secs:.1}s");
                    }
                    SessionEvent::Reset => {
                        log::info!("session reset to idle");
                        return Ok(());
                    }
                }
            }
        }

        log::info!(
            "stopped after {} steps at {:.0}% progress ({:?})",
            MAX_STEPS,
            sim.progress() * 100.0,
            sim.phase()
        );
        sim.stop();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    demo::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
