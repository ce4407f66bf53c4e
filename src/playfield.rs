//! Demo playfield
//!
//! A scripted scene that exercises the whole stack end to end: a canonical
//! level with walls, pillars, and a seeded scattering of platforms and
//! bowls, plus a mover driven by a fixed control script. The scene logs
//! its progress and requests exit once the script runs out.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts;
use crate::geom::{CollisionWorld, GeomError, Shape, SurfaceKind};
use crate::mover::{Mover, MoverError};
use crate::scene::{EXIT_SCENE, Scene, SceneControl};
use crate::tuning::MoverTuning;

/// Playfield construction failures.
#[derive(Debug, Error)]
pub enum PlayfieldError {
    #[error(transparent)]
    Geom(#[from] GeomError),
    #[error(transparent)]
    Mover(#[from] MoverError),
}

/// Fills a world with the canonical test level: floor, side walls, two
/// pillars forming a doorway, a crossed diagonal obstacle, and a seeded
/// scattering of floating platforms and upward-open bowls. Same seed,
/// same level.
pub fn populate_level(world: &mut CollisionWorld, rng: &mut Pcg32) -> Result<(), GeomError> {
    // Fixed furniture. The pillar bottoms stop 100 above the floor,
    // leaving a corridor the mover fits through.
    world.add_shape(Shape::segment(
        Vec2::new(0.0, 500.0),
        Vec2::new(800.0, 500.0),
        SurfaceKind::Ground,
    )?);
    world.add_shape(Shape::segment(
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 500.0),
        SurfaceKind::Wall,
    )?);
    world.add_shape(Shape::segment(
        Vec2::new(790.0, 0.0),
        Vec2::new(790.0, 500.0),
        SurfaceKind::Wall,
    )?);
    world.add_shape(Shape::segment(
        Vec2::new(550.0, 0.0),
        Vec2::new(550.0, 400.0),
        SurfaceKind::Wall,
    )?);
    world.add_shape(Shape::segment(
        Vec2::new(600.0, 0.0),
        Vec2::new(600.0, 400.0),
        SurfaceKind::Wall,
    )?);
    world.add_shape(Shape::segment(
        Vec2::new(20.0, 400.0),
        Vec2::new(100.0, 450.0),
        SurfaceKind::Ground,
    )?);
    world.add_shape(Shape::segment(
        Vec2::new(100.0, 400.0),
        Vec2::new(20.0, 450.0),
        SurfaceKind::Ground,
    )?);

    // Seeded extras. Heights are capped so nothing dips into the floor
    // corridor the script runs along.
    for _ in 0..5 {
        let x = rng.random_range(60.0..520.0);
        let y = rng.random_range(150.0..390.0);
        let len = rng.random_range(60.0..160.0);
        let drop = rng.random_range(-40.0..40.0);
        world.add_shape(Shape::segment(
            Vec2::new(x, y),
            Vec2::new(x + len, y + drop),
            SurfaceKind::Ground,
        )?);
    }
    for _ in 0..5 {
        let center = Vec2::new(rng.random_range(150.0..650.0), rng.random_range(150.0..360.0));
        let radius = rng.random_range(40.0..70.0);
        let half_angle = rng.random_range(0.6..1.2);
        world.add_shape(Shape::arc(
            center,
            center + Vec2::new(0.0, radius),
            half_angle,
            SurfaceKind::Ground,
        )?);
    }
    Ok(())
}

/// One beat of the control script: hold `run`/`jump` for `ticks` steps.
#[derive(Debug, Clone, Copy)]
struct Beat {
    ticks: u32,
    run: f32,
    jump: bool,
}

/// Scripted scene owning a world and the mover that explores it.
pub struct Playfield {
    world: CollisionWorld,
    mover: Mover,
    script: Vec<Beat>,
    cursor: usize,
    ticks_in_beat: u32,
    jump_latched: bool,
    elapsed_ticks: u64,
}

impl Playfield {
    /// Builds the level from `seed` and places the mover on the floor
    /// left of center.
    pub fn new(seed: u64) -> Result<Self, PlayfieldError> {
        let mut world = CollisionWorld::new();
        let mut rng = Pcg32::seed_from_u64(seed);
        populate_level(&mut world, &mut rng)?;
        world.settle();

        let mover = Mover::new(
            Vec2::new(160.0, 460.0),
            consts::MOVER_RADIUS,
            Vec2::new(0.0, consts::GRAVITY),
            MoverTuning::default(),
        )?;

        // Run right into the doorway and the far wall, jump around,
        // come back left.
        let script = vec![
            Beat { ticks: 240, run: 1.0, jump: false },
            Beat { ticks: 30, run: 1.0, jump: true },
            Beat { ticks: 180, run: 1.0, jump: false },
            Beat { ticks: 120, run: -1.0, jump: true },
            Beat { ticks: 300, run: -1.0, jump: false },
        ];

        Ok(Self {
            world,
            mover,
            script,
            cursor: 0,
            ticks_in_beat: 0,
            jump_latched: false,
            elapsed_ticks: 0,
        })
    }

    /// The scripted mover, for final snapshots.
    pub fn mover(&self) -> &Mover {
        &self.mover
    }

    /// Control force for this tick, applying at most one jump kick per
    /// jump beat and a half-gravity float while ascending with jump held.
    fn control_for(&mut self, beat: Beat) -> Vec2 {
        let mut control = Vec2::new(beat.run * consts::RUN_FORCE, 0.0);
        if beat.jump {
            if self.mover.supported() && !self.jump_latched {
                self.mover.apply_impulse(Vec2::new(0.0, -consts::JUMP_IMPULSE));
                self.jump_latched = true;
                log::debug!("Jump at ({:.1}, {:.1})", self.mover.pos().x, self.mover.pos().y);
            }
            if self.mover.vel().y < 0.0 {
                control.y = -0.5 * consts::GRAVITY;
            }
        } else {
            self.jump_latched = false;
        }
        control
    }
}

impl Scene for Playfield {
    fn on_enter(&mut self) {
        log::info!(
            "Playfield ready: {} shapes, mover at ({:.1}, {:.1})",
            self.world.len(),
            self.mover.pos().x,
            self.mover.pos().y
        );
    }

    fn on_leave(&mut self) {
        log::info!("Playfield done after {} ticks", self.elapsed_ticks);
        match serde_json::to_string(&self.mover) {
            Ok(json) => log::info!("Final mover state: {}", json),
            Err(e) => log::warn!("Mover snapshot failed: {}", e),
        }
    }

    fn on_frame(&mut self, dt: f32, ctl: &mut SceneControl) {
        self.world.settle();

        let Some(beat) = self.script.get(self.cursor).copied() else {
            ctl.request(EXIT_SCENE);
            return;
        };
        let control = self.control_for(beat);
        let outcome = self.mover.step(&self.world, dt, control);

        self.elapsed_ticks += 1;
        if self.elapsed_ticks % 120 == 0 {
            log::info!(
                "t={:.1}s pos=({:.1}, {:.1}) vel=({:.1}, {:.1}) {:?}",
                self.elapsed_ticks as f32 * dt,
                self.mover.pos().x,
                self.mover.pos().y,
                self.mover.vel().x,
                self.mover.vel().y,
                outcome
            );
        }

        self.ticks_in_beat += 1;
        if self.ticks_in_beat >= beat.ticks {
            self.ticks_in_beat = 0;
            self.cursor += 1;
            self.jump_latched = false;
        }
    }
}
