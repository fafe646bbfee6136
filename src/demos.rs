//! Preset scenes, one per demo
//!
//! Each scene owns its own simulator or overlay source; switching demos drops
//! the old scene and builds a fresh one.

use anyhow::Result;
use clap::ValueEnum;
use field_physics::{
    DoubleSlit, FieldSample, ForceZone, Glyph, GridSpec, IntensityMap, SpinTexture,
    FIELD_CELL_SIZE, GRAVITY_Y,
};
use field_simulation::{FieldSimulator, SimulationConfig};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::Rng;

pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// Static charges with a field arrow overlay
    Charges,
    /// Mobile magnetic polarities attracting and repelling
    Magnetic,
    /// Planets around a fixed sun
    Orbital,
    /// Falling bodies under gravity, no pairwise force
    Zero,
    /// Drifting skyrmion spin texture
    Skyrmion,
    /// Double-slit interference intensity
    DoubleSlit,
    /// Beam split by a gradient zone
    SternGerlach,
}

/// Settings shared by every scene
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    pub bodies: usize,
    pub gravity: bool,
}

pub trait Scene {
    fn name(&self) -> &'static str;

    /// Advance one frame
    fn advance(&mut self, dt: f64) -> Result<()>;

    /// Log a one-line summary of the current state
    fn report(&self, frame: u64) -> Result<()>;
}

pub fn build(demo: Demo, options: SceneOptions, rng: &mut StdRng) -> Result<Box<dyn Scene>> {
    let scene: Box<dyn Scene> = match demo {
        Demo::Charges => Box::new(BodyScene::charges(options, rng)?),
        Demo::Magnetic => Box::new(BodyScene::magnetic(options, rng)?),
        Demo::Orbital => Box::new(BodyScene::orbital(options, rng)?),
        Demo::Zero => Box::new(BodyScene::zero(options, rng)?),
        Demo::Skyrmion => Box::new(SkyrmionScene::new(options)),
        Demo::DoubleSlit => Box::new(DoubleSlitScene::new()?),
        Demo::SternGerlach => Box::new(SternGerlachScene::new()?),
    };
    log::info!("✓ Built scene: {}", scene.name());
    Ok(scene)
}

fn random_position(rng: &mut StdRng, margin: f64) -> DVec2 {
    DVec2::new(
        rng.random_range(margin..CANVAS_WIDTH - margin),
        rng.random_range(margin..CANVAS_HEIGHT - margin),
    )
}

fn random_polarity(rng: &mut StdRng) -> f64 {
    if rng.random::<bool>() {
        1.0
    } else {
        -1.0
    }
}

#[derive(Debug, Default)]
struct GlyphCounts {
    arrows: usize,
    into_plane: usize,
    out_of_plane: usize,
    empty: usize,
}

impl GlyphCounts {
    fn tally(samples: &[FieldSample]) -> Self {
        let mut counts = Self::default();
        for s in samples {
            match s.glyph {
                Glyph::Arrow => counts.arrows += 1,
                Glyph::IntoPlane => counts.into_plane += 1,
                Glyph::OutOfPlane => counts.out_of_plane += 1,
                Glyph::None => counts.empty += 1,
            }
        }
        counts
    }
}

// ----------------------------------------------------------------------------
// Pairwise body scenes
// ----------------------------------------------------------------------------

struct BodyScene {
    name: &'static str,
    sim: FieldSimulator,
    overlay: Option<GridSpec>,
    /// Body whose distance to the others is reported (the sun)
    anchor: Option<field_physics::BodyId>,
}

impl BodyScene {
    fn charges(options: SceneOptions, rng: &mut StdRng) -> Result<Self> {
        let mut sim = FieldSimulator::new(SimulationConfig::electric())?;
        for _ in 0..options.bodies {
            sim.add_body(
                random_position(rng, 50.0),
                DVec2::ZERO,
                random_polarity(rng),
                10.0,
                false,
            )?;
        }
        let half = FIELD_CELL_SIZE / 2.0;
        Ok(Self {
            name: "charges",
            sim,
            overlay: Some(GridSpec::new(
                half,
                half,
                CANVAS_WIDTH - FIELD_CELL_SIZE,
                CANVAS_HEIGHT - FIELD_CELL_SIZE,
                FIELD_CELL_SIZE,
            )),
            anchor: None,
        })
    }

    fn magnetic(options: SceneOptions, rng: &mut StdRng) -> Result<Self> {
        let mut sim = FieldSimulator::new(SimulationConfig::magnetic())?;
        if options.gravity {
            sim.set_named_parameter("gravity_y", GRAVITY_Y)?;
        }
        for _ in 0..options.bodies {
            sim.add_body(
                random_position(rng, 100.0),
                DVec2::ZERO,
                random_polarity(rng),
                15.0,
                true,
            )?;
        }
        Ok(Self {
            name: "magnetic",
            sim,
            overlay: Some(GridSpec::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, FIELD_CELL_SIZE)),
            anchor: None,
        })
    }

    fn orbital(options: SceneOptions, rng: &mut StdRng) -> Result<Self> {
        let mut sim = FieldSimulator::new(SimulationConfig::orbital())?;
        let sun = sim.add_body(
            DVec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
            DVec2::ZERO,
            1.0e4,
            30.0,
            false,
        )?;
        for _ in 0..options.bodies {
            let distance = rng.random_range(100.0..300.0);
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let radius = rng.random_range(5.0..15.0);
            // Planets are test bodies: only the sun pulls
            sim.add_orbiting_body(sun, distance, angle, 0.0, radius, 1.0)?;
        }
        Ok(Self {
            name: "orbital",
            sim,
            overlay: None,
            anchor: Some(sun),
        })
    }

    fn zero(options: SceneOptions, rng: &mut StdRng) -> Result<Self> {
        let mut sim = FieldSimulator::new(SimulationConfig::kinematic())?;
        for _ in 0..options.bodies {
            let velocity = DVec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..0.0));
            sim.add_body(random_position(rng, 50.0), velocity, 1.0, 10.0, true)?;
        }
        Ok(Self {
            name: "zero",
            sim,
            overlay: None,
            anchor: None,
        })
    }
}

impl Scene for BodyScene {
    fn name(&self) -> &'static str {
        self.name
    }

    fn advance(&mut self, dt: f64) -> Result<()> {
        self.sim.step(dt)?;
        Ok(())
    }

    fn report(&self, frame: u64) -> Result<()> {
        let snaps = self.sim.snapshots();
        let count = snaps.len().max(1) as f64;
        let centroid = snaps.iter().map(|s| s.position()).sum::<DVec2>() / count;
        let max_speed = snaps
            .iter()
            .map(|s| s.velocity().length())
            .fold(0.0, f64::max);

        log::info!(
            "[{}] frame {} t={:.1}: bodies={} centroid=({:.1}, {:.1}) max_speed={:.3}",
            self.name,
            frame,
            self.sim.time(),
            snaps.len(),
            centroid.x,
            centroid.y,
            max_speed
        );

        if let Some(anchor) = self.anchor.and_then(|id| self.sim.body(id)) {
            let distances: Vec<f64> = self
                .sim
                .bodies()
                .iter()
                .filter(|b| b.id != anchor.id)
                .map(|b| b.position.distance(anchor.position))
                .collect();
            if !distances.is_empty() {
                let mean = distances.iter().sum::<f64>() / distances.len() as f64;
                log::info!("  mean orbit radius {:.1}", mean);
            }
        }

        if let Some(grid) = &self.overlay {
            let samples = self.sim.sample_field(grid)?;
            let counts = GlyphCounts::tally(&samples);
            let peak = samples.iter().map(|s| s.magnitude).fold(0.0, f64::max);
            log::info!(
                "  overlay: {} arrows, {} empty, peak field {:.4}",
                counts.arrows,
                counts.empty,
                peak
            );
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Overlay-only scenes
// ----------------------------------------------------------------------------

struct SkyrmionScene {
    texture: SpinTexture,
    grid: GridSpec,
}

impl SkyrmionScene {
    fn new(options: SceneOptions) -> Self {
        let texture = if options.bodies > 1 {
            SpinTexture::pair(CANVAS_WIDTH, CANVAS_HEIGHT)
        } else {
            SpinTexture::single(DVec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0))
        };
        Self {
            texture,
            grid: SpinTexture::default_grid(CANVAS_WIDTH, CANVAS_HEIGHT),
        }
    }
}

impl Scene for SkyrmionScene {
    fn name(&self) -> &'static str {
        "skyrmion"
    }

    fn advance(&mut self, dt: f64) -> Result<()> {
        self.texture.advance(dt);
        Ok(())
    }

    fn report(&self, frame: u64) -> Result<()> {
        let samples = self.texture.sample_field(&self.grid)?;
        let counts = GlyphCounts::tally(&samples);
        let lead = self
            .texture
            .skyrmions
            .first()
            .map(|s| s.center)
            .unwrap_or(DVec2::ZERO);
        log::info!(
            "[skyrmion] frame {}: lead core at ({:.1}, {:.1}), {} arrows, {} out, {} in",
            frame,
            lead.x,
            lead.y,
            counts.arrows,
            counts.out_of_plane,
            counts.into_plane
        );
        Ok(())
    }
}

struct DoubleSlitScene {
    wave: DoubleSlit,
    intensity: IntensityMap,
    screen_x: f64,
}

impl DoubleSlitScene {
    fn new() -> Result<Self> {
        let wave = DoubleSlit::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let intensity = IntensityMap::new(GridSpec::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, 10.0))?;
        Ok(Self {
            wave,
            intensity,
            screen_x: 7.0 * CANVAS_WIDTH / 8.0,
        })
    }
}

impl Scene for DoubleSlitScene {
    fn name(&self) -> &'static str {
        "double-slit"
    }

    fn advance(&mut self, dt: f64) -> Result<()> {
        self.intensity.accumulate(&self.wave);
        self.wave.advance(dt);
        Ok(())
    }

    fn report(&self, frame: u64) -> Result<()> {
        let screen = self.intensity.column(self.screen_x);
        let cell = self.intensity.grid().cell_size;
        let brightest = screen
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(row, _)| (row as f64 + 0.5) * cell);
        log::info!(
            "[double-slit] frame {}: {} frames integrated, brightest screen y={:?}",
            frame,
            self.intensity.frames(),
            brightest
        );
        Ok(())
    }
}

struct SternGerlachScene {
    sim: FieldSimulator,
    emitted: u64,
    hits_up: Vec<f64>,
    hits_down: Vec<f64>,
}

impl SternGerlachScene {
    const DETECTOR_X: f64 = 780.0;
    const EMIT_EVERY: u64 = 10;

    fn new() -> Result<Self> {
        let config = SimulationConfig::kinematic()
            .with_global_acceleration(DVec2::ZERO)
            .with_clamp_contacts(false);
        let mut sim = FieldSimulator::new(config)?;
        sim.add_zone(ForceZone::new(
            DVec2::new(100.0, 200.0),
            DVec2::new(300.0, 400.0),
            100.0,
            1.0e-5,
        ))?;
        Ok(Self {
            sim,
            emitted: 0,
            hits_up: Vec::new(),
            hits_down: Vec::new(),
        })
    }
}

impl Scene for SternGerlachScene {
    fn name(&self) -> &'static str {
        "stern-gerlach"
    }

    fn advance(&mut self, dt: f64) -> Result<()> {
        if self.sim.step_count() % Self::EMIT_EVERY == 0 {
            let polarity = if self.emitted % 2 == 0 { 1.0 } else { -1.0 };
            self.sim.add_body(
                DVec2::new(20.0, CANVAS_HEIGHT / 2.0),
                DVec2::new(2.0, 0.0),
                polarity,
                5.0,
                true,
            )?;
            self.emitted += 1;
        }

        self.sim.step(dt)?;

        let arrived: Vec<_> = self
            .sim
            .bodies()
            .iter()
            .filter(|b| b.position.x >= Self::DETECTOR_X)
            .map(|b| (b.id, b.charge, b.position.y))
            .collect();
        for (id, charge, y) in arrived {
            if charge > 0.0 {
                self.hits_up.push(y);
            } else {
                self.hits_down.push(y);
            }
            self.sim.remove_body(id);
        }
        Ok(())
    }

    fn report(&self, frame: u64) -> Result<()> {
        let mean = |hits: &[f64]| {
            if hits.is_empty() {
                None
            } else {
                Some(hits.iter().sum::<f64>() / hits.len() as f64)
            }
        };
        log::info!(
            "[stern-gerlach] frame {}: in flight={} hits +{} (mean y {:?}) -{} (mean y {:?})",
            frame,
            self.sim.len(),
            self.hits_up.len(),
            mean(&self.hits_up),
            self.hits_down.len(),
            mean(&self.hits_down)
        );
        Ok(())
    }
}
