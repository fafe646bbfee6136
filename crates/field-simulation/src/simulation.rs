//! Pairwise field simulation manager
//!
//! Forces are summed over every unordered pair, O(n²) per step. Demos run with
//! tens to a few hundred bodies, so there is no spatial partitioning.

use crate::error::{SimulationError, SimulationResult};
use crate::params::{Parameter, SimulationConfig};
use crate::trail::Trails;
use field_physics::{
    circular_orbit_velocity, field_at, pair_force, Body, BodyId, BodySnapshot, FieldSample,
    ForceZone, GridSpec, InteractionLaw, MIN_EFFECTIVE_MASS,
};
use glam::DVec2;
use std::collections::VecDeque;

/// Pair bookkeeping for one force pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairStats {
    pub evaluated: usize,
    /// Pairs dropped by the singularity guard (or a law without pair terms)
    pub skipped: usize,
}

/// CPU pairwise field simulation
///
/// One instance per active demo. The driver calls [`FieldSimulator::step`]
/// once per frame and [`FieldSimulator::sample_field`] when it wants an
/// overlay; the simulator never schedules itself.
#[derive(Debug, Clone)]
pub struct FieldSimulator {
    config: SimulationConfig,
    bodies: Vec<Body>,
    zones: Vec<ForceZone>,
    trails: Trails,

    next_id: u64,
    time: f64,
    step_count: u64,

    // Reused between steps
    forces: Vec<DVec2>,
}

impl Default for FieldSimulator {
    fn default() -> Self {
        let config = SimulationConfig::default();
        Self {
            trails: Trails::new(config.trail_length),
            config,
            bodies: Vec::new(),
            zones: Vec::new(),
            next_id: 0,
            time: 0.0,
            step_count: 0,
            forces: Vec::new(),
        }
    }
}

impl FieldSimulator {
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        log::debug!(
            "FieldSimulator: law={} k={} epsilon={}",
            config.law.name(),
            config.law_constant,
            config.epsilon
        );
        Ok(Self {
            trails: Trails::new(config.trail_length),
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn law(&self) -> InteractionLaw {
        self.config.law
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    // ------------------------------------------------------------------
    // Body set
    // ------------------------------------------------------------------

    /// Append a body and return its id
    pub fn add_body(
        &mut self,
        position: DVec2,
        velocity: DVec2,
        charge: f64,
        radius: f64,
        mobile: bool,
    ) -> SimulationResult<BodyId> {
        check_vec("position", position)?;
        check_vec("velocity", velocity)?;
        check_finite("charge", charge)?;
        check_radius(radius)?;

        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies
            .push(Body::new(id, position, velocity, charge, radius, mobile));

        log::debug!(
            "Added body {} at ({:.1}, {:.1}) charge={} mobile={}",
            id,
            position.x,
            position.y,
            charge,
            mobile
        );
        Ok(id)
    }

    /// Spawn a body on a circular orbit around `center`
    ///
    /// The orbit speed uses the current law constant and the centre's charge
    /// as its mass, and is added to the centre's own velocity. Returns
    /// `Ok(None)` if `center` does not exist.
    pub fn add_orbiting_body(
        &mut self,
        center: BodyId,
        distance: f64,
        angle: f64,
        charge: f64,
        radius: f64,
        speed_multiplier: f64,
    ) -> SimulationResult<Option<BodyId>> {
        check_finite("distance", distance)?;
        check_finite("angle", angle)?;
        check_finite("speed_multiplier", speed_multiplier)?;

        let Some(c) = self.body(center) else {
            return Ok(None);
        };

        let offset = DVec2::new(angle.cos(), angle.sin()) * distance;
        let velocity = c.velocity
            + circular_orbit_velocity(self.config.law_constant, c.charge, offset, speed_multiplier);
        let position = c.position + offset;

        self.add_body(position, velocity, charge, radius, true)
            .map(Some)
    }

    /// Remove a body, returns whether it existed
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.bodies.remove(index);
        self.trails.remove(id);
        log::debug!("Removed body {}", id);
        true
    }

    pub fn clear(&mut self) {
        log::debug!("Clearing {} bodies", self.bodies.len());
        self.bodies.clear();
        self.trails.clear();
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(Body::snapshot).collect()
    }

    pub fn trail(&self, id: BodyId) -> Option<&VecDeque<DVec2>> {
        self.trails.get(id)
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    // Live edits. Unknown ids are a no-op returning `false`.

    pub fn set_charge(&mut self, id: BodyId, charge: f64) -> SimulationResult<bool> {
        check_finite("charge", charge)?;
        Ok(self.body_mut(id).map(|b| b.charge = charge).is_some())
    }

    pub fn set_radius(&mut self, id: BodyId, radius: f64) -> SimulationResult<bool> {
        check_radius(radius)?;
        Ok(self.body_mut(id).map(|b| b.radius = radius).is_some())
    }

    pub fn set_position(&mut self, id: BodyId, position: DVec2) -> SimulationResult<bool> {
        check_vec("position", position)?;
        Ok(self.body_mut(id).map(|b| b.position = position).is_some())
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: DVec2) -> SimulationResult<bool> {
        check_vec("velocity", velocity)?;
        Ok(self.body_mut(id).map(|b| b.velocity = velocity).is_some())
    }

    pub fn set_mobile(&mut self, id: BodyId, mobile: bool) -> bool {
        self.body_mut(id).map(|b| b.mobile = mobile).is_some()
    }

    // ------------------------------------------------------------------
    // Parameters and zones
    // ------------------------------------------------------------------

    pub fn set_parameter(&mut self, parameter: Parameter) -> SimulationResult<()> {
        if let Err(e) = self.config.apply(parameter) {
            log::warn!("Rejected parameter: {}", e);
            return Err(e);
        }
        if let Parameter::TrailLength(n) = parameter {
            self.trails.set_capacity(n);
        }
        log::debug!("Set {:?}", parameter);
        Ok(())
    }

    /// Slider-style entry point, see [`Parameter::from_name`]
    pub fn set_named_parameter(&mut self, name: &str, value: f64) -> SimulationResult<()> {
        let parameter = Parameter::from_name(name, value, &self.config).inspect_err(|e| {
            log::warn!("Rejected parameter: {}", e);
        })?;
        self.set_parameter(parameter)
    }

    pub fn add_zone(&mut self, zone: ForceZone) -> SimulationResult<()> {
        if !zone.is_finite() {
            return Err(SimulationError::invalid("zone", f64::NAN, "must be finite"));
        }
        self.zones.push(zone);
        Ok(())
    }

    pub fn clear_zones(&mut self) {
        self.zones.clear();
    }

    pub fn zones(&self) -> &[ForceZone] {
        &self.zones
    }

    // ------------------------------------------------------------------
    // Forces and integration
    // ------------------------------------------------------------------

    /// Net force on each body in the current state, in body order
    ///
    /// Includes pairwise terms, zones and the global acceleration scaled by
    /// each body's effective mass.
    pub fn net_forces(&self) -> Vec<DVec2> {
        let mut out = vec![DVec2::ZERO; self.bodies.len()];
        self.accumulate_forces(&mut out);
        out
    }

    fn accumulate_forces(&self, out: &mut [DVec2]) -> PairStats {
        let cfg = &self.config;
        let n = self.bodies.len();
        let mut stats = PairStats::default();

        for f in out.iter_mut() {
            *f = DVec2::ZERO;
        }

        // One evaluation per unordered pair, applied with opposite signs
        for i in 0..n {
            let bi = &self.bodies[i];
            for j in (i + 1)..n {
                let bj = &self.bodies[j];
                match pair_force(cfg.law, cfg.law_constant, bi, bj, cfg.epsilon, cfg.max_force) {
                    Some(f) => {
                        out[i] += f;
                        out[j] -= f;
                        stats.evaluated += 1;
                    }
                    None => stats.skipped += 1,
                }
            }
        }

        for (body, f) in self.bodies.iter().zip(out.iter_mut()) {
            for zone in &self.zones {
                *f += zone.force_on(body);
            }
            *f += cfg.global_acceleration * cfg.law.effective_mass(body.charge);
        }

        stats
    }

    /// Acceleration of each massless test body, `None` for bodies with mass
    ///
    /// A test body contributes nothing to the pair forces but still falls
    /// through the field of the others. Zones act on mass and are skipped.
    fn test_body_accelerations(&self) -> Vec<Option<DVec2>> {
        let cfg = &self.config;
        self.bodies
            .iter()
            .map(|body| {
                if !body.mobile || cfg.law.effective_mass(body.charge) >= MIN_EFFECTIVE_MASS {
                    return None;
                }
                let others = self.bodies.iter().filter(|b| b.id != body.id);
                let field = field_at(
                    cfg.law,
                    cfg.law_constant,
                    body.position,
                    others,
                    cfg.epsilon,
                    cfg.max_force,
                );
                Some(field + cfg.global_acceleration)
            })
            .collect()
    }

    /// Advance by `dt` and return the new body states
    ///
    /// Semi-implicit Euler: velocity is kicked by the net force first, then
    /// position moves with the new velocity. Immobile bodies are skipped.
    pub fn step(&mut self, dt: f64) -> SimulationResult<Vec<BodySnapshot>> {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Rejected step with dt={}", dt);
            return Err(SimulationError::invalid("dt", dt, "must be finite and non-negative"));
        }

        let mut forces = std::mem::take(&mut self.forces);
        forces.resize(self.bodies.len(), DVec2::ZERO);
        let stats = self.accumulate_forces(&mut forces);

        let law = self.config.law;
        let g = self.config.global_acceleration;
        let damping = self.config.damping;
        let test_bodies = self.test_body_accelerations();

        for ((body, force), test) in self
            .bodies
            .iter_mut()
            .zip(forces.iter())
            .zip(test_bodies)
        {
            if !body.mobile {
                continue;
            }

            let acceleration = match test {
                Some(a) => a,
                None => *force / law.effective_mass(body.charge),
            };

            let velocity = (body.velocity + acceleration * dt) * damping;
            let position = body.position + velocity * dt;
            if velocity.is_finite() && position.is_finite() {
                body.velocity = velocity;
                body.position = position;
            } else {
                log::warn!("Body {} left finite range, holding previous state", body.id);
            }
        }
        self.forces = forces;

        if self.config.clamp_contacts {
            self.clamp_contacts();
        }

        if self.trails.is_enabled() {
            for body in &self.bodies {
                self.trails.record(body.id, body.position);
            }
        }

        self.time += dt;
        self.step_count += 1;

        log::trace!(
            "step {}: bodies={} pairs={} skipped={}",
            self.step_count,
            self.bodies.len(),
            stats.evaluated,
            stats.skipped
        );

        Ok(self.snapshots())
    }

    /// Push overlapping bodies apart to `r_a + r_b` and drop the closing part
    /// of their velocities. No momentum is exchanged.
    fn clamp_contacts(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if !a.mobile && !b.mobile {
                    continue;
                }

                let d = b.position - a.position;
                let r = d.length();
                let min_distance = a.radius + b.radius;
                if r >= min_distance || r == 0.0 || !r.is_finite() {
                    continue;
                }

                // Normal from a to b
                let normal = d / r;
                let overlap = min_distance - r;
                let (share_a, share_b) = match (a.mobile, b.mobile) {
                    (true, true) => (0.5, 0.5),
                    (true, false) => (1.0, 0.0),
                    _ => (0.0, 1.0),
                };

                if a.mobile {
                    a.position -= normal * overlap * share_a;
                    let closing = a.velocity.dot(normal);
                    if closing > 0.0 {
                        a.velocity -= normal * closing;
                    }
                }
                if b.mobile {
                    b.position += normal * overlap * share_b;
                    let closing = -b.velocity.dot(normal);
                    if closing > 0.0 {
                        b.velocity += normal * closing;
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Overlay
    // ------------------------------------------------------------------

    /// Field per unit test charge at every cell centre of `grid`
    ///
    /// Read-only; samples are rebuilt on every call.
    pub fn sample_field(&self, grid: &GridSpec) -> SimulationResult<Vec<FieldSample>> {
        grid.validate()?;
        let cfg = &self.config;
        Ok(grid
            .points()
            .map(|p| {
                let e = field_at(
                    cfg.law,
                    cfg.law_constant,
                    p,
                    &self.bodies,
                    cfg.epsilon,
                    cfg.max_force,
                );
                FieldSample::from_vector(p, e.extend(0.0))
            })
            .collect())
    }
}

fn check_finite(name: &'static str, value: f64) -> SimulationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, value, "must be finite"))
    }
}

fn check_vec(name: &'static str, v: DVec2) -> SimulationResult<()> {
    check_finite(name, v.x)?;
    check_finite(name, v.y)
}

fn check_radius(radius: f64) -> SimulationResult<()> {
    check_finite("radius", radius)?;
    if radius <= 0.0 {
        return Err(SimulationError::invalid("radius", radius, "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_physics::Glyph;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sim(config: SimulationConfig) -> FieldSimulator {
        FieldSimulator::new(config).unwrap()
    }

    fn add(s: &mut FieldSimulator, x: f64, y: f64, charge: f64, mobile: bool) -> BodyId {
        s.add_body(DVec2::new(x, y), DVec2::ZERO, charge, 10.0, mobile)
            .unwrap()
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let mut s = FieldSimulator::default();
        let a = add(&mut s, 0.0, 0.0, 1.0, true);
        let b = add(&mut s, 50.0, 0.0, 1.0, true);

        assert!(s.remove_body(a));
        let c = add(&mut s, 100.0, 0.0, 1.0, true);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(s.body(b).unwrap().position, DVec2::new(50.0, 0.0));
    }

    #[test]
    fn test_add_body_rejects_invalid_input() {
        let mut s = FieldSimulator::default();

        assert!(s.add_body(DVec2::ZERO, DVec2::ZERO, 1.0, 0.0, true).is_err());
        assert!(s.add_body(DVec2::ZERO, DVec2::ZERO, 1.0, -2.0, true).is_err());
        assert!(s.add_body(DVec2::ZERO, DVec2::ZERO, f64::NAN, 1.0, true).is_err());
        assert!(s
            .add_body(DVec2::new(f64::INFINITY, 0.0), DVec2::ZERO, 1.0, 1.0, true)
            .is_err());
        assert!(s.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut s = FieldSimulator::default();
        add(&mut s, 0.0, 0.0, 1.0, true);
        add(&mut s, 30.0, 40.0, -1.0, false);
        add(&mut s, -20.0, 5.0, 2.0, true);
        let before = s.bodies().to_vec();

        assert!(!s.remove_body(BodyId(999)));

        assert_eq!(s.bodies(), &before[..]);
    }

    #[test]
    fn test_edits_on_unknown_id_are_noops() {
        let mut s = FieldSimulator::default();
        add(&mut s, 0.0, 0.0, 1.0, true);
        let before = s.bodies().to_vec();

        assert!(!s.set_charge(BodyId(42), 3.0).unwrap());
        assert!(!s.set_radius(BodyId(42), 3.0).unwrap());
        assert!(!s.set_mobile(BodyId(42), false));
        assert!(!s.set_velocity(BodyId(42), DVec2::ONE).unwrap());
        assert!(!s.set_position(BodyId(42), DVec2::new(5.0, 5.0)).unwrap());

        assert_eq!(s.bodies(), &before[..]);
    }

    #[test]
    fn test_live_edits() {
        let mut s = FieldSimulator::default();
        let id = add(&mut s, 0.0, 0.0, 1.0, true);

        assert!(s.set_charge(id, -2.0).unwrap());
        assert!(s.set_radius(id, 4.0).unwrap());
        assert!(s.set_mobile(id, false));
        assert!(s.set_radius(id, 0.0).is_err());

        let b = s.body(id).unwrap();
        assert_eq!(b.charge, -2.0);
        assert_eq!(b.radius, 4.0);
        assert!(!b.mobile);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut s = sim(SimulationConfig::orbital());
        let id = add(&mut s, 0.0, 0.0, 1.0, true);
        s.step(1.0).unwrap();
        assert!(s.trail(id).is_some());

        s.clear();

        assert!(s.is_empty());
        assert!(s.trail(id).is_none());
    }

    #[test]
    fn test_newton_third_law_every_law() {
        for law in [
            InteractionLaw::InverseSquare,
            InteractionLaw::Attractive,
            InteractionLaw::None,
        ] {
            let mut s = sim(SimulationConfig::default().with_law(law));
            add(&mut s, 3.0, -7.0, 2.5, true);
            add(&mut s, 81.0, 42.0, -1.25, true);

            let f = s.net_forces();

            assert_eq!(f[0], -f[1], "law {}", law.name());
        }
    }

    #[test]
    fn test_total_force_vanishes_for_random_sets() {
        let mut rng = StdRng::seed_from_u64(7);

        for law in [InteractionLaw::InverseSquare, InteractionLaw::Attractive] {
            let mut s = sim(SimulationConfig::default().with_law(law));
            for _ in 0..40 {
                s.add_body(
                    DVec2::new(rng.random_range(0.0..800.0), rng.random_range(0.0..600.0)),
                    DVec2::ZERO,
                    rng.random_range(-3.0..3.0),
                    5.0,
                    true,
                )
                .unwrap();
            }

            let forces = s.net_forces();
            let total: DVec2 = forces.iter().sum();
            let scale: f64 = forces.iter().map(|f| f.length()).sum();

            assert!(total.length() <= 1e-12 * scale.max(1.0));
        }
    }

    #[test]
    fn test_step_stays_finite_for_near_coincident_bodies() {
        for epsilon in [5.0, 1e-12] {
            let mut s = sim(SimulationConfig::default().with_epsilon(epsilon));
            s.add_body(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0, true).unwrap();
            s.add_body(DVec2::new(1e-9, 0.0), DVec2::ZERO, -1.0, 1.0, true)
                .unwrap();
            s.add_body(DVec2::new(1e-9, 1e-9), DVec2::ZERO, 1.0, 1.0, true)
                .unwrap();

            for _ in 0..10 {
                let snaps = s.step(1.0).unwrap();
                for snap in snaps {
                    assert!(snap.position().is_finite());
                    assert!(snap.velocity().is_finite());
                }
            }
        }
    }

    #[test]
    fn test_coincident_bodies_without_clamp_feel_nothing() {
        let mut s = sim(SimulationConfig::default().with_clamp_contacts(false));
        s.add_body(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0, true).unwrap();
        s.add_body(DVec2::new(1e-9, 0.0), DVec2::ZERO, -1.0, 1.0, true)
            .unwrap();

        let snaps = s.step(1.0).unwrap();

        assert_eq!(snaps[0].velocity(), DVec2::ZERO);
        assert_eq!(snaps[1].velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_opposite_charges_approach_like_charges_separate() {
        for (qb, approach) in [(-1.0, true), (1.0, false)] {
            let mut s = sim(SimulationConfig::default());
            add(&mut s, 0.0, 0.0, 1.0, true);
            add(&mut s, 100.0, 0.0, qb, true);

            let snaps = s.step(1.0).unwrap();
            let relative_velocity = snaps[1].velocity() - snaps[0].velocity();

            // Separation is along +x, so closing means negative relative x velocity
            assert_eq!(relative_velocity.x < 0.0, approach);
            assert_eq!(relative_velocity.y, 0.0);
        }
    }

    #[test]
    fn test_mobile_body_pulled_toward_fixed_charge() {
        let mut s = sim(SimulationConfig::default().with_law_constant(1000.0));
        let fixed = add(&mut s, 0.0, 0.0, 1.0, false);
        let mobile = add(&mut s, 100.0, 0.0, -1.0, true);

        s.step(1.0).unwrap();

        let v = s.body(mobile).unwrap().velocity;
        assert!(v.x < 0.0);
        assert_eq!(v.y, 0.0);
        assert!((v.x + 0.1).abs() < 1e-12);
        assert_eq!(s.body(fixed).unwrap().position, DVec2::ZERO);
        assert_eq!(s.body(fixed).unwrap().velocity, DVec2::ZERO);
    }

    #[test]
    fn test_approach_halts_at_contact_distance() {
        let mut s = sim(SimulationConfig::default().with_law_constant(1000.0));
        add(&mut s, 0.0, 0.0, 1.0, false);
        let mobile = add(&mut s, 100.0, 0.0, -1.0, true);
        let contact = 20.0;

        let mut previous = 100.0;
        let mut reached = false;
        for _ in 0..300 {
            s.step(1.0).unwrap();
            let x = s.body(mobile).unwrap().position.x;

            assert!(x >= contact - 1e-9);
            if reached {
                assert!((x - contact).abs() < 1e-9);
            } else {
                assert!(x < previous);
                reached = (x - contact).abs() < 1e-9;
            }
            previous = x;
        }

        assert!(reached);
        assert_eq!(s.body(mobile).unwrap().position.y, 0.0);
    }

    #[test]
    fn test_middle_of_symmetric_line_feels_no_force() {
        let mut s = sim(SimulationConfig::orbital().with_law_constant(1.0));
        add(&mut s, -100.0, 0.0, 5.0, true);
        add(&mut s, 0.0, 0.0, 5.0, true);
        add(&mut s, 100.0, 0.0, 5.0, true);

        let f = s.net_forces();

        assert!(f[1].length() < 1e-12 * f[0].length());
        assert!(f[0].x > 0.0);
        assert!(f[2].x < 0.0);
    }

    #[test]
    fn test_global_acceleration_scaled_by_mass() {
        let g = DVec2::new(0.0, 2.0);

        // Without a mass law acceleration is raw
        let mut s = sim(SimulationConfig::kinematic().with_global_acceleration(g));
        let id = add(&mut s, 0.0, 0.0, 7.0, true);
        s.step(0.5).unwrap();
        assert_eq!(s.body(id).unwrap().velocity, DVec2::new(0.0, 1.0));

        // With a mass law the force scales with mass, acceleration does not
        let mut s = sim(SimulationConfig::orbital().with_global_acceleration(g));
        let heavy = add(&mut s, 0.0, 0.0, 8.0, true);
        let massless = add(&mut s, 1000.0, 0.0, 0.0, true);
        assert_eq!(s.net_forces()[0].y, 16.0);
        s.step(0.5).unwrap();
        assert!((s.body(heavy).unwrap().velocity.y - 1.0).abs() < 1e-12);
        assert_eq!(s.body(massless).unwrap().velocity.y, 1.0);
    }

    #[test]
    fn test_massless_body_falls_toward_mass() {
        let config = SimulationConfig::orbital().with_clamp_contacts(false);
        let mut s = sim(config);
        add(&mut s, 0.0, 0.0, 1.0e4, false);
        let massless = add(&mut s, 100.0, 0.0, 0.0, true);
        let light = add(&mut s, 0.0, 100.0, 1.0e-6, true);

        s.step(1.0).unwrap();

        // k * M / r^2 = 0.1 * 1e4 / 1e4
        let expected = 0.1;
        let v = s.body(massless).unwrap().velocity;
        assert!((v.x + expected).abs() < 1e-9);
        assert!(v.y.abs() < 1e-9);

        // A tiny but nonzero mass gets the same pull
        let w = s.body(light).unwrap().velocity;
        assert!((w.y + expected).abs() < 1e-6);
    }

    #[test]
    fn test_massless_bodies_exert_no_force() {
        let config = SimulationConfig::orbital().with_clamp_contacts(false);
        let mut s = sim(config);
        let sun = add(&mut s, 0.0, 0.0, 1.0e4, true);
        add(&mut s, 100.0, 0.0, 0.0, true);
        add(&mut s, -50.0, 30.0, 0.0, true);

        s.step(1.0).unwrap();

        assert_eq!(s.body(sun).unwrap().velocity, DVec2::ZERO);
        assert_eq!(s.body(sun).unwrap().position, DVec2::ZERO);
    }

    #[test]
    fn test_immobile_bodies_never_move() {
        let mut s = sim(SimulationConfig::kinematic());
        let id = add(&mut s, 10.0, 10.0, 1.0, false);
        s.set_velocity(id, DVec2::new(5.0, 5.0)).unwrap();

        for _ in 0..5 {
            s.step(1.0).unwrap();
        }

        assert_eq!(s.body(id).unwrap().position, DVec2::new(10.0, 10.0));
    }

    #[test]
    fn test_damping_bleeds_velocity() {
        let mut s = sim(SimulationConfig::kinematic()
            .with_global_acceleration(DVec2::ZERO)
            .with_damping(0.5));
        let id = s
            .add_body(DVec2::ZERO, DVec2::new(8.0, 0.0), 1.0, 1.0, true)
            .unwrap();

        s.step(1.0).unwrap();

        let b = s.body(id).unwrap();
        assert_eq!(b.velocity, DVec2::new(4.0, 0.0));
        assert_eq!(b.position, DVec2::new(4.0, 0.0));
    }

    #[test]
    fn test_step_rejects_bad_dt() {
        let mut s = FieldSimulator::default();
        add(&mut s, 0.0, 0.0, 1.0, true);

        assert!(s.step(f64::NAN).is_err());
        assert!(s.step(-1.0).is_err());
        assert_eq!(s.step_count(), 0);
        assert!(s.step(0.0).is_ok());
        assert_eq!(s.step_count(), 1);
    }

    #[test]
    fn test_set_parameter_validation() {
        let mut s = FieldSimulator::default();
        let before = s.config().clone();

        assert!(s.set_parameter(Parameter::LawConstant(f64::INFINITY)).is_err());
        assert!(s.set_named_parameter("epsilon", -1.0).is_err());
        assert!(s.set_named_parameter("warp", 1.0).is_err());
        assert_eq!(s.config(), &before);

        s.set_parameter(Parameter::LawConstant(-5.0)).unwrap();
        s.set_named_parameter("gravity_y", 9.8).unwrap();
        assert_eq!(s.config().law_constant, -5.0);
        assert_eq!(s.config().global_acceleration, DVec2::new(0.0, 9.8));
    }

    #[test]
    fn test_negative_constant_flips_attraction() {
        let mut s = sim(SimulationConfig::default());
        add(&mut s, 0.0, 0.0, 1.0, false);
        let mobile = add(&mut s, 100.0, 0.0, -1.0, true);
        s.set_parameter(Parameter::LawConstant(-1000.0)).unwrap();

        s.step(1.0).unwrap();

        assert!(s.body(mobile).unwrap().velocity.x > 0.0);
    }

    #[test]
    fn test_orbiting_body_keeps_radius() {
        let mut s = sim(SimulationConfig::orbital().with_clamp_contacts(false));
        let sun = add(&mut s, 400.0, 300.0, 1e4, false);
        let planet = s
            .add_orbiting_body(sun, 150.0, 0.0, 1.0, 5.0, 1.0)
            .unwrap()
            .unwrap();

        for _ in 0..500 {
            s.step(0.1).unwrap();
        }

        let r = (s.body(planet).unwrap().position - DVec2::new(400.0, 300.0)).length();
        assert!((r - 150.0).abs() < 5.0, "radius drifted to {r}");
        assert_eq!(s.trail(planet).unwrap().len(), 50);
    }

    #[test]
    fn test_massless_planet_keeps_radius() {
        let mut s = sim(SimulationConfig::orbital().with_clamp_contacts(false));
        let sun = add(&mut s, 400.0, 300.0, 1e4, false);
        let planet = s
            .add_orbiting_body(sun, 150.0, 1.0, 0.0, 5.0, 1.0)
            .unwrap()
            .unwrap();

        for _ in 0..500 {
            s.step(0.1).unwrap();
        }

        let r = (s.body(planet).unwrap().position - DVec2::new(400.0, 300.0)).length();
        assert!((r - 150.0).abs() < 5.0, "radius drifted to {r}");
    }

    #[test]
    fn test_orbit_around_unknown_centre_is_noop() {
        let mut s = sim(SimulationConfig::orbital());

        let id = s
            .add_orbiting_body(BodyId(3), 100.0, 0.0, 1.0, 5.0, 1.0)
            .unwrap();

        assert!(id.is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn test_zone_deflects_by_polarity() {
        let mut s = sim(SimulationConfig::kinematic().with_global_acceleration(DVec2::ZERO));
        s.add_zone(ForceZone::new(
            DVec2::new(100.0, 200.0),
            DVec2::new(300.0, 400.0),
            100.0,
            0.001,
        ))
        .unwrap();
        let plus = s
            .add_body(DVec2::new(150.0, 300.0), DVec2::new(2.0, 0.0), 1.0, 5.0, true)
            .unwrap();
        let minus = s
            .add_body(DVec2::new(150.0, 300.0), DVec2::new(2.0, 0.0), -1.0, 5.0, true)
            .unwrap();
        s.set_parameter(Parameter::ClampContacts(false)).unwrap();

        s.step(1.0).unwrap();

        assert!(s.body(plus).unwrap().velocity.y < 0.0);
        assert!(s.body(minus).unwrap().velocity.y > 0.0);

        s.clear_zones();
        assert!(s.zones().is_empty());
    }

    #[test]
    fn test_sample_field_empty_is_zero() {
        let s = FieldSimulator::default();
        let grid = GridSpec::new(0.0, 0.0, 800.0, 600.0, 40.0);

        let samples = s.sample_field(&grid).unwrap();

        assert_eq!(samples.len(), 20 * 15);
        assert!(samples
            .iter()
            .all(|p| p.magnitude == 0.0 && p.glyph == Glyph::None));
    }

    #[test]
    fn test_sample_field_points_away_from_positive_charge() {
        let mut s = FieldSimulator::default();
        add(&mut s, 100.0, 100.0, 1.0, false);
        // Cell centres at 25, 75, 125, 175 never coincide with the charge
        let grid = GridSpec::new(0.0, 0.0, 200.0, 200.0, 50.0);

        let samples = s.sample_field(&grid).unwrap();

        for sample in &samples {
            let away = (sample.position() - DVec2::new(100.0, 100.0)).normalize();
            assert!(sample.magnitude.is_finite());
            assert_eq!(sample.glyph, Glyph::Arrow);
            assert!((sample.direction.truncate() - away).length() < 1e-9);
        }
    }

    #[test]
    fn test_sample_field_is_read_only() {
        let mut s = FieldSimulator::default();
        add(&mut s, 10.0, 10.0, 1.0, true);
        add(&mut s, 60.0, 10.0, -1.0, true);
        let before = s.bodies().to_vec();

        let _ = s.sample_field(&GridSpec::new(0.0, 0.0, 100.0, 100.0, 10.0)).unwrap();

        assert_eq!(s.bodies(), &before[..]);
    }

    #[test]
    fn test_sample_field_skips_body_on_sample_point() {
        let mut s = FieldSimulator::default();
        add(&mut s, 20.0, 20.0, 1.0, false);

        let samples = s
            .sample_field(&GridSpec::new(0.0, 0.0, 40.0, 40.0, 40.0))
            .unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].magnitude, 0.0);
    }

    #[test]
    fn test_sample_field_rejects_bad_grid() {
        let s = FieldSimulator::default();

        assert!(matches!(
            s.sample_field(&GridSpec::new(0.0, 0.0, 10.0, 10.0, f64::NAN)),
            Err(SimulationError::InvalidGrid(_))
        ));
    }
}
