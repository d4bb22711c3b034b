//! Inner "essence" and outer "ambient" particle clouds orbiting the surface.
//!
//! Positions are a pure function of the rest layout and the frame inputs.
//! Opacity is the only per-particle value carried from frame to frame: it
//! eases toward a target that depends on pointer proximity and essence mode.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::color::{temperature_tint, Rgb};
use crate::viewer::FrameInputs;

/// How a field reacts when essence mode is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EssenceResponse {
    /// Target opacity forced to 1.
    Foreground,
    /// Target opacity scaled down by the given factor.
    Suppress(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    pub count: usize,
    pub seed: u64,
    /// Full turns of the rest spiral.
    pub turns: f32,
    pub radius: [f32; 2],
    /// Rest heights fall in `[-height/2, height/2]`.
    pub height: f32,
    pub base_opacity: [f32; 2],
    pub flow_speed: [f32; 2],
    pub orbit_scale: f32,
    pub bob_frequency: f32,
    pub bob_amplitude: f32,
    /// Pointer NDC to world units for the proximity test.
    pub pointer_scale: f32,
    pub fade_distance: f32,
    pub essence_fade_distance: f32,
    pub essence: EssenceResponse,
    pub smoothing: f32,
    pub point_size: f32,
    pub warm: Rgb,
    pub cold: Rgb,
}

impl FieldParams {
    pub fn inner() -> Self {
        Self {
            count: 150,
            seed: 0x5eed_0001,
            turns: 2.0,
            radius: [4.0, 6.0],
            height: 3.0,
            base_opacity: [0.6, 1.0],
            flow_speed: [0.5, 1.0],
            orbit_scale: 0.5,
            bob_frequency: 2.0,
            bob_amplitude: 0.1,
            pointer_scale: 10.0,
            fade_distance: 15.0,
            essence_fade_distance: 15.0,
            essence: EssenceResponse::Foreground,
            smoothing: 0.05,
            point_size: 0.12,
            warm: Rgb::from_hsl(0.1, 0.4, 0.5),
            cold: Rgb::from_hsl(0.6, 0.3, 0.4),
        }
    }

    pub fn outer() -> Self {
        Self {
            count: 250,
            seed: 0x5eed_0002,
            turns: 3.0,
            radius: [8.0, 14.0],
            height: 4.0,
            base_opacity: [0.3, 0.7],
            flow_speed: [0.3, 0.7],
            orbit_scale: 0.3,
            bob_frequency: 1.5,
            bob_amplitude: 0.15,
            pointer_scale: 10.0,
            fade_distance: 12.0,
            essence_fade_distance: 8.0,
            essence: EssenceResponse::Suppress(0.3),
            smoothing: 0.08,
            point_size: 0.08,
            warm: Rgb::from_hsl(0.6, 0.8, 0.2),
            cold: Rgb::from_hsl(0.6, 0.3, 0.4),
        }
    }

    pub fn target_opacity(&self, base: f32, visibility: f32, essence: bool) -> f32 {
        match (essence, self.essence) {
            (false, _) => base * visibility,
            (true, EssenceResponse::Foreground) => 1.0,
            (true, EssenceResponse::Suppress(scale)) => base * visibility * scale,
        }
    }

    pub fn fade_distance(&self, essence: bool) -> f32 {
        if essence {
            self.essence_fade_distance
        } else {
            self.fade_distance
        }
    }
}

impl Default for FieldParams {
    fn default() -> Self {
        Self::inner()
    }
}

/// One smoothing step toward `target`; `rate` in (0, 1] contracts the gap.
pub fn blend_opacity(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// Linear falloff that reaches zero at `fade`.
pub fn visibility(distance: f32, fade: f32) -> f32 {
    if fade <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / fade).max(0.0)
}

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub rest_radius: f32,
    pub rest_angle: f32,
    pub rest_height: f32,
    pub base_opacity: f32,
    pub flow_speed: f32,
}

impl Particle {
    pub fn rest_position(&self) -> Vec3 {
        Vec3::new(
            self.rest_angle.cos() * self.rest_radius,
            self.rest_height,
            self.rest_angle.sin() * self.rest_radius,
        )
    }

    /// Orbit at constant radius and bob around the rest height.
    pub fn position_at(&self, index: usize, t: f32, params: &FieldParams) -> Vec3 {
        let angle = self.rest_angle + t * self.flow_speed * params.orbit_scale;
        let bob = (t * params.bob_frequency + index as f32).sin() * params.bob_amplitude;
        Vec3::new(
            angle.cos() * self.rest_radius,
            self.rest_height + bob,
            angle.sin() * self.rest_radius,
        )
    }
}

pub struct ParticleField {
    params: FieldParams,
    particles: Vec<Particle>,
    positions: Vec<Vec3>,
    opacities: Vec<f32>,
    color: Rgb,
}

impl ParticleField {
    pub fn new(params: FieldParams) -> Self {
        let mut rng = SmallRng::seed_from_u64(params.seed);
        let count = params.count;
        let particles: Vec<Particle> = (0..count)
            .map(|i| Particle {
                rest_angle: (i as f32 / count as f32) * TAU * params.turns,
                rest_radius: sample(&mut rng, params.radius),
                rest_height: (rng.gen::<f32>() - 0.5) * params.height,
                base_opacity: sample(&mut rng, params.base_opacity),
                flow_speed: sample(&mut rng, params.flow_speed),
            })
            .collect();
        let positions = particles.iter().map(Particle::rest_position).collect();
        let opacities = particles.iter().map(|p| p.base_opacity).collect();
        let color = temperature_tint(params.warm, params.cold, 0.5);
        Self {
            params,
            particles,
            positions,
            opacities,
            color,
        }
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn update(&mut self, frame: &FrameInputs) {
        let params = &self.params;
        let pointer = frame.pointer * params.pointer_scale;
        let fade = params.fade_distance(frame.essence_mode);

        for (i, particle) in self.particles.iter().enumerate() {
            let pos = particle.position_at(i, frame.time, params);
            self.positions[i] = pos;

            let distance = Vec3::new(pos.x - pointer.x, pos.y - pointer.y, pos.z).length();
            let target =
                params.target_opacity(particle.base_opacity, visibility(distance, fade), frame.essence_mode);
            self.opacities[i] = blend_opacity(self.opacities[i], target, params.smoothing);
        }

        self.color = temperature_tint(params.warm, params.cold, frame.temperature);
    }

    pub fn positions_flat(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    pub fn colors_flat(&self) -> Vec<f32> {
        let rgb = self.color.to_array();
        (0..self.particles.len()).flat_map(|_| rgb).collect()
    }
}

fn sample(rng: &mut SmallRng, range: [f32; 2]) -> f32 {
    let [lo, hi] = range;
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn frame(t: f32, essence: bool) -> FrameInputs {
        FrameInputs {
            time: t,
            wave_time: t,
            pointer: Vec2::ZERO,
            essence_mode: essence,
            temperature: 0.5,
        }
    }

    #[test]
    fn rest_layout_respects_ranges() {
        let field = ParticleField::new(FieldParams::outer());
        assert_eq!(field.len(), 250);
        for p in field.particles() {
            assert!((8.0..14.0).contains(&p.rest_radius));
            assert!(p.rest_height.abs() <= 2.0);
            assert!((0.3..0.7).contains(&p.base_opacity));
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = ParticleField::new(FieldParams::inner());
        let b = ParticleField::new(FieldParams::inner());
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn orbit_keeps_radius() {
        let mut field = ParticleField::new(FieldParams::inner());
        field.update(&frame(37.5, false));
        for (pos, p) in field.positions().iter().zip(field.particles()) {
            let r = Vec2::new(pos.x, pos.z).length();
            assert_relative_eq!(r, p.rest_radius, epsilon = 1e-4);
        }
    }

    #[test]
    fn bob_stays_near_rest_height() {
        let params = FieldParams::outer();
        let mut field = ParticleField::new(params.clone());
        field.update(&frame(3.0, false));
        for (pos, p) in field.positions().iter().zip(field.particles()) {
            assert!((pos.y - p.rest_height).abs() <= params.bob_amplitude + 1e-6);
        }
    }

    #[test]
    fn fields_react_oppositely_to_essence() {
        let inner = FieldParams::inner();
        let outer = FieldParams::outer();
        assert_eq!(inner.target_opacity(0.7, 0.2, true), 1.0);
        assert_relative_eq!(outer.target_opacity(0.5, 0.5, true), 0.075);
        assert_relative_eq!(outer.target_opacity(0.5, 0.5, false), 0.25);
        assert_eq!(outer.fade_distance(true), 8.0);
        assert_eq!(outer.fade_distance(false), 12.0);
    }

    #[test]
    fn inner_opacity_climbs_in_essence_mode() {
        let mut field = ParticleField::new(FieldParams::inner());
        let before: Vec<f32> = field.opacities().to_vec();
        field.update(&frame(0.0, true));
        for (b, a) in before.iter().zip(field.opacities()) {
            assert!(a >= b);
            assert!(*a <= 1.0);
        }
    }

    #[test]
    fn visibility_is_linear_and_clamped() {
        assert_relative_eq!(visibility(0.0, 15.0), 1.0);
        assert_relative_eq!(visibility(7.5, 15.0), 0.5);
        assert_eq!(visibility(20.0, 15.0), 0.0);
    }
}
