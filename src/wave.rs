//! Undulating surface: a flat grid whose heights are recomputed from rest
//! positions every frame as a sum of three sinusoids plus a pointer bump.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::{temperature_tint, Rgb};
use crate::viewer::FrameInputs;

/// `(time_x, time_z, space_x, space_z, weight)` per term:
/// `sin(t*time_x + x*space_x) * cos(t*time_z + z*space_z) * amplitude * weight`.
const TERMS: [(f32, f32, f32, f32, f32); 3] = [
    (2.0, 1.5, 0.5, 0.5, 1.0),
    (1.5, 2.5, 0.3, 0.3, 0.7),
    (3.0, 1.0, 0.8, 0.8, 0.5),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    pub size: f32,
    pub segments: usize,
    pub amplitude: f32,
    pub essence_amplitude: f32,
    pub opacity: f32,
    pub essence_opacity: f32,
    /// Pointer NDC to world units on the surface plane.
    pub pointer_scale: f32,
    pub bump_radius: f32,
    pub bump_frequency: f32,
    pub bump_height: f32,
    pub warm: Rgb,
    pub cold: Rgb,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            size: 8.0,
            segments: 50,
            amplitude: 1.0,
            essence_amplitude: 1.5,
            opacity: 0.8,
            essence_opacity: 1.0,
            pointer_scale: 4.0,
            bump_radius: 3.0,
            bump_frequency: 4.0,
            bump_height: 0.5,
            warm: Rgb::from_hsl(0.6, 0.8, 0.3),
            cold: Rgb::from_hsl(0.6, 0.3, 0.4),
        }
    }
}

/// Sum of the three travelling terms at rest coordinates `(x, z)`.
pub fn base_height(x: f32, z: f32, t: f32, amplitude: f32) -> f32 {
    TERMS
        .iter()
        .map(|&(fx, fz, gx, gz, w)| (t * fx + x * gx).sin() * (t * fz + z * gz).cos() * amplitude * w)
        .sum()
}

impl WaveParams {
    /// Where the pointer lands on the rest grid. Screen-up is world -Z.
    pub fn pointer_center(&self, pointer: Vec2) -> Vec2 {
        Vec2::new(pointer.x, -pointer.y) * self.pointer_scale
    }

    /// Radially decaying bump centred under the pointer, pulsing with `sin(t*k)`.
    pub fn pointer_bump(&self, x: f32, z: f32, t: f32, pointer: Vec2) -> f32 {
        let center = self.pointer_center(pointer);
        let d = Vec2::new(x, z).distance(center);
        let falloff = (1.0 - d / self.bump_radius).max(0.0);
        falloff * (t * self.bump_frequency).sin() * self.bump_height
    }

    pub fn height(&self, x: f32, z: f32, t: f32, pointer: Vec2, essence: bool) -> f32 {
        let amplitude = if essence { self.essence_amplitude } else { self.amplitude };
        base_height(x, z, t, amplitude) + self.pointer_bump(x, z, t, pointer)
    }
}

pub struct WaveSurface {
    params: WaveParams,
    rest: Vec<Vec3>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    color: Rgb,
    opacity: f32,
}

impl WaveSurface {
    pub fn new(params: WaveParams) -> Self {
        let (rest, indices) = grid(params.size, params.segments.max(1));
        let positions = rest.clone();
        let normals = vec![Vec3::Y; rest.len()];
        let color = temperature_tint(params.warm, params.cold, 0.5);
        let opacity = params.opacity;
        Self {
            params,
            rest,
            positions,
            normals,
            indices,
            color,
            opacity,
        }
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Recompute heights, normals, tint and opacity for this frame.
    pub fn update(&mut self, frame: &FrameInputs) {
        let t = frame.wave_time;
        for (current, rest) in self.positions.iter_mut().zip(&self.rest) {
            current.x = rest.x;
            current.z = rest.z;
            current.y = self
                .params
                .height(rest.x, rest.z, t, frame.pointer, frame.essence_mode);
        }
        compute_normals(&self.positions, &self.indices, &mut self.normals);

        self.color = temperature_tint(self.params.warm, self.params.cold, frame.temperature);
        self.opacity = if frame.essence_mode {
            self.params.essence_opacity
        } else {
            self.params.opacity
        };
    }

    pub fn positions_flat(&self) -> Vec<f32> {
        flatten(&self.positions)
    }

    pub fn normals_flat(&self) -> Vec<f32> {
        flatten(&self.normals)
    }
}

fn flatten(v: &[Vec3]) -> Vec<f32> {
    v.iter().flat_map(|p| p.to_array()).collect()
}

/// Square grid centred on the origin in the XZ plane, row-major from -Z to +Z.
fn grid(size: f32, segments: usize) -> (Vec<Vec3>, Vec<u32>) {
    let stride = segments + 1;
    let step = size / segments as f32;
    let half = size * 0.5;

    let mut rest = Vec::with_capacity(stride * stride);
    for iz in 0..stride {
        for ix in 0..stride {
            rest.push(Vec3::new(ix as f32 * step - half, 0.0, iz as f32 * step - half));
        }
    }

    let mut indices = Vec::with_capacity(segments * segments * 6);
    for iz in 0..segments {
        for ix in 0..segments {
            let a = (iz * stride + ix) as u32;
            let b = a + 1;
            let c = a + stride as u32;
            let d = c + 1;
            // counter-clockwise seen from +Y
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    (rest, indices)
}

/// Area-weighted vertex normals.
fn compute_normals(positions: &[Vec3], indices: &[u32], out: &mut [Vec3]) {
    out.iter_mut().for_each(|n| *n = Vec3::ZERO);
    for tri in indices.chunks_exact(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (a, b, c) = (positions[ia], positions[ib], positions[ic]);
        let face = (b - a).cross(c - a);
        out[ia] += face;
        out[ib] += face;
        out[ic] += face;
    }
    out.iter_mut().for_each(|n| *n = n.try_normalize().unwrap_or(Vec3::Y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(t: f32, pointer: Vec2, essence: bool) -> FrameInputs {
        FrameInputs {
            time: t,
            wave_time: t,
            pointer,
            essence_mode: essence,
            temperature: 0.5,
        }
    }

    #[test]
    fn grid_shape() {
        let surface = WaveSurface::new(WaveParams::default());
        assert_eq!(surface.rest_positions().len(), 51 * 51);
        assert_eq!(surface.indices().len(), 50 * 50 * 6);
        let first = surface.rest_positions()[0];
        assert_relative_eq!(first.x, -4.0);
        assert_relative_eq!(first.z, -4.0);
    }

    #[test]
    fn flat_grid_normals_point_up() {
        let (rest, indices) = grid(2.0, 4);
        let mut normals = vec![Vec3::ZERO; rest.len()];
        compute_normals(&rest, &indices, &mut normals);
        for n in normals {
            assert_relative_eq!(n.y, 1.0);
        }
    }

    #[test]
    fn update_moves_only_y() {
        let mut surface = WaveSurface::new(WaveParams::default());
        surface.update(&frame(1.3, Vec2::new(0.2, -0.4), false));
        for (p, r) in surface.positions().iter().zip(surface.rest_positions()) {
            assert_eq!(p.x, r.x);
            assert_eq!(p.z, r.z);
        }
        assert!(surface.positions().iter().any(|p| p.y.abs() > 1e-3));
    }

    #[test]
    fn update_is_history_free() {
        let mut a = WaveSurface::new(WaveParams::default());
        let mut b = WaveSurface::new(WaveParams::default());
        a.update(&frame(0.4, Vec2::ZERO, true));
        a.update(&frame(2.0, Vec2::new(0.5, 0.5), false));
        b.update(&frame(2.0, Vec2::new(0.5, 0.5), false));
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.normals(), b.normals());
    }

    #[test]
    fn essence_raises_amplitude_and_opacity() {
        let params = WaveParams::default();
        let calm = params.height(1.0, 0.5, 0.7, Vec2::splat(1.0), false);
        let excited = params.height(1.0, 0.5, 0.7, Vec2::splat(1.0), true);
        assert_relative_eq!(excited, calm * 1.5, epsilon = 1e-5);

        let mut surface = WaveSurface::new(params);
        surface.update(&frame(0.0, Vec2::ZERO, true));
        assert_relative_eq!(surface.opacity(), 1.0);
        surface.update(&frame(0.0, Vec2::ZERO, false));
        assert_relative_eq!(surface.opacity(), 0.8);
    }

    #[test]
    fn bump_vanishes_beyond_radius() {
        let params = WaveParams::default();
        let t = 0.3;
        assert!(params.pointer_bump(0.0, 0.0, t, Vec2::ZERO) > 0.0);
        assert_eq!(params.pointer_bump(3.5, 0.0, t, Vec2::ZERO), 0.0);
    }

    #[test]
    fn tint_follows_temperature() {
        let params = WaveParams::default();
        let (warm, cold) = (params.warm, params.cold);
        let mut surface = WaveSurface::new(params);
        let mut f = frame(0.0, Vec2::ZERO, false);
        f.temperature = 1.0;
        surface.update(&f);
        assert_eq!(surface.color(), warm);
        f.temperature = 0.0;
        surface.update(&f);
        assert_eq!(surface.color(), cold);
    }
}
