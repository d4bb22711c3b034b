//! Per-visualization input and clock state.
//!
//! Input handlers write pointer/mode/boost; the frame tick reads the latest
//! values and produces a [`FrameInputs`] snapshot consumed by the wave surface
//! and both particle fields.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerParams {
    pub initial_temperature: f32,
    /// Angular frequency of the temperature target oscillation.
    pub temperature_frequency: f32,
    /// Fraction of the remaining gap closed each tick.
    pub temperature_rate: f32,
    pub boost_factor: f32,
    pub boost_seconds: f64,
    pub camera_follow: f32,
    pub camera_rest: [f32; 3],
}

impl Default for ViewerParams {
    fn default() -> Self {
        Self {
            initial_temperature: 0.5,
            temperature_frequency: 0.1,
            temperature_rate: 0.01,
            boost_factor: 2.0,
            boost_seconds: 1.0,
            camera_follow: 0.02,
            camera_rest: [0.0, 8.0, 15.0],
        }
    }
}

/// Everything a subsystem needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    /// Seconds since mount.
    pub time: f32,
    /// Wave clock; runs faster while a speed boost is active.
    pub wave_time: f32,
    pub pointer: Vec2,
    pub essence_mode: bool,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct ViewerState {
    params: ViewerParams,
    pointer: Vec2,
    essence_mode: bool,
    temperature: f32,
    elapsed: f64,
    wave_time: f64,
    last_tick: Option<f64>,
    boost_until: Option<f64>,
    camera_eye: Vec3,
}

impl ViewerState {
    pub fn new(params: ViewerParams) -> Self {
        let camera_eye = Vec3::from_array(params.camera_rest);
        Self {
            temperature: params.initial_temperature.clamp(0.0, 1.0),
            params,
            pointer: Vec2::ZERO,
            essence_mode: false,
            elapsed: 0.0,
            wave_time: 0.0,
            last_tick: None,
            boost_until: None,
            camera_eye,
        }
    }

    /// Record a pointer position given in client pixels.
    pub fn set_pointer_client(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let nx = (x / width) * 2.0 - 1.0;
        let ny = -(y / height) * 2.0 + 1.0;
        self.set_pointer(Vec2::new(nx as f32, ny as f32));
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn toggle_essence(&mut self) -> bool {
        self.essence_mode = !self.essence_mode;
        self.essence_mode
    }

    pub fn essence_mode(&self) -> bool {
        self.essence_mode
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Speed up the wave clock until `boost_seconds` after the latest request.
    pub fn request_boost(&mut self) {
        self.boost_until = Some(self.elapsed + self.params.boost_seconds);
    }

    pub fn speed_factor(&self) -> f32 {
        match self.boost_until {
            Some(until) if self.elapsed < until => self.params.boost_factor,
            _ => 1.0,
        }
    }

    pub fn camera_eye(&self) -> Vec3 {
        self.camera_eye
    }

    /// Advance clocks to `now_secs` (a monotonically increasing host
    /// timestamp) and return the inputs for this frame.
    pub fn tick(&mut self, now_secs: f64) -> FrameInputs {
        let dt = match self.last_tick {
            Some(prev) => (now_secs - prev).max(0.0),
            None => 0.0,
        };
        self.last_tick = Some(now_secs);

        // Speed is sampled at the start of the interval so the boost ends on
        // the first tick past its deadline.
        let speed = f64::from(self.speed_factor());
        self.elapsed += dt;
        self.wave_time += dt * speed;
        if matches!(self.boost_until, Some(until) if self.elapsed >= until) {
            self.boost_until = None;
        }

        self.drift_temperature();
        self.follow_pointer();

        FrameInputs {
            time: self.elapsed as f32,
            wave_time: self.wave_time as f32,
            pointer: self.pointer,
            essence_mode: self.essence_mode,
            temperature: self.temperature,
        }
    }

    fn drift_temperature(&mut self) {
        let t = self.elapsed as f32;
        let target = temperature_target(t, self.params.temperature_frequency);
        self.temperature += (target - self.temperature) * self.params.temperature_rate;
    }

    fn follow_pointer(&mut self) {
        let rest = Vec3::from_array(self.params.camera_rest);
        let goal = Vec3::new(
            self.pointer.x * 3.0 + rest.x,
            self.pointer.y * 2.0 + rest.y,
            rest.z,
        );
        let k = self.params.camera_follow;
        self.camera_eye.x += (goal.x - self.camera_eye.x) * k;
        self.camera_eye.y += (goal.y - self.camera_eye.y) * k;
        self.camera_eye.z = goal.z;
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(ViewerParams::default())
    }
}

pub fn temperature_target(t: f32, frequency: f32) -> f32 {
    ((t * frequency).sin() + 1.0) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pointer_normalizes_client_coordinates() {
        let mut state = ViewerState::default();
        state.set_pointer_client(0.0, 0.0, 800.0, 600.0);
        assert_eq!(state.pointer(), Vec2::new(-1.0, 1.0));
        state.set_pointer_client(400.0, 300.0, 800.0, 600.0);
        assert_eq!(state.pointer(), Vec2::ZERO);
        state.set_pointer_client(800.0, 600.0, 800.0, 600.0);
        assert_eq!(state.pointer(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn zero_sized_viewport_keeps_previous_pointer() {
        let mut state = ViewerState::default();
        state.set_pointer(Vec2::new(0.25, 0.5));
        state.set_pointer_client(10.0, 10.0, 0.0, 0.0);
        assert_eq!(state.pointer(), Vec2::new(0.25, 0.5));
    }

    #[test]
    fn essence_toggles() {
        let mut state = ViewerState::default();
        assert!(state.toggle_essence());
        assert!(!state.toggle_essence());
    }

    #[test]
    fn boost_doubles_wave_clock_then_reverts() {
        let mut state = ViewerState::default();
        state.tick(0.0);
        state.request_boost();
        let f = state.tick(0.5);
        assert_relative_eq!(f.wave_time, 1.0);
        let f = state.tick(1.0);
        assert_relative_eq!(f.wave_time, 2.0);
        assert_relative_eq!(state.speed_factor(), 1.0);
        let f = state.tick(1.5);
        assert_relative_eq!(f.wave_time, 2.5);
        assert_relative_eq!(f.time, 1.5);
    }

    #[test]
    fn repeated_boost_extends_instead_of_stacking() {
        let mut state = ViewerState::default();
        state.tick(0.0);
        state.request_boost();
        state.tick(0.8);
        state.request_boost();
        assert_relative_eq!(state.speed_factor(), 2.0);
        state.tick(1.5);
        assert_relative_eq!(state.speed_factor(), 2.0);
        state.tick(2.0);
        assert_relative_eq!(state.speed_factor(), 1.0);
    }

    #[test]
    fn temperature_moves_toward_target() {
        let mut state = ViewerState::default();
        state.tick(0.0);
        let f = state.tick(5.0);
        let target = temperature_target(5.0, 0.1);
        assert!(f.temperature > 0.5 && f.temperature < target);
    }

    #[test]
    fn camera_eases_toward_pointer() {
        let mut state = ViewerState::default();
        state.set_pointer(Vec2::new(1.0, 0.0));
        state.tick(0.0);
        let eye = state.camera_eye();
        assert_relative_eq!(eye.x, 0.06);
        assert_relative_eq!(eye.y, 8.0);
        assert_relative_eq!(eye.z, 15.0);
    }
}
