use glam::{Vec2, Vec3};
use portfolio_wasm::camera::PerspectiveCamera;
use portfolio_wasm::particles::{blend_opacity, FieldParams, ParticleField};
use portfolio_wasm::viewer::{ViewerParams, ViewerState};
use portfolio_wasm::wave::{WaveParams, WaveSurface};

#[test]
fn temperature_stays_in_unit_range() {
    let mut viewer = ViewerState::new(ViewerParams::default());
    for frame in 0..20_000 {
        let inputs = viewer.tick(f64::from(frame) / 60.0);
        assert!((0.0..=1.0).contains(&inputs.temperature), "frame {frame}: {}", inputs.temperature);
    }
}

#[test]
fn opacity_blend_contracts_toward_target() {
    let target = 0.3;
    let mut current = 1.0_f32;
    let mut gap = (current - target).abs();
    for _ in 0..200 {
        current = blend_opacity(current, target, 0.05);
        let next = (current - target).abs();
        assert!(next < gap || next == 0.0);
        gap = next;
    }
    assert!(gap < 1e-3);
}

#[test]
fn bump_peaks_under_the_pointer() {
    let params = WaveParams::default();
    let pointer = Vec2::new(0.25, -0.5);
    let under = params.pointer_center(pointer);
    // sin(4 * 0.3) > 0: bump is raised
    let t = 0.3;
    let near = params.pointer_bump(under.x, under.y, t, pointer);
    for far in [Vec2::new(4.0, 4.0), Vec2::new(-4.0, 3.5), Vec2::new(3.9, -3.9)] {
        assert!(near >= params.pointer_bump(far.x, far.y, t, pointer));
    }
    assert!(near > 0.0);
}

#[test]
fn bump_appears_on_the_pointer_side_of_the_screen() {
    let params = WaveParams::default();
    let surface = WaveSurface::new(params.clone());
    let camera = PerspectiveCamera::looking_at(Vec3::new(0.0, 8.0, 15.0), Vec3::ZERO, 75.0, 1.0);
    let t = 0.3;

    for pointer in [Vec2::new(0.0, 0.8), Vec2::new(0.0, -0.8), Vec2::new(0.6, 0.0), Vec2::new(-0.6, 0.5)] {
        let peak = surface
            .rest_positions()
            .iter()
            .copied()
            .max_by(|a, b| {
                let ha = params.pointer_bump(a.x, a.z, t, pointer);
                let hb = params.pointer_bump(b.x, b.z, t, pointer);
                ha.total_cmp(&hb)
            })
            .unwrap();
        let ndc = camera.project(peak).unwrap();
        if pointer.x != 0.0 {
            assert_eq!(ndc.x.signum(), pointer.x.signum(), "pointer {pointer:?} peak {peak:?} ndc {ndc:?}");
        }
        if pointer.y != 0.0 {
            assert_eq!(ndc.y.signum(), pointer.y.signum(), "pointer {pointer:?} peak {peak:?} ndc {ndc:?}");
        }
    }
}

#[test]
fn whole_scene_runs_for_a_minute() {
    let mut viewer = ViewerState::new(ViewerParams::default());
    let mut surface = WaveSurface::new(WaveParams::default());
    let mut inner = ParticleField::new(FieldParams::inner());
    let mut outer = ParticleField::new(FieldParams::outer());

    viewer.set_pointer_client(600.0, 200.0, 1200.0, 800.0);
    for frame in 0..3600 {
        if frame == 600 {
            viewer.toggle_essence();
        }
        if frame % 900 == 0 {
            viewer.request_boost();
        }
        let inputs = viewer.tick(f64::from(frame) / 60.0);
        surface.update(&inputs);
        inner.update(&inputs);
        outer.update(&inputs);
    }

    assert!(surface.positions().iter().all(|p| p.is_finite()));
    assert!(surface.normals().iter().all(|n| (n.length() - 1.0).abs() < 1e-3));
    for field in [&inner, &outer] {
        assert!(field.opacities().iter().all(|o| (0.0..=1.0).contains(o)));
        assert!(field.positions().iter().all(|p| p.is_finite()));
    }
}
