use jelly::{NoOpStepObserver, SoftBody, SolverConfig, Stepper, TetMesh, Vec3};

fn cuboid(origin: Vec3<f64>) -> SoftBody<f64> {
    SoftBody::new(TetMesh::cuboid(origin, 3, 2, 2, 0.25)).unwrap()
}

/// A single free particle with no constraints attached.
fn lone_particle(p: Vec3<f64>) -> SoftBody<f64> {
    let mesh = TetMesh::new(vec![p.x, p.y, p.z], vec![], vec![], vec![]);
    let mut body = SoftBody::new(mesh).unwrap();
    body.set_inv_mass(0, 1.0).unwrap();
    body
}

#[test]
fn every_particle_of_a_sound_mesh_has_mass() {
    let body = cuboid(Vec3::zero());
    assert_eq!(body.degenerate_tet_count(), 0);
    for (i, &w) in body.inv_masses().iter().enumerate() {
        assert!(w > 0.0, "particle {} has inverse mass {}", i, w);
    }
    assert!((body.rest_volume() - 0.75 * 0.5 * 0.5).abs() < 1e-12);
}

#[test]
fn body_at_rest_stays_at_rest() {
    let mut body = cuboid(Vec3::new(0.0, 0.0, 0.0));
    let initial = body.positions().to_vec();
    let config = SolverConfig::new().without_gravity();

    body.step(1.0 / 600.0, &config, &mut NoOpStepObserver);

    for (a, b) in initial.iter().zip(body.positions()) {
        assert!((a - b).abs() < 1e-12, "moved from {} to {}", a, b);
    }
    assert!(body.velocities().iter().all(|v| v.abs() < 1e-9));
}

#[test]
fn fixed_particles_never_move() {
    let mut body = cuboid(Vec3::new(0.0, 1.0, 0.0));
    let fixed = [0, 3, 7];
    for &i in &fixed {
        body.fix_particle(i).unwrap();
    }
    let before: Vec<_> = fixed.iter().map(|&i| body.position(i)).collect();

    let mut stepper = Stepper::new(SolverConfig::new()).unwrap();
    for _ in 0..30 {
        stepper.frame(&mut body, &mut NoOpStepObserver);
    }

    for (k, &i) in fixed.iter().enumerate() {
        assert_eq!(body.position(i), before[k], "fixed particle {} moved", i);
    }
    // The rest of the body hangs below its anchors.
    let free_y: f64 = (0..body.particle_count())
        .filter(|i| !fixed.contains(i))
        .map(|i| body.position(i).y)
        .fold(f64::INFINITY, f64::min);
    assert!(free_y < 1.0);
}

#[test]
fn ground_clamp_reverts_horizontal_motion() {
    let start = Vec3::new(0.3, 0.0005, -0.2);
    let mut body = lone_particle(start);
    // Sideways gravity would drag the particle along x if it were not reverted.
    let config = SolverConfig::new().with_gravity(Vec3::new(5.0, -10.0, 0.0));
    let dt = 0.01;

    body.step(dt, &config, &mut NoOpStepObserver);

    let p = body.position(0);
    assert_eq!(p.y, 0.0);
    assert_eq!(p.x, start.x);
    assert_eq!(p.z, start.z);
}

#[test]
fn particle_above_ground_falls_freely() {
    let mut body = lone_particle(Vec3::new(0.0, 1.0, 0.0));
    let config = SolverConfig::new();
    let dt = 0.01;
    for _ in 0..10 {
        body.step(dt, &config, &mut NoOpStepObserver);
    }
    // Symplectic Euler: y = 1 - g * dt^2 * n(n+1)/2
    let expected = 1.0 - 10.0 * dt * dt * 55.0;
    assert!((body.position(0).y - expected).abs() < 1e-9);
    assert!((body.velocity(0).y + 10.0 * dt * 10.0).abs() < 1e-9);
}

#[test]
fn velocity_is_backward_difference_of_substep() {
    let mut body = cuboid(Vec3::new(0.0, 0.02, 0.0));
    let config = SolverConfig::new();
    let dt = 1.0 / 600.0;
    let mut stepper = Stepper::new(config.clone()).unwrap();
    for _ in 0..5 {
        stepper.frame(&mut body, &mut NoOpStepObserver);
    }

    body.step(dt, &config, &mut NoOpStepObserver);

    let pos = body.positions();
    let prev = body.prev_positions();
    let vel = body.velocities();
    for i in 0..3 * body.particle_count() {
        let expected = (pos[i] - prev[i]) / dt;
        assert!(
            (vel[i] - expected).abs() < 1e-9 * (1.0 + expected.abs()),
            "component {}: velocity {} vs {}",
            i, vel[i], expected
        );
    }
}

#[test]
fn falling_box_lands_and_keeps_its_volume() {
    let mut body = cuboid(Vec3::new(0.0, 1.0, 0.0));
    let rest = body.rest_volume();
    let mut stepper = Stepper::new(SolverConfig::new()).unwrap();

    for _ in 0..120 {
        stepper.frame(&mut body, &mut NoOpStepObserver);
    }

    assert!(body.positions().iter().all(|c| c.is_finite()));
    let min_y = body.positions().chunks(3).map(|p| p[1]).fold(f64::INFINITY, f64::min);
    assert!(min_y > -0.05, "sank through the ground to {}", min_y);
    assert!(min_y < 0.2, "did not land, lowest point at {}", min_y);
    let ratio = body.volume() / rest;
    assert!((ratio - 1.0).abs() < 0.05, "volume ratio {}", ratio);
}

#[test]
fn nearest_particle_scans_current_positions() {
    let mut body = cuboid(Vec3::zero());
    assert_eq!(body.nearest_particle(Vec3::new(-1.0, -1.0, -1.0)), Some(0));

    body.set_position(5, Vec3::new(10.0, 10.0, 10.0));
    assert_eq!(body.nearest_particle(Vec3::new(9.0, 9.0, 9.0)), Some(5));
}

#[test]
fn renderer_can_edit_positions_in_place() {
    let mut body = cuboid(Vec3::zero());
    body.positions_mut()[1] = 2.0;
    assert_eq!(body.position(0).y, 2.0);
    assert_eq!(body.surface_triangles().len() % 3, 0);
    assert!(!body.surface_triangles().is_empty());
}

#[test]
fn unusable_substep_leaves_body_untouched() {
    let mut body = cuboid(Vec3::new(0.0, 1.0, 0.0));
    let config = SolverConfig::new();
    let mut stepper = Stepper::new(config.clone()).unwrap();
    stepper.frame(&mut body, &mut NoOpStepObserver);
    let pos = body.positions().to_vec();
    let vel = body.velocities().to_vec();

    for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
        body.step(dt, &config, &mut NoOpStepObserver);
    }

    assert_eq!(body.positions(), &pos[..]);
    assert_eq!(body.velocities(), &vel[..]);
    assert!(body.velocities().iter().all(|v| v.is_finite()));
}
