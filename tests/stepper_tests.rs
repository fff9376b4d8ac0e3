use jelly::{
    NoOpStepObserver, PhysicsError, SoftBody, SolverConfig, Stepper, TetMesh, TracingStepObserver,
    Vec3,
};

fn body_at(y: f64) -> SoftBody<f64> {
    SoftBody::new(TetMesh::cuboid(Vec3::new(0.0, y, 0.0), 2, 2, 2, 0.25).with_name("box")).unwrap()
}

#[test]
fn advance_with_frame_dt_matches_frame() {
    let mut a = body_at(1.0);
    let mut b = body_at(1.0);
    let mut sa = Stepper::new(SolverConfig::new()).unwrap();
    let mut sb = Stepper::new(SolverConfig::new()).unwrap();
    let dt = sb.config().frame_dt;

    for _ in 0..20 {
        sa.frame(&mut a, &mut NoOpStepObserver);
        sb.advance(&mut b, dt, &mut NoOpStepObserver).unwrap();
    }

    assert_eq!(a.positions(), b.positions());
    assert_eq!(sa.frames(), sb.frames());
}

#[test]
fn advance_rejects_non_finite_dt() {
    let mut body = body_at(1.0);
    let before = body.positions().to_vec();
    let mut stepper = Stepper::new(SolverConfig::new()).unwrap();

    for dt in [0.0, f64::NAN, f64::INFINITY] {
        assert_eq!(
            stepper.advance(&mut body, dt, &mut NoOpStepObserver),
            Err(PhysicsError::InvalidTimestep)
        );
    }
    assert_eq!(body.positions(), &before[..]);
    assert_eq!(stepper.frames(), 0);
}

#[test]
fn tracing_observer_counts_phases() {
    let mut body = body_at(1.0);
    let mut stepper = Stepper::new(SolverConfig::new().with_sub_steps(4)).unwrap();
    let mut observer = TracingStepObserver::new();

    for _ in 0..3 {
        stepper.frame(&mut body, &mut observer);
    }

    assert_eq!(observer.substeps(), 12);
    assert_eq!(observer.frames(), 3);
}

#[test]
fn raised_ground_catches_the_body() {
    let mut body = body_at(1.5);
    let mut stepper = Stepper::new(SolverConfig::new().with_ground_height(0.5)).unwrap();

    for _ in 0..90 {
        stepper.frame(&mut body, &mut NoOpStepObserver);
    }

    let min_y = body.positions().chunks(3).map(|p| p[1]).fold(f64::INFINITY, f64::min);
    assert!(min_y > 0.45 && min_y < 0.7, "lowest point at {}", min_y);
}

#[test]
fn inverse_mass_overrides_are_checked() {
    let mut body = body_at(0.0);
    let count = body.particle_count();

    assert_eq!(
        body.set_inv_mass(count, 1.0),
        Err(PhysicsError::ParticleOutOfBounds { index: count, count })
    );
    assert_eq!(body.set_inv_mass(0, -1.0), Err(PhysicsError::InvalidMass));
    assert_eq!(body.set_inv_mass(0, f64::NAN), Err(PhysicsError::InvalidMass));
    assert!(body.fix_particle(count + 3).is_err());

    body.set_inv_mass(0, 2.5).unwrap();
    assert_eq!(body.inv_mass(0), 2.5);
}
