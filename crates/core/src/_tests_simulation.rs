#![cfg(test)]

use super::environment::PmlConfig;
use super::grid::Grid2D;
use super::simulation::{run, EngineKind, SetupError, SimulationJob, Verbosity};
use super::source::{impulse_source, sine_source};

const ENGINES: [EngineKind; 3] = [
    EngineKind::NoPml,
    EngineKind::Berenger,
    EngineKind::Convolutional,
];

fn job30(engine: EngineKind) -> SimulationJob {
    SimulationJob::new(Grid2D::new(30, 30, 0.05, 0.05), 20, engine)
}

#[test]
fn engine_identifiers_round_trip() {
    for engine in ENGINES {
        let parsed: EngineKind = engine.identifier().parse().unwrap();
        assert_eq!(parsed, engine);
    }
    assert!(matches!(
        "pec".parse::<EngineKind>(),
        Err(SetupError::UnknownEngine(_))
    ));
}

#[test]
fn every_engine_returns_the_full_history_shape() {
    for engine in ENGINES {
        let history = run(&job30(engine), &sine_source, Verbosity::Quiet).unwrap();
        assert_eq!(history.shape(), (30, 30, 20), "engine {engine}");
    }
}

#[test]
fn every_engine_honours_the_hard_source() {
    for engine in ENGINES {
        let history = run(&job30(engine), &sine_source, Verbosity::Quiet).unwrap();
        for t in 0..20 {
            assert_eq!(history.get(15, 15, t), sine_source(t), "engine {engine}");
        }
    }
}

#[test]
fn reference_impulse_scenario() {
    let mut job = SimulationJob::new(Grid2D::new(20, 20, 0.05, 0.05), 5, EngineKind::NoPml);
    job.dt = 1e-10;
    job.source_point = (10, 10);
    let history = run(&job, &impulse_source, Verbosity::Quiet).unwrap();

    assert_eq!(history.get(10, 10, 0), 1.0);
    for ix in 0..20 {
        for iy in 0..20 {
            if (ix, iy) != (10, 10) {
                assert_eq!(history.get(ix, iy, 0), 0.0);
            }
        }
    }
}

#[test]
fn identical_jobs_produce_identical_histories() {
    for engine in ENGINES {
        let a = run(&job30(engine), &sine_source, Verbosity::Quiet).unwrap();
        let b = run(&job30(engine), &sine_source, Verbosity::Quiet).unwrap();
        assert_eq!(a, b, "engine {engine}");
    }
}

#[test]
fn setup_faults_are_rejected_before_stepping() {
    let mut job = job30(EngineKind::Berenger);
    job.grid = Grid2D::new(1, 30, 0.05, 0.05);
    assert!(matches!(job.validate(), Err(SetupError::GridTooSmall { .. })));

    let mut job = job30(EngineKind::NoPml);
    job.nt = 0;
    assert!(matches!(job.validate(), Err(SetupError::EmptyTimeAxis)));

    let mut job = job30(EngineKind::NoPml);
    job.dt = 0.0;
    assert!(matches!(job.validate(), Err(SetupError::NonPositiveDt(_))));

    let mut job = job30(EngineKind::Convolutional);
    job.source_point = (30, 5);
    assert!(matches!(
        job.validate(),
        Err(SetupError::SourceOutOfRange { .. })
    ));

    // Thickness 15 on a 30-cell grid: the two bands meet in the middle.
    let mut job = job30(EngineKind::Berenger);
    job.pml = PmlConfig {
        thickness: 15,
        ..PmlConfig::default()
    };
    assert!(matches!(job.validate(), Err(SetupError::PmlTooThick { .. })));

    // The plain engine ignores the PML configuration entirely.
    let mut job = job30(EngineKind::NoPml);
    job.pml.thickness = 15;
    assert!(job.validate().is_ok());
}

#[test]
fn absorbing_engines_swallow_an_outgoing_burst() {
    // A 30-step burst from the centre reaches the boundary around step 43
    // (the Courant step advances a front by dx/sqrt(2) per step). By step 240
    // an absorbed domain is quiet, while the reflecting box still rings.
    let grid = Grid2D::new(60, 60, 0.05, 0.05);
    let burst = |t: usize| if t < 30 { (t as f64 / 5.0).sin() } else { 0.0 };

    let residual = |engine: EngineKind| {
        let job = SimulationJob::new(grid, 240, engine);
        let history = run(&job, &burst, Verbosity::Quiet).unwrap();
        let last = history.shape().2 - 1;
        let mut max = 0.0_f64;
        for ix in 0..60 {
            for iy in 0..60 {
                max = max.max(history.get(ix, iy, last).abs());
            }
        }
        max
    };

    let reflecting = residual(EngineKind::NoPml);
    let berenger = residual(EngineKind::Berenger);
    let cpml = residual(EngineKind::Convolutional);

    assert!(reflecting > 0.02, "box should still ring, got {reflecting}");
    assert!(
        berenger < 0.05 * reflecting,
        "berenger residual {berenger} vs box {reflecting}"
    );
    assert!(
        cpml < 0.05 * reflecting,
        "cpml residual {cpml} vs box {reflecting}"
    );
}
