//! Scene context: the generated moon, the physics world and the rover.
//!
//! The host calls [`Simulation::tick`] once per frame. Nothing here owns a
//! timer or a thread; all progress comes from those calls.

use engine_core::{FrameClock, Quat, Transform};
use physics::{
    BodyState, CentralGravity, CollisionGroup, GravityIntegrator, PhysicsWorld, RigidBodyHandle,
    SurfaceMaterial,
};
use procgen::{MeshError, Moon, MoonGenerator};
use std::fmt;
use std::time::Duration;

use crate::camera::CameraPose;
use crate::config::{SceneConfig, StepMode};
use crate::loader::{AssetLoader, RoverAsset};
use crate::rover::RoverState;

/// Human-readable readout for an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStatus {
    pub distance_from_center: f32,
    /// Rover center height above the moon collider, if the probe hit it.
    pub altitude: Option<f32>,
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance from center: {:.2} units", self.distance_from_center)
    }
}

/// Result of one tick with an active rover.
#[derive(Debug, Clone, Copy)]
pub struct TickOutput {
    pub rover: BodyState,
    pub camera: CameraPose,
    pub status: SimulationStatus,
    /// Physics steps taken this tick.
    pub steps: u32,
}

/// Owns everything the scene mutates between frames.
pub struct Simulation {
    config: SceneConfig,
    moon: Moon,
    world: PhysicsWorld,
    moon_body: Option<RigidBodyHandle>,
    rover: RoverState,
    loader: Box<dyn AssetLoader>,
    integrator: GravityIntegrator,
    clock: FrameClock,
    running: bool,
}

impl Simulation {
    /// Generate the moon from `config.terrain` and build the scene around it.
    pub fn new(config: SceneConfig, loader: Box<dyn AssetLoader>) -> Result<Self, MeshError> {
        let moon = MoonGenerator::new(config.terrain.clone()).generate()?;
        Ok(Self::with_moon(config, moon, loader))
    }

    /// Build the scene around an already generated moon.
    pub fn with_moon(config: SceneConfig, moon: Moon, loader: Box<dyn AssetLoader>) -> Self {
        let mut world = PhysicsWorld::new();
        let moon_body = world.add_static_body(glam::Vec3::ZERO);
        world.add_sphere_collider(
            moon_body,
            config.moon_collider_radius,
            SurfaceMaterial::REGOLITH,
            CollisionGroup::Terrain,
        );

        let integrator = GravityIntegrator::new(CentralGravity::new(config.physics.gravity_strength));
        let clock = FrameClock::with_timestep(config.physics.dt, config.physics.max_steps_per_frame);

        log::info!(
            "Scene ready: moon with {} vertices, {} craters; waiting for rover",
            moon.mesh.vertex_count(),
            moon.craters.len()
        );

        Self {
            config,
            moon,
            world,
            moon_body: Some(moon_body),
            rover: RoverState::Unloaded,
            loader,
            integrator,
            clock,
            running: true,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn moon(&self) -> &Moon {
        &self.moon
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn rover_state(&self) -> &RoverState {
        &self.rover
    }

    /// False after [`Simulation::shutdown`]; the driver should stop scheduling ticks.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one frame that lasted `frame_delta`.
    ///
    /// Returns `None` while the rover is not active (still loading, failed to
    /// load, or the scene is shut down).
    pub fn tick(&mut self, frame_delta: Duration) -> Option<TickOutput> {
        if !self.running {
            return None;
        }
        if matches!(self.rover, RoverState::Unloaded) {
            self.poll_loader();
        }
        let rover = self.rover.handle()?;

        let dt = self.config.physics.dt;
        let mut steps = 0;
        let mut state = None;
        match self.config.physics.step_mode {
            StepMode::PerFrame => {
                state = self.integrator.step(&mut self.world, rover, dt);
                steps = 1;
            }
            StepMode::Accumulated => {
                self.clock.advance(frame_delta);
                while self.clock.should_fixed_update() {
                    state = self.integrator.step(&mut self.world, rover, dt);
                    steps += 1;
                }
            }
        }

        let state = match state {
            Some(state) => state,
            None => self.resting_state(rover)?,
        };

        if steps == 0 {
            self.world.update_query_pipeline();
        }
        let position = state.transform.position;
        let status = SimulationStatus {
            distance_from_center: position.length(),
            altitude: self.world.surface_altitude(rover),
        };
        log::trace!("{} ({} steps)", status, steps);

        Some(TickOutput {
            rover: state,
            camera: self.config.camera.pose_for(position),
            status,
            steps,
        })
    }

    /// Stop ticking and release every body in the physics world.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(rover) = self.rover.handle() {
            self.world.remove_body(rover);
        }
        if let Some(moon) = self.moon_body.take() {
            self.world.remove_body(moon);
        }
        self.rover = RoverState::Unloaded;
        log::info!("Scene shut down after {} frames", self.clock.frame_count());
    }

    fn poll_loader(&mut self) {
        match self.loader.poll() {
            None => {}
            Some(Ok(asset)) => {
                let handle = self.spawn_rover(&asset);
                log::info!("Rover '{}' loaded; simulation active", asset.name);
                self.rover = RoverState::Active(handle);
            }
            Some(Err(e)) => {
                log::warn!("Rover failed to load: {}", e);
                self.rover = RoverState::LoadFailed(e);
            }
        }
    }

    fn spawn_rover(&mut self, asset: &RoverAsset) -> RigidBodyHandle {
        let rover = &self.config.rover;
        let handle = self
            .world
            .add_dynamic_body(rover.start_position, Quat::from_rotation_y(rover.yaw));
        self.world.add_box_collider(
            handle,
            asset.half_extents,
            rover.mass,
            SurfaceMaterial::REGOLITH,
            CollisionGroup::Rover,
        );
        handle
    }

    /// Rover state without stepping (an accumulated frame too short for a step).
    fn resting_state(&self, rover: RigidBodyHandle) -> Option<BodyState> {
        let transform: Transform = self.world.body_transform(rover)?;
        Some(BodyState {
            distance_from_center: transform.distance_from_origin(),
            transform,
            linear_velocity: self.world.linear_velocity(rover)?,
            applied_force: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DelayedLoader, LoadError};
    use glam::Vec3;
    use procgen::MoonConfig;

    const FRAME: Duration = Duration::from_millis(16);

    fn small_config() -> SceneConfig {
        SceneConfig {
            terrain: MoonConfig {
                width_segments: 16,
                height_segments: 8,
                seed: Some(1),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn scene(config: SceneConfig, loader: DelayedLoader) -> Simulation {
        Simulation::new(config, Box::new(loader)).unwrap()
    }

    #[test]
    fn ticks_are_noops_until_rover_loads() {
        let mut sim = scene(small_config(), DelayedLoader::ready(3, RoverAsset::default()));
        for _ in 0..3 {
            assert!(sim.tick(FRAME).is_none());
            assert_eq!(sim.rover_state(), &RoverState::Unloaded);
            assert_eq!(sim.world().body_count(), 1);
        }
        let out = sim.tick(FRAME).unwrap();
        assert!(sim.rover_state().is_active());
        assert_eq!(sim.world().body_count(), 2);
        assert_eq!(out.steps, 1);
        assert!(out.rover.applied_force.is_some());
    }

    #[test]
    fn load_failure_is_a_terminal_state() {
        let error = LoadError::Decode {
            path: "rover.glb".into(),
            reason: "truncated".into(),
        };
        let mut sim = scene(small_config(), DelayedLoader::failing(1, error.clone()));
        assert!(sim.tick(FRAME).is_none());
        assert!(sim.tick(FRAME).is_none());
        assert_eq!(sim.rover_state(), &RoverState::LoadFailed(error));
        assert!(sim.tick(FRAME).is_none());
        assert_eq!(sim.world().body_count(), 1);
    }

    /// The rover falls from its spawn point and comes to rest on the collider.
    #[test]
    fn rover_falls_onto_moon() {
        let mut sim = scene(small_config(), DelayedLoader::ready(0, RoverAsset::default()));
        let first = sim.tick(FRAME).unwrap();
        assert!(first.status.distance_from_center < 1.5);

        let mut last = first;
        for _ in 0..600 {
            last = sim.tick(FRAME).unwrap();
        }
        let d = last.status.distance_from_center;
        assert!(d > 1.0 && d < 1.3, "rover settled at distance {}", d);
    }

    #[test]
    fn per_frame_mode_ignores_frame_delta() {
        let mut sim = scene(small_config(), DelayedLoader::ready(0, RoverAsset::default()));
        assert_eq!(sim.tick(Duration::from_secs(1)).unwrap().steps, 1);
        assert_eq!(sim.tick(Duration::ZERO).unwrap().steps, 1);
    }

    #[test]
    fn accumulated_mode_follows_elapsed_time() {
        let mut config = small_config();
        config.physics.step_mode = StepMode::Accumulated;
        let mut sim = scene(config, DelayedLoader::ready(0, RoverAsset::default()));

        let idle = sim.tick(Duration::ZERO).unwrap();
        assert_eq!(idle.steps, 0);
        assert_eq!(idle.rover.linear_velocity, Vec3::ZERO);
        assert_eq!(idle.rover.transform.position, Vec3::new(0.0, 1.5, 0.0));

        let busy = sim.tick(Duration::from_millis(51)).unwrap();
        assert_eq!(busy.steps, 3);
    }

    /// Camera target does not depend on which way the rover faces.
    #[test]
    fn camera_target_ignores_rover_orientation() {
        let mut a_config = small_config();
        a_config.rover.yaw = 0.0;
        let mut b_config = small_config();
        b_config.rover.yaw = 2.5;

        let mut a = scene(a_config, DelayedLoader::ready(0, RoverAsset::default()));
        let mut b = scene(b_config, DelayedLoader::ready(0, RoverAsset::default()));
        let pa = a.tick(FRAME).unwrap();
        let pb = b.tick(FRAME).unwrap();
        assert_eq!(pa.camera.target, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(pa.camera.target, pb.camera.target);
        assert!((pa.camera.position - pb.camera.position).length() < 1e-5);
    }

    #[test]
    fn shutdown_releases_world() {
        let mut sim = scene(small_config(), DelayedLoader::ready(0, RoverAsset::default()));
        assert!(sim.tick(FRAME).is_some());
        sim.shutdown();
        assert!(!sim.is_running());
        assert_eq!(sim.world().body_count(), 0);
        assert!(sim.tick(FRAME).is_none());
    }

    #[test]
    fn status_reads_like_overlay() {
        let status = SimulationStatus {
            distance_from_center: 1.5,
            altitude: Some(0.5),
        };
        assert_eq!(status.to_string(), "Distance from center: 1.50 units");
    }

    #[test]
    fn probe_reports_altitude_at_spawn() {
        let mut config = small_config();
        config.physics.step_mode = StepMode::Accumulated;
        let mut sim = scene(config, DelayedLoader::ready(0, RoverAsset::default()));
        let out = sim.tick(Duration::ZERO).unwrap();
        assert_eq!(out.steps, 0);
        let altitude = out.status.altitude.unwrap();
        assert!((altitude - 0.5).abs() < 1e-4);
    }
}
