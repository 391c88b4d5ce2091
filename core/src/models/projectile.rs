use serde::{Deserialize, Serialize};

use crate::constants::STANDARD_GRAVITY;
use crate::prelude::{ensure_finite, ModelResult, PhysicsModel};

pub const DEFAULT_TRAJECTORY_STEPS: usize = 120;

/// Launch from ground level with no air resistance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileLaunch {
    pub speed_ms: f64,
    pub angle_deg: f64,
    /// Time of interest, clamped to the flight.
    pub time_s: f64,
    pub trajectory_steps: usize,
}

impl Default for ProjectileLaunch {
    fn default() -> Self {
        Self {
            speed_ms: 20.0,
            angle_deg: 45.0,
            time_s: 0.0,
            trajectory_steps: DEFAULT_TRAJECTORY_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    pub horizontal_speed: f64,
    pub vertical_speed: f64,
    pub time_of_flight: f64,
    pub range: f64,
    pub max_height: f64,
    /// Time actually evaluated after clamping into `[0, time_of_flight]`.
    pub time_s: f64,
    pub position: Point2,
    pub velocity: Point2,
    pub trajectory: Vec<Point2>,
}

impl PhysicsModel for ProjectileLaunch {
    type Output = ProjectileState;

    fn evaluate(&self) -> ModelResult<ProjectileState> {
        let speed = ensure_finite("speed", self.speed_ms)?.max(0.0);
        let angle = ensure_finite("angle", self.angle_deg)?.clamp(0.0, 90.0);
        let time = ensure_finite("time", self.time_s)?;
        let g = STANDARD_GRAVITY;

        let theta = angle.to_radians();
        let ux = speed * theta.cos();
        let uy = speed * theta.sin();

        let time_of_flight = if uy > 0.0 { 2.0 * uy / g } else { 0.0 };
        let range = ux * time_of_flight;
        let max_height = uy * uy / (2.0 * g);

        let t = time.clamp(0.0, time_of_flight);
        let height = |t: f64| uy * t - 0.5 * g * t * t;

        let steps = self.trajectory_steps.max(1);
        let trajectory = (0..=steps)
            .map(|i| {
                let ti = time_of_flight * i as f64 / steps as f64;
                Point2 {
                    x: ux * ti,
                    y: height(ti).max(0.0),
                }
            })
            .collect();

        Ok(ProjectileState {
            horizontal_speed: ux,
            vertical_speed: uy,
            time_of_flight,
            range,
            max_height,
            time_s: t,
            position: Point2 {
                x: ux * t,
                y: height(t).max(0.0),
            },
            velocity: Point2 {
                x: ux,
                y: uy - g * t,
            },
            trajectory,
        })
    }
}
