//! Orbit camera driven by mouse drags and wheel steps.
//!
//! The camera only ever rotates about its focus point or moves along its look direction. The up
//! direction is pinned to world Z, so the view never rolls.

use canopy_layout::geometry;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CameraOptions {
    /// Drag distance in pixels that maps to a full 360° turn.
    pub sensitivity_px: f64,
    /// Zooming in stops at this distance from the focus.
    pub min_distance: f64,
    /// Pitch steps that would bring the camera closer than this to the vertical axis through the
    /// focus are rejected.
    pub min_pole_distance: f64,
    /// Fraction of the current focus distance covered by one wheel step.
    pub zoom_fraction: f64,
    /// Distance used before any layout has been framed.
    pub initial_distance: f64,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            sensitivity_px: 700.0,
            min_distance: 20.0,
            min_pole_distance: 1.0,
            zoom_fraction: 0.1,
            initial_distance: 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    position: Point3<f64>,
    focus: Point3<f64>,
    look_direction: Vector3<f64>,
    up_direction: Vector3<f64>,
    options: CameraOptions,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraOptions::default())
    }
}

impl OrbitCamera {
    /// Camera on the `(1, 1, 1)` diagonal at `options.initial_distance`, looking at the origin.
    pub fn new(options: CameraOptions) -> Self {
        let mut camera = Self {
            position: Point3::origin(),
            focus: Point3::origin(),
            look_direction: Vector3::zeros(),
            up_direction: Vector3::z(),
            options,
        };
        camera.place_on_diagonal(camera.options.initial_distance);
        camera
    }

    /// Default options, placed on the diagonal at `distance` from the origin.
    pub fn at_distance(distance: f64) -> Self {
        let mut camera = Self::default();
        camera.place_on_diagonal(distance);
        camera
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Unnormalized vector from the camera to its focus.
    pub fn look_direction(&self) -> Vector3<f64> {
        self.look_direction
    }

    pub fn up_direction(&self) -> Vector3<f64> {
        self.up_direction
    }

    pub fn focus(&self) -> Point3<f64> {
        self.focus
    }

    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    pub fn distance(&self) -> f64 {
        geometry::distance(&self.position, &self.focus)
    }

    pub fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
        self.sync_orientation();
    }

    pub fn look_at(&mut self, focus: Point3<f64>) {
        self.focus = focus;
        self.sync_orientation();
    }

    /// Moves the camera to the diagonal above the focus at `distance`.
    pub fn place_on_diagonal(&mut self, distance: f64) {
        let d = (distance * distance / 3.0).sqrt();
        self.set_position(self.focus + Vector3::new(d, d, d));
    }

    fn sync_orientation(&mut self) {
        self.look_direction = self.focus - self.position;
        self.up_direction = Vector3::z();
    }

    /// Orbits by a mouse drag of `(dx, dy)` pixels: `dy` pitches about the horizontal axis
    /// perpendicular to the view, `dx` yaws about world Z through the focus.
    ///
    /// Returns `false` when the pitch part was rejected because it would carry the camera over the
    /// pole. The yaw part is applied either way.
    pub fn rotate(&mut self, dx: f64, dy: f64) -> bool {
        let turn = self.options.sensitivity_px;
        if !(turn.is_finite() && turn > 0.0) || !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let theta = dx / turn * 360.0;
        let phi = dy / turn * 360.0;

        let mut pitched = true;
        let mut position = self.position;
        if phi != 0.0 {
            match self.pitch(phi) {
                Some(p) => position = p,
                None => {
                    pitched = false;
                    tracing::trace!(phi, "pitch rejected at pole");
                }
            }
        }
        if theta != 0.0 {
            position = geometry::rotate_about_center(position, self.focus, &Vector3::z(), theta);
        }

        self.position = position;
        self.sync_orientation();
        pitched
    }

    fn pitch(&self, phi: f64) -> Option<Point3<f64>> {
        let offset = self.position - self.focus;
        let before = horizontal(&offset);
        if before.norm() < EPS {
            // Sitting on the pole: any tilt moves away from it.
            return Some(geometry::rotate_about_center(
                self.position,
                self.focus,
                &Vector3::x(),
                phi,
            ));
        }

        let axis = Vector3::z().cross(&(self.focus - self.position));
        let candidate = geometry::rotate_about_center(self.position, self.focus, &axis, phi);
        let after = horizontal(&(candidate - self.focus));
        let flipped = before.dot(&after) <= 0.0;
        let too_close = after.norm() < self.options.min_pole_distance.min(before.norm());
        if flipped || too_close {
            None
        } else {
            Some(candidate)
        }
    }

    /// Moves along the look direction by `zoom_fraction` of the focus distance, forward for a
    /// positive `wheel_delta`. Returns `false` (and leaves the camera alone) when the move would
    /// end closer than `min_distance` to the focus.
    pub fn zoom(&mut self, wheel_delta: f64) -> bool {
        if wheel_delta == 0.0 || !wheel_delta.is_finite() {
            return false;
        }
        let Some(direction) = self.look_direction.try_normalize(EPS) else {
            return false;
        };
        let step = self.distance() * self.options.zoom_fraction * wheel_delta.signum();
        let candidate = self.position + direction * step;
        if geometry::distance(&candidate, &self.focus) < self.options.min_distance {
            tracing::trace!(step, "zoom rejected at minimum distance");
            return false;
        }
        self.position = candidate;
        self.sync_orientation();
        true
    }
}

fn horizontal(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, v.y, 0.0)
}
