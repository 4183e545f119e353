use crate::entities::Viewport;

/// Tunables for one game session.  Per-kind object tuning lives in
/// [`crate::pool`].
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Plane movement in cells per frame per held direction.
    pub plane_speed: f32,
    /// Fuel at the start of a run; one unit burns per second.
    pub initial_fuel: u32,
    /// Fuel added per parachute.
    pub fuel_step: u32,
    pub viewport: Viewport,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            plane_speed: 0.8,
            initial_fuel: 10,
            fuel_step: 5,
            viewport: Viewport {
                width: 78.0,
                height: 20.0,
            },
        }
    }
}
