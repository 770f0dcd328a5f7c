use deepspace_common::{Heading, ViewConfig};
use deepspace_render::Frustum;
use glam::IVec3;

/// Where the viewer is and what it can see.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub position: IVec3,
    pub frustum: Frustum,
    /// Always `North`; the view never rotates.
    pub heading: Heading,
    /// Base-size-to-pixel multiplier.
    pub size_scale: f32,
    /// Depth at which rendered size reaches zero.
    pub distance_scale: f32,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

impl ViewerState {
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            position: config.start,
            frustum: Frustum::new(
                config.frustum_width,
                config.frustum_height,
                config.frustum_depth,
            ),
            heading: Heading::North,
            size_scale: config.size_scale,
            distance_scale: config.distance_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_viewer() {
        let v = ViewerState::default();
        assert_eq!(v.position, IVec3::new(500, 500, 0));
        assert_eq!(v.frustum, Frustum::new(600, 600, 250));
        assert_eq!(v.heading, Heading::North);
        assert_eq!(v.size_scale, 4.0);
        assert_eq!(v.distance_scale, 400.0);
    }
}
