//! Renderer configuration.
use crate::error::{Error, Result};
use crate::geometry::affine::SINGULAR_EPSILON;

/// Configuration for [`crate::render::renderer::TilingRenderer`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Upper bound on emitted instances and on placements of a single
    /// destination within one cell. Exceeding it fails the render.
    pub max_instances: usize,
    /// Relative determinant threshold below which a transform is singular.
    pub singular_epsilon: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_instances: 100_000,
            singular_epsilon: SINGULAR_EPSILON,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the instance limit.
    pub fn with_max_instances(mut self, max_instances: usize) -> Self {
        self.max_instances = max_instances;
        self
    }

    /// Sets the singularity threshold.
    pub fn with_singular_epsilon(mut self, singular_epsilon: f64) -> Self {
        self.singular_epsilon = singular_epsilon;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.max_instances == 0 {
            return Err(Error::InvalidConfig("max_instances must be > 0".into()));
        }
        if !self.singular_epsilon.is_finite() || self.singular_epsilon < 0.0 {
            return Err(Error::InvalidConfig(
                "singular_epsilon must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.max_instances, 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_instance_limit_is_rejected() {
        let err = RenderConfig::new().with_max_instances(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn negative_epsilon_is_rejected() {
        let config = RenderConfig::new().with_singular_epsilon(-1.0);
        assert!(config.validate().is_err());
        let config = RenderConfig::new().with_singular_epsilon(f64::NAN);
        assert!(config.validate().is_err());
    }
}
