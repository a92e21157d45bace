//! Screen geometry cache.
//!
//! Geometry is read from the host once and reused until the host reports a
//! configuration change (rotation, window resize, display switch).

use crate::error::Result;
use log::debug;
use parking_lot::Mutex;

/// Screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGeometry {
    pub width: f32,
    pub height: f32,
}

impl ScreenGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Host collaborator that reports the current window bounds.
pub trait GeometryProvider: Send + Sync {
    fn current_bounds(&self) -> Result<ScreenGeometry>;
}

/// Fixed bounds, for hosts with a single non-rotating display and for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeometry(pub ScreenGeometry);

impl GeometryProvider for FixedGeometry {
    fn current_bounds(&self) -> Result<ScreenGeometry> {
        Ok(self.0)
    }
}

/// Lazily populated screen geometry, shared between the dispatcher and the
/// session that forwards configuration changes.
pub struct GeometryCache {
    provider: Box<dyn GeometryProvider>,
    cached: Mutex<Option<ScreenGeometry>>,
}

impl GeometryCache {
    pub fn new(provider: Box<dyn GeometryProvider>) -> Self {
        Self {
            provider,
            cached: Mutex::new(None),
        }
    }

    /// Return the cached geometry, querying the provider on a miss.
    ///
    /// The lock is held across the provider call so concurrent misses share one
    /// query. Failures are returned and not cached.
    pub fn resolve(&self) -> Result<ScreenGeometry> {
        let mut cached = self.cached.lock();
        if let Some(geometry) = *cached {
            return Ok(geometry);
        }

        let geometry = self.provider.current_bounds()?;
        debug!(
            "screen geometry cached: {}x{}",
            geometry.width, geometry.height
        );
        *cached = Some(geometry);
        Ok(geometry)
    }

    /// Drop the cached geometry; the next `resolve` repopulates it.
    pub fn invalidate(&self) {
        if self.cached.lock().take().is_some() {
            debug!("screen geometry cache invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.lock().is_some()
    }
}
