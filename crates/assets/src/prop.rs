use brickyard_common::{Aabb, Transform};
use brickyard_layout::{ScaleFit, auto_scale_to_height, auto_scale_to_longest};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::AssetError;
use crate::model::load_document;

/// How a model is normalised before placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FitMode {
    Height(f32),
    Longest(f32),
}

impl Default for FitMode {
    /// Longest side of 2 units.
    fn default() -> Self {
        FitMode::Longest(2.0)
    }
}

impl FitMode {
    pub fn fit(&self, bounds: &Aabb) -> ScaleFit {
        match *self {
            FitMode::Height(h) => auto_scale_to_height(bounds, h),
            FitMode::Longest(l) => auto_scale_to_longest(bounds, l),
        }
    }
}

/// A model sized and placed in the yard.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: String,
    /// Bounds as authored.
    pub source_bounds: Aabb,
    pub fit: ScaleFit,
    /// Root transform for the renderer.
    pub transform: Transform,
    /// World-space bounds after fitting and placement; the collision footprint.
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropLoader {
    pub fit: FitMode,
}

impl PropLoader {
    pub fn new(fit: FitMode) -> Self {
        Self { fit }
    }

    /// Normalise `source_bounds` and stand the model on the ground at `anchor` (x, z).
    pub fn place(&self, name: impl Into<String>, source_bounds: Aabb, anchor: Vec3) -> Prop {
        let ground = Vec3::new(anchor.x, 0.0, anchor.z);
        let fit = self.fit.fit(&source_bounds);
        let placed = fit.then(&ScaleFit {
            scale: 1.0,
            translation: ground,
        });
        Prop {
            name: name.into(),
            source_bounds,
            fit,
            transform: fit.to_transform(ground),
            bounds: placed.apply_to_bounds(&source_bounds),
        }
    }

    pub fn load(&self, path: impl AsRef<Path>, anchor: Vec3) -> Result<Prop, AssetError> {
        let path = path.as_ref();
        let bounds = load_document(path)?.bounds()?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "prop".into());
        let prop = self.place(name, bounds, anchor);
        tracing::info!(name = %prop.name, scale = prop.fit.scale, "prop loaded");
        Ok(prop)
    }

    /// Like [`PropLoader::load`], but a failure is logged and skipped.
    pub fn load_or_skip(&self, path: impl AsRef<Path>, anchor: Vec3) -> Option<Prop> {
        let path = path.as_ref();
        match self.load(path, anchor) {
            Ok(prop) => Some(prop),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "prop skipped");
                None
            }
        }
    }
}
