//! Point-cloud shapes and the immutable shape store.
//!
//! A [`Shape`] is an ordered list of instance positions plus one display
//! color. Index `i` of one shape corresponds to index `i` of every other
//! shape it morphs with; no correspondence solving is performed, so shapes
//! that morph into each other must have equal instance counts.

pub mod loader;
mod noise;
mod parse;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use glam::Vec3;
pub use noise::noise_positions;
pub use parse::parse_coordinates;
use rustc_hash::FxHashMap;

use crate::error::MorphError;

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// A named point cloud with a display color.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Unique shape name (e.g. `"teapot"`).
    pub name: String,
    /// Instance positions in index order.
    pub positions: Vec<Vec3>,
    /// Linear RGB display color.
    pub color: Vec3,
}

impl Shape {
    /// Shape from already-parsed positions.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        color: Vec3,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            color,
        }
    }

    /// Parse a shape from `x,y,z` coordinate text.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::ShapeLoad`] naming the first malformed line.
    pub fn parse(
        name: impl Into<String>,
        text: &str,
        color: Vec3,
    ) -> Result<Self, MorphError> {
        let name = name.into();
        let positions = parse_coordinates(text)
            .map_err(|reason| MorphError::shape_load(name.clone(), reason))?;
        Ok(Self {
            name,
            positions,
            color,
        })
    }

    /// Read and parse the coordinate file described by `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::ShapeLoad`] if the file is unreadable or
    /// malformed.
    pub fn load(spec: &ShapeSpec) -> Result<Self, MorphError> {
        let text = std::fs::read_to_string(&spec.path).map_err(|e| {
            MorphError::shape_load(
                spec.name.clone(),
                format!("{}: {e}", spec.path.display()),
            )
        })?;
        Self::parse(spec.name.clone(), &text, spec.color)
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the shape has no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounding box as `(min, max)`, `None` for an empty shape.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    /// Check that `self` can morph into `other` index by index.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::ShapeMismatch`] when instance counts differ.
    pub fn check_compatible(&self, other: &Shape) -> Result<(), MorphError> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(MorphError::ShapeMismatch {
                start: self.name.clone(),
                end: other.name.clone(),
                start_len: self.len(),
                end_len: other.len(),
            })
        }
    }
}

/// Where to load one shape from, and what color to give it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    /// Shape name used by sections and morph requests.
    pub name: String,
    /// Path of the `x,y,z` coordinate file.
    pub path: PathBuf,
    /// Linear RGB display color.
    pub color: Vec3,
}

// ---------------------------------------------------------------------------
// ShapeStore
// ---------------------------------------------------------------------------

/// Immutable name → shape mapping, resolved once before any morph runs.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: FxHashMap<String, Arc<Shape>>,
}

impl ShapeStore {
    /// Store holding the given shapes. A later shape replaces an earlier one
    /// with the same name.
    #[must_use]
    pub fn from_shapes(shapes: impl IntoIterator<Item = Shape>) -> Self {
        let mut map = FxHashMap::default();
        for shape in shapes {
            if let Some(prev) = map.insert(shape.name.clone(), Arc::new(shape))
            {
                log::warn!("shape '{}' defined twice, keeping the last", prev.name);
            }
        }
        Self { shapes: map }
    }

    /// Load every shape concurrently, one thread per source.
    ///
    /// All-or-nothing: if any source is unreadable or malformed the whole
    /// load fails and no shapes are returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`MorphError::ShapeLoad`] in `specs` order, or
    /// [`MorphError::ThreadSpawn`] if a loader thread cannot be started.
    pub fn load(specs: &[ShapeSpec]) -> Result<Self, MorphError> {
        let results = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(specs.len());
            for spec in specs {
                let handle = thread::Builder::new()
                    .name(format!("shape-{}", spec.name))
                    .spawn_scoped(scope, move || Shape::load(spec))
                    .map_err(MorphError::ThreadSpawn)?;
                handles.push((spec, handle));
            }
            Ok::<_, MorphError>(
                handles
                    .into_iter()
                    .map(|(spec, handle)| {
                        handle.join().unwrap_or_else(|_| {
                            Err(MorphError::shape_load(
                                spec.name.clone(),
                                "loader thread panicked",
                            ))
                        })
                    })
                    .collect::<Vec<_>>(),
            )
        })?;

        let shapes = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_shapes(shapes))
    }

    /// Shape by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Shape>> {
        self.shapes.get(name)
    }

    /// Shape by name, as an error when missing.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::UnknownShape`] if no shape has that name.
    pub fn require(&self, name: &str) -> Result<Arc<Shape>, MorphError> {
        self.shapes
            .get(name)
            .cloned()
            .ok_or_else(|| MorphError::UnknownShape(name.to_owned()))
    }

    /// Whether a shape with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shapes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;

    use super::*;

    /// Write `contents` to a fresh file under the system temp dir.
    pub(crate) fn temp_file(tag: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "morpho-{}-{tag}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{tag}.txt"));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn spec(name: &str, path: &Path) -> ShapeSpec {
        ShapeSpec {
            name: name.to_owned(),
            path: path.to_path_buf(),
            color: Vec3::ONE,
        }
    }

    #[test]
    fn bounds_cover_all_positions() {
        let shape = Shape::new(
            "s",
            vec![Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 5.0)],
            Vec3::ONE,
        );
        let (lo, hi) = shape.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, Vec3::new(1.0, 3.0, 5.0));
        assert!(Shape::new("e", Vec::new(), Vec3::ONE).bounds().is_none());
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        let a = Shape::new("a", vec![Vec3::ZERO], Vec3::ONE);
        let b = Shape::new("b", vec![Vec3::ZERO, Vec3::X], Vec3::ONE);
        assert!(matches!(
            a.check_compatible(&b),
            Err(MorphError::ShapeMismatch {
                start_len: 1,
                end_len: 2,
                ..
            })
        ));
        assert!(a.check_compatible(&a).is_ok());
    }

    #[test]
    fn load_reads_all_shapes() {
        let a = temp_file("load-a", "0,0,0\n1,1,1\n");
        let b = temp_file("load-b", "2,2,2\n3,3,3\n");
        let store =
            ShapeStore::load(&[spec("a", &a), spec("b", &b)]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.names(), vec!["a", "b"]);
        assert_eq!(
            store.get("b").unwrap().positions[1],
            Vec3::new(3.0, 3.0, 3.0)
        );
    }

    #[test]
    fn load_fails_whole_store_on_one_bad_shape() {
        let good = temp_file("bad-store-good", "0,0,0\n");
        let bad = temp_file("bad-store-bad", "0,0\n");
        let err = ShapeStore::load(&[spec("good", &good), spec("bad", &bad)])
            .unwrap_err();
        assert!(matches!(err, MorphError::ShapeLoad { ref name, .. } if name == "bad"));
    }

    #[test]
    fn load_fails_on_missing_file() {
        let missing = std::env::temp_dir().join("morpho-does-not-exist.txt");
        let err = ShapeStore::load(&[spec("ghost", &missing)]).unwrap_err();
        assert!(matches!(err, MorphError::ShapeLoad { .. }));
    }

    #[test]
    fn bundled_models_morph_into_each_other() {
        let specs = crate::options::Options::default().shape_specs();
        let store = ShapeStore::load(&specs).unwrap();
        let teapot = store.require("teapot").unwrap();
        for name in ["brain", "lightbulb"] {
            assert!(teapot.check_compatible(&store.require(name).unwrap()).is_ok());
        }
    }

    #[test]
    fn require_reports_unknown_shape() {
        let store = ShapeStore::from_shapes([Shape::new(
            "teapot",
            vec![Vec3::ZERO],
            Vec3::ONE,
        )]);
        assert!(store.require("teapot").is_ok());
        assert!(matches!(
            store.require("brain"),
            Err(MorphError::UnknownShape(ref n)) if n == "brain"
        ));
    }
}
