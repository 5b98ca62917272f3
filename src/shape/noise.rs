//! Random "noise" point clouds for re-entry bounces.

use glam::Vec3;
use rand::Rng;

use super::Shape;

/// Positions scattered uniformly inside `shape`'s bounding box, one per
/// instance of `shape`, so the result always morphs index-for-index with it.
pub fn noise_positions<R: Rng + ?Sized>(shape: &Shape, rng: &mut R) -> Vec<Vec3> {
    let Some((lo, hi)) = shape.bounds() else {
        return Vec::new();
    };
    (0..shape.len())
        .map(|_| {
            let u = Vec3::new(rng.random(), rng.random(), rng.random());
            // `hi - lo` may overflow f32 even for finite bounds.
            (lo * (Vec3::ONE - u) + hi * u).clamp(lo, hi)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn noise_matches_count_and_stays_in_bounds() {
        let shape = Shape::new(
            "box",
            vec![
                Vec3::new(-1.0, 0.0, 2.0),
                Vec3::new(1.0, 4.0, 2.0),
                Vec3::ZERO,
            ],
            Vec3::ONE,
        );
        let mut rng = StdRng::seed_from_u64(7);
        let noise = noise_positions(&shape, &mut rng);
        assert_eq!(noise.len(), 3);
        for p in noise {
            assert!((-1.0..=1.0).contains(&p.x));
            assert!((0.0..=4.0).contains(&p.y));
            assert!((0.0..=2.0).contains(&p.z));
        }
    }

    #[test]
    fn flat_axis_is_allowed() {
        let shape = Shape::new("dot", vec![Vec3::ONE], Vec3::ONE);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(noise_positions(&shape, &mut rng), vec![Vec3::ONE]);
    }

    #[test]
    fn wide_bounds_stay_finite() {
        let shape = Shape::new(
            "wide",
            vec![
                Vec3::new(-2e38, -3e38, 0.0),
                Vec3::new(2e38, 3e38, f32::MAX),
            ],
            Vec3::ONE,
        );
        let mut rng = StdRng::seed_from_u64(11);
        for p in noise_positions(&shape, &mut rng) {
            assert!(p.is_finite(), "{p:?}");
            assert!((-2e38..=2e38).contains(&p.x));
            assert!((-3e38..=3e38).contains(&p.y));
            assert!((0.0..=f32::MAX).contains(&p.z));
        }
    }

    #[test]
    fn empty_shape_gives_empty_noise() {
        let shape = Shape::new("none", Vec::new(), Vec3::ONE);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(noise_positions(&shape, &mut rng).is_empty());
    }
}
