//! Area-weighted random point sampling over triangle surfaces.

use glam::Vec3;
use rand::Rng;

use super::model::Mesh;

/// Precomputed cumulative area table for uniform surface sampling.
///
/// Each sample picks a triangle with probability proportional to its area,
/// then a uniform point inside it.
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    triangles: Vec<[Vec3; 3]>,
    cumulative: Vec<f32>,
    total_area: f32,
}

impl SurfaceSampler {
    /// Sampler over every triangle of `mesh`, in mesh space.
    #[must_use]
    pub fn new(mesh: &Mesh) -> Self {
        Self::from_triangles(mesh.triangles().collect())
    }

    /// Sampler over an explicit triangle list.
    ///
    /// Zero-area and non-finite triangles are kept in the list but never
    /// selected.
    #[must_use]
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let mut total_area = 0.0;
        let cumulative = triangles
            .iter()
            .map(|[a, b, c]| {
                let area = 0.5 * (*b - *a).cross(*c - *a).length();
                if area.is_finite() {
                    total_area += area;
                }
                total_area
            })
            .collect();
        Self {
            triangles,
            cumulative,
            total_area,
        }
    }

    /// Total surface area.
    #[must_use]
    pub fn total_area(&self) -> f32 {
        self.total_area
    }

    /// Whether sampling can produce points on a real surface.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.total_area > 0.0
    }

    /// One uniformly distributed surface point. Returns the origin when the
    /// surface has no area.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        if !self.has_area() {
            return Vec3::ZERO;
        }
        let pick = rng.random::<f32>() * self.total_area;
        let index = self
            .cumulative
            .partition_point(|&c| c <= pick)
            .min(self.triangles.len() - 1);
        let [a, b, c] = self.triangles[index];

        let (mut u, mut v) = (rng.random::<f32>(), rng.random::<f32>());
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        a + (b - a) * u + (c - a) * v
    }

    /// `count` samples.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Vec3> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn point_in_triangle(p: Vec3, [a, b, c]: [Vec3; 3]) -> bool {
        let n = (b - a).cross(c - a);
        let plane = n.normalize().dot(p - a).abs() < 1e-4;
        let edges = [(a, b), (b, c), (c, a)];
        plane && edges.iter().all(|(s, e)| (*e - *s).cross(p - *s).dot(n) >= -1e-5)
    }

    #[test]
    fn samples_lie_on_the_triangle() {
        let tri = [Vec3::ZERO, Vec3::X * 2.0, Vec3::Y * 3.0];
        let sampler = SurfaceSampler::from_triangles(vec![tri]);
        assert!((sampler.total_area() - 3.0).abs() < 1e-5);
        let mut rng = StdRng::seed_from_u64(7);
        for p in sampler.sample_n(&mut rng, 500) {
            assert!(point_in_triangle(p, tri), "{p:?} off triangle");
        }
    }

    #[test]
    fn selection_is_proportional_to_area() {
        let small = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let offset = Vec3::new(10.0, 0.0, 0.0);
        let large = [offset, offset + Vec3::X * 3.0, offset + Vec3::Y * 3.0];
        let sampler = SurfaceSampler::from_triangles(vec![small, large]);
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let in_large = sampler
            .sample_n(&mut rng, n)
            .into_iter()
            .filter(|p| p.x >= 5.0)
            .count();
        // Large is 9x the small triangle's area: expect 90%.
        let fraction = in_large as f32 / n as f32;
        assert!((fraction - 0.9).abs() < 0.02, "fraction {fraction}");
    }

    #[test]
    fn degenerate_triangles_are_never_chosen() {
        let degenerate = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let real = [Vec3::Z, Vec3::Z + Vec3::X, Vec3::Z + Vec3::Y];
        let sampler = SurfaceSampler::from_triangles(vec![degenerate, real, degenerate]);
        let mut rng = StdRng::seed_from_u64(1);
        for p in sampler.sample_n(&mut rng, 200) {
            assert!(point_in_triangle(p, real));
        }
    }

    #[test]
    fn empty_surface_samples_origin() {
        let sampler = SurfaceSampler::from_triangles(Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!sampler.has_area());
        assert_eq!(sampler.sample(&mut rng), Vec3::ZERO);
    }
}
