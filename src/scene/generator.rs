//! Sphere placement with one-pass overlap rejection.
//!
//! Each of the `max_spheres` slots gets exactly one candidate: a radius drawn
//! from `[radius_min, radius_max]` and a point drawn uniformly inside a disk
//! of `placement_radius`, lifted so the sphere rests on the ground. A
//! candidate whose bounding sphere overlaps any sphere accepted *earlier in
//! the same pass* is rejected and its slot stays empty. Candidates are never
//! retried and later spheres are never re-checked against earlier rejections,
//! so the check runs in one direction only.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::options::SceneOptions;
use crate::scene::sphere::{Material, Scene, Sphere, SphereSlot};
use crate::util::color::hsv_to_rgb;

/// Lowest per-channel reflectance of a metal sphere.
pub const METAL_SPECULAR_MIN: f32 = 0.02;
/// Highest per-channel reflectance of a metal sphere.
pub const METAL_SPECULAR_MAX: f32 = 0.07;
/// Probability that an accepted sphere is metal.
pub const METAL_PROBABILITY: f64 = 0.5;

/// Inputs to one generation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    /// Number of slots; the scene always has exactly this many.
    pub max_spheres: usize,
    /// Radius of the disk sphere centers are drawn from.
    pub placement_radius: f32,
    /// Smallest sphere radius.
    pub radius_min: f32,
    /// Largest sphere radius.
    pub radius_max: f32,
}

impl From<&SceneOptions> for GeneratorParams {
    fn from(options: &SceneOptions) -> Self {
        Self {
            max_spheres: options.max_spheres,
            placement_radius: options.placement_radius,
            radius_min: options.sphere_radius_min,
            radius_max: options.sphere_radius_max,
        }
    }
}

/// Produces a fresh [`Scene`] from a random source.
#[derive(Debug, Clone, Copy)]
pub struct SceneGenerator {
    params: GeneratorParams,
}

impl SceneGenerator {
    /// Generator for `params`.
    #[must_use]
    pub const fn new(params: GeneratorParams) -> Self {
        Self { params }
    }

    /// The parameters this generator uses.
    #[must_use]
    pub const fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Run one placement pass.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Scene {
        let mut placer = ScenePlacer::with_capacity(self.params.max_spheres);
        for _ in 0..self.params.max_spheres {
            let radius = self.draw_radius(rng);
            let ground = sample_disk(rng, self.params.placement_radius);
            let position = Vec3::new(ground.x, radius, ground.y);
            let _ = placer.try_place(position, radius, || draw_material(rng));
        }
        placer.finish()
    }

    fn draw_radius<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (lo, hi) = (self.params.radius_min, self.params.radius_max);
        if hi > lo {
            rng.random_range(lo..=hi)
        } else {
            lo
        }
    }
}

/// Uniform point inside a disk of `radius`, as `(x, z)` on the ground.
pub fn sample_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> glam::Vec2 {
    let r = radius * rng.random::<f32>().sqrt();
    let theta = TAU * rng.random::<f32>();
    glam::Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Coin-flip between a faintly tinted metal and a random-hue diffuse.
pub fn draw_material<R: Rng + ?Sized>(rng: &mut R) -> Material {
    if rng.random_bool(METAL_PROBABILITY) {
        let tint = Vec3::new(rng.random(), rng.random(), rng.random());
        Material::Metal {
            specular: Vec3::splat(METAL_SPECULAR_MIN)
                + tint * (METAL_SPECULAR_MAX - METAL_SPECULAR_MIN),
        }
    } else {
        Material::Diffuse {
            albedo: hsv_to_rgb(rng.random(), rng.random(), rng.random()),
        }
    }
}

/// Fills slots in order, rejecting candidates that overlap an earlier sphere.
#[derive(Debug, Default)]
pub struct ScenePlacer {
    slots: Vec<SphereSlot>,
}

impl ScenePlacer {
    /// Placer expecting about `capacity` candidates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Whether a candidate clears every sphere accepted so far.
    #[must_use]
    pub fn fits(&self, position: Vec3, radius: f32) -> bool {
        !self
            .slots
            .iter()
            .filter_map(SphereSlot::sphere)
            .any(|other| other.overlaps(position, radius))
    }

    /// Fill the next slot. The material is only drawn for accepted
    /// candidates. Returns whether the candidate was accepted.
    pub fn try_place<F: FnOnce() -> Material>(
        &mut self,
        position: Vec3,
        radius: f32,
        material: F,
    ) -> bool {
        if self.fits(position, radius) {
            self.slots.push(SphereSlot::Placed(Sphere {
                position,
                radius,
                material: material(),
            }));
            true
        } else {
            self.slots.push(SphereSlot::Empty);
            false
        }
    }

    /// The completed scene.
    #[must_use]
    pub fn finish(self) -> Scene {
        Scene::from_slots(self.slots)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn params(max_spheres: usize) -> GeneratorParams {
        GeneratorParams {
            max_spheres,
            placement_radius: 5.0,
            radius_min: 0.25,
            radius_max: 1.5,
        }
    }

    fn generate(max_spheres: usize, seed: u64) -> Scene {
        let mut rng = StdRng::seed_from_u64(seed);
        SceneGenerator::new(params(max_spheres)).generate(&mut rng)
    }

    fn diffuse() -> Material {
        Material::Diffuse { albedo: Vec3::ONE }
    }

    #[test]
    fn always_yields_requested_slot_count() {
        for n in [1, 2, 7, 64, 500] {
            assert_eq!(generate(n, n as u64).len(), n);
        }
    }

    #[test]
    fn first_slot_is_always_placed() {
        for seed in 0..32 {
            assert!(generate(4, seed).slots()[0].sphere().is_some());
        }
    }

    #[test]
    fn accepted_spheres_never_overlap() {
        let scene = generate(300, 42);
        let placed: Vec<&Sphere> = scene.placed().collect();
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                let reach = a.radius + b.radius;
                assert!(a.position.distance_squared(b.position) >= reach * reach);
            }
        }
    }

    #[test]
    fn dense_scenes_leave_zeroed_slots() {
        let scene = generate(500, 7);
        let summary = scene.summary();
        assert!(summary.empty > 0);
        for (slot, record) in scene.slots().iter().zip(scene.to_gpu()) {
            if slot.sphere().is_none() {
                assert_eq!(record, crate::scene::GpuSphere::default());
            }
        }
    }

    #[test]
    fn spheres_rest_on_the_ground_inside_the_disk() {
        for sphere in generate(200, 3).placed() {
            assert!((0.25..=1.5).contains(&sphere.radius));
            assert_eq!(sphere.position.y, sphere.radius);
            let ground = glam::Vec2::new(sphere.position.x, sphere.position.z);
            assert!(ground.length() <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn material_invariants_hold_over_a_large_batch() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let generator = SceneGenerator::new(GeneratorParams {
            max_spheres: 10_000,
            placement_radius: 1000.0,
            radius_min: 0.1,
            radius_max: 0.5,
        });
        let scene = generator.generate(&mut rng);
        let summary = scene.summary();
        assert!(summary.metal > 0 && summary.diffuse > 0);

        for record in scene.placed().map(Sphere::to_gpu) {
            let albedo = Vec3::from_array(record.albedo);
            let specular = Vec3::from_array(record.specular);
            if specular != Vec3::ZERO {
                assert_eq!(albedo, Vec3::ZERO);
                assert!(specular.min_element() >= METAL_SPECULAR_MIN);
                assert!(specular.max_element() <= METAL_SPECULAR_MAX);
            } else {
                assert!(albedo.cmpge(Vec3::ZERO).all() && albedo.cmple(Vec3::ONE).all());
            }
        }
        for sphere in scene.placed() {
            match sphere.material {
                Material::Metal { .. } => assert_eq!(sphere.material.albedo(), Vec3::ZERO),
                Material::Diffuse { .. } => assert_eq!(sphere.material.specular(), Vec3::ZERO),
            }
        }
    }

    #[test]
    fn equal_radius_bounds_give_fixed_radius() {
        let mut rng = StdRng::seed_from_u64(1);
        let generator = SceneGenerator::new(GeneratorParams {
            radius_min: 0.5,
            radius_max: 0.5,
            ..params(16)
        });
        assert!(generator.generate(&mut rng).placed().all(|s| s.radius == 0.5));
    }

    #[test]
    fn same_seed_same_scene() {
        assert_eq!(generate(64, 99), generate(64, 99));
    }

    #[test]
    fn overlapping_candidate_is_rejected_and_earlier_sphere_kept() {
        let mut placer = ScenePlacer::default();
        let first = Vec3::new(0.0, 1.0, 0.0);
        assert!(placer.try_place(first, 1.0, diffuse));
        assert!(!placer.try_place(Vec3::new(0.5, 1.0, 0.0), 1.0, diffuse));
        let scene = placer.finish();
        assert_eq!(scene.slots()[0].sphere().map(|s| s.position), Some(first));
        assert_eq!(scene.slots()[1], SphereSlot::Empty);
    }

    #[test]
    fn rejected_slots_do_not_block_later_candidates() {
        let mut placer = ScenePlacer::default();
        assert!(placer.try_place(Vec3::new(0.0, 1.0, 0.0), 1.0, diffuse));
        // Rejected: overlaps slot 0.
        assert!(!placer.try_place(Vec3::new(1.5, 1.0, 0.0), 1.0, diffuse));
        // Would overlap the rejected candidate, but only accepted spheres count.
        assert!(placer.try_place(Vec3::new(3.0, 1.0, 0.0), 1.0, diffuse));
    }

    #[test]
    fn check_only_looks_backwards() {
        // Placement order alone decides which of two conflicting spheres
        // survives.
        let mut forward = ScenePlacer::default();
        assert!(forward.try_place(Vec3::new(0.0, 0.25, 0.0), 0.25, diffuse));
        assert!(!forward.try_place(Vec3::new(0.9, 1.0, 0.0), 1.0, diffuse));

        let mut reverse = ScenePlacer::default();
        assert!(reverse.try_place(Vec3::new(0.9, 1.0, 0.0), 1.0, diffuse));
        assert!(!reverse.try_place(Vec3::new(0.0, 0.25, 0.0), 0.25, diffuse));

        let kept = |scene: &Scene| scene.placed().map(|s| s.radius).collect::<Vec<_>>();
        assert_eq!(kept(&forward.finish()), vec![0.25]);
        assert_eq!(kept(&reverse.finish()), vec![1.0]);
    }

    #[test]
    fn material_is_not_drawn_for_rejected_candidates() {
        let mut placer = ScenePlacer::default();
        let _ = placer.try_place(Vec3::Y, 1.0, diffuse);
        let mut drawn = false;
        let _ = placer.try_place(Vec3::Y, 1.0, || {
            drawn = true;
            diffuse()
        });
        assert!(!drawn);
    }

    #[test]
    fn disk_samples_stay_inside() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            assert!(sample_disk(&mut rng, 2.0).length() <= 2.0 + 1e-5);
        }
    }
}
