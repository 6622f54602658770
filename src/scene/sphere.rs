//! Sphere records and their GPU layout.

use glam::Vec3;

/// Surface response of a placed sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Pure specular reflector with a faint tint. Albedo is zero.
    Metal {
        /// Reflectance per channel.
        specular: Vec3,
    },
    /// Lambertian surface. Specular is zero.
    Diffuse {
        /// Diffuse color.
        albedo: Vec3,
    },
}

impl Material {
    /// Diffuse color, zero for metals.
    #[must_use]
    pub const fn albedo(&self) -> Vec3 {
        match self {
            Self::Metal { .. } => Vec3::ZERO,
            Self::Diffuse { albedo } => *albedo,
        }
    }

    /// Specular reflectance, zero for diffuse surfaces.
    #[must_use]
    pub const fn specular(&self) -> Vec3 {
        match self {
            Self::Metal { specular } => *specular,
            Self::Diffuse { .. } => Vec3::ZERO,
        }
    }

    /// Whether this is [`Material::Metal`].
    #[must_use]
    pub const fn is_metal(&self) -> bool {
        matches!(self, Self::Metal { .. })
    }
}

/// A sphere resting on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center in world space.
    pub position: Vec3,
    /// Radius, always positive for a placed sphere.
    pub radius: f32,
    /// Surface response.
    pub material: Material,
}

impl Sphere {
    /// Whether the bounding spheres of `self` and a candidate intersect.
    ///
    /// Compared on squared distance; touching spheres do not overlap.
    #[must_use]
    pub fn overlaps(&self, position: Vec3, radius: f32) -> bool {
        let reach = self.radius + radius;
        self.position.distance_squared(position) < reach * reach
    }

    /// The 40-byte record the kernel reads.
    #[must_use]
    pub fn to_gpu(&self) -> GpuSphere {
        GpuSphere {
            position: self.position.to_array(),
            radius: self.radius,
            albedo: self.material.albedo().to_array(),
            specular: self.material.specular().to_array(),
        }
    }
}

/// One entry of a generated scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SphereSlot {
    /// The candidate for this slot was rejected.
    #[default]
    Empty,
    /// An accepted sphere.
    Placed(Sphere),
}

impl SphereSlot {
    /// The sphere, if one was placed.
    #[must_use]
    pub const fn sphere(&self) -> Option<&Sphere> {
        match self {
            Self::Empty => None,
            Self::Placed(sphere) => Some(sphere),
        }
    }

    /// GPU record; empty slots are all zeros.
    #[must_use]
    pub fn to_gpu(&self) -> GpuSphere {
        self.sphere().map_or_else(GpuSphere::default, Sphere::to_gpu)
    }
}

/// GPU layout of a sphere: ten tightly packed `f32`s.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuSphere {
    /// Center.
    pub position: [f32; 3],
    /// Radius, zero for an empty slot.
    pub radius: f32,
    /// Diffuse color.
    pub albedo: [f32; 3],
    /// Specular reflectance.
    pub specular: [f32; 3],
}

/// Counts for the regeneration log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneSummary {
    /// Slots holding a sphere.
    pub placed: usize,
    /// Placed spheres with a metal material.
    pub metal: usize,
    /// Placed spheres with a diffuse material.
    pub diffuse: usize,
    /// Rejected slots.
    pub empty: usize,
}

/// A generated batch of sphere slots, in placement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    slots: Vec<SphereSlot>,
}

impl Scene {
    pub(crate) const fn from_slots(slots: Vec<SphereSlot>) -> Self {
        Self { slots }
    }

    /// Every slot, accepted or not.
    #[must_use]
    pub fn slots(&self) -> &[SphereSlot] {
        &self.slots
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Accepted spheres in placement order.
    pub fn placed(&self) -> impl Iterator<Item = &Sphere> {
        self.slots.iter().filter_map(SphereSlot::sphere)
    }

    /// Records for the sphere buffer, one per slot.
    #[must_use]
    pub fn to_gpu(&self) -> Vec<GpuSphere> {
        self.slots.iter().map(SphereSlot::to_gpu).collect()
    }

    /// Placed/empty and metal/diffuse counts.
    #[must_use]
    pub fn summary(&self) -> SceneSummary {
        let mut summary = SceneSummary::default();
        for slot in &self.slots {
            match slot.sphere() {
                None => summary.empty += 1,
                Some(sphere) => {
                    summary.placed += 1;
                    if sphere.material.is_metal() {
                        summary.metal += 1;
                    } else {
                        summary.diffuse += 1;
                    }
                }
            }
        }
        summary
    }
}
