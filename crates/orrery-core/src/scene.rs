use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

/// Half-width of the orthographic view used to map world positions onto
/// normalized device coordinates. Category placement spans +-30 on x/z and
/// task orbits reach 5 units further, so 40 keeps every sphere inside [-1,1].
pub const VIEW_EXTENT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Packed 0xRRGGBB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color(pub u32);

/// Pointer position in normalized device coordinates, both axes in [-1,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerNdc {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SphereHandle(u64);

/// Rendering collaborator. Scene construction, camera, lighting and the
/// actual draw loop live outside this crate; the core only creates sphere
/// handles, moves them, recolors them and asks for pick resolution.
pub trait Scene {
    fn create_sphere(&mut self, radius: f64, color: Color) -> SphereHandle;
    fn set_position(&mut self, handle: SphereHandle, position: Vec3);
    fn set_color(&mut self, handle: SphereHandle, color: Color);
    fn pick(&self, pointer: PointerNdc, candidates: &[SphereHandle]) -> Option<SphereHandle>;
}

/// Maps a world position onto the flat top-down projection shared by
/// `FlatScene::pick` and the name-based click commands.
pub fn project_flat(position: Vec3) -> PointerNdc {
    PointerNdc {
        x: position.x / VIEW_EXTENT,
        y: position.z / VIEW_EXTENT,
    }
}

#[derive(Debug, Clone, Copy)]
struct Sphere {
    radius: f64,
    color: Color,
    position: Vec3,
}

/// Reference `Scene` implementation: an orthographic top-down view where a
/// pick hits the nearest candidate whose projected disc contains the pointer.
#[derive(Debug, Default)]
pub struct FlatScene {
    spheres: HashMap<SphereHandle, Sphere>,
    next_id: u64,
}

impl FlatScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position_of(&self, handle: SphereHandle) -> Option<Vec3> {
        self.spheres.get(&handle).map(|sphere| sphere.position)
    }

    pub fn color_of(&self, handle: SphereHandle) -> Option<Color> {
        self.spheres.get(&handle).map(|sphere| sphere.color)
    }
}

impl Scene for FlatScene {
    fn create_sphere(&mut self, radius: f64, color: Color) -> SphereHandle {
        let handle = SphereHandle(self.next_id);
        self.next_id += 1;
        self.spheres.insert(
            handle,
            Sphere {
                radius,
                color,
                position: Vec3::default(),
            },
        );
        trace!(?handle, radius, "created sphere");
        handle
    }

    fn set_position(&mut self, handle: SphereHandle, position: Vec3) {
        if let Some(sphere) = self.spheres.get_mut(&handle) {
            sphere.position = position;
        }
    }

    fn set_color(&mut self, handle: SphereHandle, color: Color) {
        if let Some(sphere) = self.spheres.get_mut(&handle) {
            sphere.color = color;
        }
    }

    fn pick(&self, pointer: PointerNdc, candidates: &[SphereHandle]) -> Option<SphereHandle> {
        let mut best: Option<(f64, SphereHandle)> = None;

        for &handle in candidates {
            let Some(sphere) = self.spheres.get(&handle) else {
                continue;
            };
            let center = project_flat(sphere.position);
            let dx = pointer.x - center.x;
            let dy = pointer.y - center.y;
            let distance = (dx * dx + dy * dy).sqrt();
            let reach = sphere.radius / VIEW_EXTENT;

            if distance <= reach && best.map_or(true, |(nearest, _)| distance < nearest) {
                best = Some((distance, handle));
            }
        }

        best.map(|(_, handle)| handle)
    }
}
