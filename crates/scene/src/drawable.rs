use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Meshes a backend knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Eight shared corners, indexed.
    Cube,
    /// Per-face normals and texture coordinates.
    TexturedBox,
}

/// One draw call in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshKind,
    pub world: Mat4,
    /// Whether the bound texture modulates this draw.
    pub textured: bool,
}

/// Ordered draw calls collected for a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Something that can add itself to a frame at a given world transform.
pub trait Drawable {
    fn draw(&self, transform: Mat4, list: &mut DrawList);
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const fn tv(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> TexturedVertex {
    TexturedVertex {
        position,
        normal,
        uv,
    }
}

/// The helper box: a textured cube spanning [-1, 1] with one quad per face.
#[derive(Debug, Clone, Copy, Default)]
pub struct TexturedBox;

impl TexturedBox {
    pub fn new() -> Self {
        Self
    }

    #[rustfmt::skip]
    pub const VERTICES: [TexturedVertex; 24] = [
        // front (-Z)
        tv([-1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 1.0]),
        tv([-1.0,  1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0]),
        tv([ 1.0,  1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 0.0]),
        tv([ 1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 1.0]),
        // back (+Z)
        tv([-1.0, -1.0,  1.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        tv([ 1.0, -1.0,  1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        tv([ 1.0,  1.0,  1.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        tv([-1.0,  1.0,  1.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        // top (+Y)
        tv([-1.0,  1.0, -1.0], [0.0, 1.0, 0.0], [0.0, 1.0]),
        tv([-1.0,  1.0,  1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
        tv([ 1.0,  1.0,  1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
        tv([ 1.0,  1.0, -1.0], [0.0, 1.0, 0.0], [1.0, 1.0]),
        // bottom (-Y)
        tv([-1.0, -1.0, -1.0], [0.0, -1.0, 0.0], [1.0, 1.0]),
        tv([ 1.0, -1.0, -1.0], [0.0, -1.0, 0.0], [0.0, 1.0]),
        tv([ 1.0, -1.0,  1.0], [0.0, -1.0, 0.0], [0.0, 0.0]),
        tv([-1.0, -1.0,  1.0], [0.0, -1.0, 0.0], [1.0, 0.0]),
        // left (-X)
        tv([-1.0, -1.0,  1.0], [-1.0, 0.0, 0.0], [0.0, 1.0]),
        tv([-1.0,  1.0,  1.0], [-1.0, 0.0, 0.0], [0.0, 0.0]),
        tv([-1.0,  1.0, -1.0], [-1.0, 0.0, 0.0], [1.0, 0.0]),
        tv([-1.0, -1.0, -1.0], [-1.0, 0.0, 0.0], [1.0, 1.0]),
        // right (+X)
        tv([ 1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, 1.0]),
        tv([ 1.0,  1.0, -1.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
        tv([ 1.0,  1.0,  1.0], [1.0, 0.0, 0.0], [1.0, 0.0]),
        tv([ 1.0, -1.0,  1.0], [1.0, 0.0, 0.0], [1.0, 1.0]),
    ];

    #[rustfmt::skip]
    pub const INDICES: [u16; 36] = [
        0, 1, 2,  0, 2, 3,
        4, 5, 6,  4, 6, 7,
        8, 9, 10,  8, 10, 11,
        12, 13, 14,  12, 14, 15,
        16, 17, 18,  16, 18, 19,
        20, 21, 22,  20, 22, 23,
    ];
}

impl Drawable for TexturedBox {
    fn draw(&self, transform: Mat4, list: &mut DrawList) {
        list.push(DrawItem {
            mesh: MeshKind::TexturedBox,
            world: transform,
            textured: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn box_pushes_textured_item() {
        let mut list = DrawList::new();
        let t = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        TexturedBox::new().draw(t, &mut list);
        assert_eq!(list.len(), 1);
        let item = list.items()[0];
        assert_eq!(item.mesh, MeshKind::TexturedBox);
        assert_eq!(item.world, t);
        assert!(item.textured);
    }

    #[test]
    fn box_faces_wind_outward_along_normal() {
        for tri in TexturedBox::INDICES.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| TexturedBox::VERTICES[tri[i] as usize]);
            let pa = Vec3::from_array(a.position);
            let pb = Vec3::from_array(b.position);
            let pc = Vec3::from_array(c.position);
            let geometric = (pb - pa).cross(pc - pa).normalize();
            let declared = Vec3::from_array(a.normal);
            assert!(geometric.dot(declared) > 0.99, "triangle {tri:?}");
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.normal, c.normal);
        }
    }

    #[test]
    fn box_uvs_in_unit_square() {
        for v in TexturedBox::VERTICES {
            assert!(v.uv.iter().all(|&t| (0.0..=1.0).contains(&t)));
        }
    }
}
