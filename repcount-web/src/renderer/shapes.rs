//! Shape primitives - triangles for dots and bones
//!
//! Everything here works in clip space (-1..1 on both axes, y up).
//! Colors come in with straight alpha and are stored premultiplied,
//! which is what the overlay pipeline blends with.

/// One colored vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Straight-alpha RGBA to premultiplied
pub fn premultiply([r, g, b, a]: [f32; 4]) -> [f32; 4] {
    [r * a, g * a, b * a, a]
}

/// Image pixel coordinates (y down) to clip space (y up)
pub fn to_clip_space((x, y): (f32, f32), (width, height): (f32, f32)) -> (f32, f32) {
    (x / width * 2.0 - 1.0, 1.0 - y / height * 2.0)
}

/// Filled circle as a triangle fan, `3 * segments` vertices
///
/// `radius` is in clip-space height units; `aspect` (width / height)
/// squeezes x so the dot stays round on a non-square canvas.
pub fn push_circle(
    out: &mut Vec<Vertex>,
    (cx, cy): (f32, f32),
    radius: f32,
    aspect: f32,
    color: [f32; 4],
    segments: u32,
) {
    let color = premultiply(color);
    let rx = radius / aspect;
    let step = std::f32::consts::TAU / segments as f32;
    out.reserve(segments as usize * 3);

    for i in 0..segments {
        let (a1, a2) = (i as f32 * step, (i + 1) as f32 * step);
        out.push(Vertex { position: [cx, cy], color });
        out.push(Vertex { position: [cx + rx * a1.cos(), cy + radius * a1.sin()], color });
        out.push(Vertex { position: [cx + rx * a2.cos(), cy + radius * a2.sin()], color });
    }
}

/// Line segment as a quad of half-thickness `width`; nothing for
/// zero-length segments
pub fn push_line(
    out: &mut Vec<Vertex>,
    (x1, y1): (f32, f32),
    (x2, y2): (f32, f32),
    width: f32,
    color: [f32; 4],
) {
    let color = premultiply(color);
    let (dx, dy) = (x2 - x1, y2 - y1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 0.001 {
        return;
    }

    // Perpendicular offset
    let (px, py) = (-dy / len * width, dx / len * width);

    out.extend_from_slice(&[
        Vertex { position: [x1 - px, y1 - py], color },
        Vertex { position: [x1 + px, y1 + py], color },
        Vertex { position: [x2 + px, y2 + py], color },
        Vertex { position: [x1 - px, y1 - py], color },
        Vertex { position: [x2 + px, y2 + py], color },
        Vertex { position: [x2 - px, y2 - py], color },
    ]);
}
