// Minimal sphere ray tracer.
// One ray per canvas pixel from the camera through a viewport plane; the
// closest sphere hit is shaded with diffuse + specular from one directional light.

use glam::Vec3;

use crate::canvas::PixelCanvas;
use crate::types::opaque;

/// "No hit" sentinel: the largest finite f32, not IEEE infinity.
pub const INFINITY: f32 = f32::MAX;

/// Rays start this far out so nothing between the camera and the
/// viewport plane is hit.
pub const T_MIN: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub color: Vec3,   // RGB in [0,1]
    pub specular: f32, // shininess exponent; <= 0 disables highlights
}

/// Directional light. `direction` points from the surface toward the light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub intensity: f32,
    pub direction: Vec3,
}

/// Viewport plane in front of the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub distance: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1.0, height: 1.0, distance: 1.0 }
    }
}

/// Everything the tracer needs for one frame. Owned by the scene and
/// mutated between frames by input.
#[derive(Clone, Debug)]
pub struct SphereScene {
    pub camera: Vec3,
    pub spheres: Vec<Sphere>,
    pub light: Light,
    pub background: Vec3,
    pub viewport: Viewport,
}

impl SphereScene {
    /// `position += direction * dt` for one sphere; unknown index is ignored.
    pub fn move_sphere(&mut self, index: usize, direction: Vec3, dt: f32) {
        if let Some(s) = self.spheres.get_mut(index) {
            s.center += direction * dt;
        }
    }

    pub fn move_camera(&mut self, direction: Vec3, dt: f32) {
        self.camera += direction * dt;
    }
}

/// Map a canvas coordinate (centered, y up) to a point on the viewport plane.
#[inline]
pub fn canvas_to_viewport(x: i32, y: i32, canvas_w: usize, canvas_h: usize, vp: &Viewport) -> Vec3 {
    Vec3::new(
        x as f32 * vp.width / canvas_w as f32,
        y as f32 * vp.height / canvas_h as f32,
        vp.distance,
    )
}

/// Both roots of |origin + t*ray - center|^2 = radius^2.
/// Returns (INFINITY, INFINITY) when there is no real root or the ray is zero-length.
pub fn intersect_ray_sphere(origin: Vec3, ray: Vec3, center: Vec3, radius: f32) -> (f32, f32) {
    let co = origin - center;
    let a = ray.dot(ray);
    if a == 0.0 {
        return (INFINITY, INFINITY);
    }
    let b = 2.0 * co.dot(ray);
    let c = co.dot(co) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return (INFINITY, INFINITY);
    }
    let root = discriminant.sqrt();
    let t1 = (-b + root) / (2.0 * a);
    let t2 = (-b - root) / (2.0 * a);
    (t1, t2)
}

/// Index of the nearest sphere hit with t strictly inside (t_min, t_max), and that t.
pub fn closest_intersection(
    scene: &SphereScene,
    origin: Vec3,
    ray: Vec3,
    t_min: f32,
    t_max: f32,
) -> Option<(usize, f32)> {
    let mut closest_t = INFINITY;
    let mut closest = None;
    for (i, sphere) in scene.spheres.iter().enumerate() {
        let (t1, t2) = intersect_ray_sphere(origin, ray, sphere.center, sphere.radius);
        for t in [t1, t2] {
            if t > t_min && t < t_max && t < closest_t {
                closest_t = t;
                closest = Some(i);
            }
        }
    }
    closest.map(|i| (i, closest_t))
}

/// Lambert term: intensity * cos(angle between normal and light), never negative.
#[inline]
pub fn diffuse_term(normal: Vec3, light: &Light) -> f32 {
    let n_dot_l = normal.dot(light.direction);
    if n_dot_l <= 0.0 {
        return 0.0;
    }
    light.intensity * n_dot_l / (normal.length() * light.direction.length())
}

/// Phong highlight: reflect the light about the normal and compare with
/// the direction back to the viewer. Zero when the reflection faces away.
#[inline]
pub fn specular_term(normal: Vec3, view: Vec3, light: &Light, shininess: f32) -> f32 {
    if shininess <= 0.0 {
        return 0.0;
    }
    let l = light.direction;
    let r = 2.0 * normal * normal.dot(l) - l;
    let r_dot_v = r.dot(view);
    if r_dot_v <= 0.0 {
        return 0.0;
    }
    light.intensity * (r_dot_v / (r.length() * view.length())).powf(shininess)
}

/// Total light reaching the point: diffuse + specular.
#[inline]
pub fn compute_lighting(normal: Vec3, view: Vec3, light: &Light, shininess: f32) -> f32 {
    diffuse_term(normal, light) + specular_term(normal, view, light, shininess)
}

/// Color seen along one ray.
pub fn trace_ray(scene: &SphereScene, origin: Vec3, ray: Vec3, t_min: f32, t_max: f32) -> Vec3 {
    let Some((index, t)) = closest_intersection(scene, origin, ray, t_min, t_max) else {
        return scene.background;
    };
    let sphere = &scene.spheres[index];
    let point = origin + ray * t;
    let normal = (point - sphere.center).normalize();
    sphere.color * compute_lighting(normal, -ray, &scene.light, sphere.specular)
}

/// Recompute every canvas pixel. Cost is width * height * sphere count.
/// Logical coordinates are taken relative to the canvas origin.
pub fn render(scene: &SphereScene, canvas: &mut PixelCanvas) {
    let (w, h) = (canvas.width(), canvas.height());
    let (ox, oy) = canvas.origin();
    for by in 0..h as i32 {
        for bx in 0..w as i32 {
            let (x, y) = (bx - ox, by - oy);
            let ray = canvas_to_viewport(x, y, w, h, &scene.viewport);
            let color = trace_ray(scene, scene.camera, ray, T_MIN, INFINITY);
            canvas.draw_pixel(x, y, opaque(color));
        }
    }
}
