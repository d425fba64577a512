use std::ops::{Add, Mul, Sub};

use crate::kernel::{Kernel, KernelResult};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vec3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vec3 {
    const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn dot(self, o: Vec3) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    fn cross(self, o: Vec3) -> Vec3 {
        Vec3::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    fn normalize(self) -> Vec3 {
        self * (1.0 / self.length())
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Color {
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    fn scale(self, s: f64) -> Color {
        Color::new(self.r * s, self.g * s, self.b * s)
    }

    fn clamp(self) -> Color {
        Color::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, o: Color) -> Color {
        Color::new(self.r + o.r, self.g + o.g, self.b + o.b)
    }
}

struct Ray {
    origin: Vec3,
    dir: Vec3,
}

struct Sphere {
    center: Vec3,
    radius: f64,
    color: Color,
}

impl Sphere {
    /// Distance along `ray` to the nearest hit in front of the origin.
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.dir);
        let c = oc.dot(oc) - self.radius * self.radius;
        let disc = b * b - c;
        if disc <= 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t > 1e-6).then_some(t)
    }
}

struct Camera {
    position: Vec3,
    up: Vec3,
    equator: Vec3,
    screen: Vec3,
}

impl Camera {
    fn new(position: Vec3, look_at: Vec3, up: Vec3) -> Self {
        Self {
            position,
            up,
            equator: look_at.normalize().cross(up),
            screen: position + look_at,
        }
    }

    /// `vx`, `vy` in [-1, 1]; screen y grows downwards.
    fn ray(&self, vx: f64, vy: f64) -> Ray {
        let mut pos = self.screen - (self.equator * vx - self.up * vy);
        pos.y = -pos.y;
        Ray {
            origin: pos,
            dir: (pos - self.position).normalize(),
        }
    }
}

const BACKGROUND: Color = Color::new(0.0, 0.0, 0.5);
const AMBIENCE: f64 = 0.2;

struct Scene {
    camera: Camera,
    spheres: Vec<Sphere>,
    light: Vec3,
}

impl Scene {
    fn standard() -> Self {
        Self {
            camera: Camera::new(
                Vec3::new(0.0, 0.0, -15.0),
                Vec3::new(-0.2, 0.0, 5.0),
                Vec3::new(0.0, 1.0, 0.0),
            ),
            spheres: vec![
                Sphere {
                    center: Vec3::new(-1.5, 1.5, 2.0),
                    radius: 1.5,
                    color: Color::new(0.0, 0.5, 0.5),
                },
                Sphere {
                    center: Vec3::new(1.0, 0.25, 1.0),
                    radius: 0.5,
                    color: Color::new(0.9, 0.9, 0.9),
                },
            ],
            light: Vec3::new(5.0, 10.0, -1.0),
        }
    }

    fn nearest(&self, ray: &Ray) -> Option<(f64, &Sphere)> {
        self.spheres
            .iter()
            .filter_map(|s| s.intersect(ray).map(|t| (t, s)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    fn shade(&self, ray: &Ray) -> Color {
        let Some((t, sphere)) = self.nearest(ray) else {
            return BACKGROUND;
        };

        let hit = ray.origin + ray.dir * t;
        let normal = (hit - sphere.center).normalize();
        let to_light = (self.light - hit).normalize();

        let shadow = Ray {
            origin: hit,
            dir: to_light,
        };
        let lit = self.nearest(&shadow).is_none();
        let diffuse = if lit { normal.dot(to_light).max(0.0) } else { 0.0 };

        (sphere.color.scale(AMBIENCE) + sphere.color.scale(diffuse)).clamp()
    }

    fn render(&self, width: usize, height: usize, pixels: &mut Vec<Color>) {
        pixels.clear();
        for y in 0..height {
            let vy = 2.0 * y as f64 / (height - 1) as f64 - 1.0;
            for x in 0..width {
                let vx = 2.0 * x as f64 / (width - 1) as f64 - 1.0;
                pixels.push(self.shade(&self.camera.ray(vx, vy)));
            }
        }
    }
}

fn checksum(pixels: &[Color]) -> f64 {
    pixels.iter().map(|c| c.r + c.g + c.b).sum()
}

/// Renders a small scene of two spheres lit by a single shadow-casting light.
pub struct Tracer {
    scene: Scene,
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    reference: Option<f64>,
}

impl Tracer {
    pub fn new() -> Self {
        Self::with_size(64, 64)
    }

    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            scene: Scene::standard(),
            width,
            height,
            pixels: Vec::new(),
            reference: None,
        }
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for Tracer {
    fn name(&self) -> &str {
        "Tracer"
    }

    fn setup(&mut self) -> KernelResult {
        anyhow::ensure!(
            self.width >= 2 && self.height >= 2,
            "canvas must be at least 2x2, got {}x{}",
            self.width,
            self.height
        );
        self.pixels = Vec::with_capacity(self.width * self.height);
        if self.reference.is_none() {
            self.scene.render(self.width, self.height, &mut self.pixels);
            self.reference = Some(checksum(&self.pixels));
        }
        Ok(())
    }

    fn run(&mut self) -> KernelResult {
        self.scene.render(self.width, self.height, &mut self.pixels);
        let sum = checksum(&self.pixels);
        anyhow::ensure!(
            Some(sum) == self.reference,
            "render checksum {} differs from reference {:?}",
            sum,
            self.reference
        );
        Ok(())
    }

    fn teardown(&mut self) -> KernelResult {
        self.pixels = Vec::new();
        Ok(())
    }
}
