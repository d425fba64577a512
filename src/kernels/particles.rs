use crate::kernel::{Kernel, KernelResult};

const GRAVITY: f64 = -9.81;
const RESTITUTION: f64 = 0.9;
const DT: f64 = 1.0 / 120.0;
const BOX_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    pos: [f64; 2],
    vel: [f64; 2],
}

/// Integrates particles under gravity inside a box with lossy wall bounces.
///
/// Every `run()` advances the system a fixed number of steps; `setup()`
/// restores the initial layout so each cycle simulates the same motion.
pub struct ParticleMotion {
    count: usize,
    steps: usize,
    particles: Vec<Particle>,
}

impl ParticleMotion {
    pub fn new() -> Self {
        Self::with_shape(256, 50)
    }

    pub fn with_shape(count: usize, steps: usize) -> Self {
        Self {
            count,
            steps,
            particles: Vec::new(),
        }
    }

    fn initial(count: usize) -> Vec<Particle> {
        (0..count)
            .map(|i| {
                // Deterministic spread over the box, varied velocities.
                let f = i as f64;
                Particle {
                    pos: [
                        (f * 0.618_033_988_75).fract() * BOX_SIZE,
                        (f * 0.414_213_562_37).fract() * BOX_SIZE,
                    ],
                    vel: [((f * 1.3).sin()) * 3.0, ((f * 0.7).cos()) * 3.0],
                }
            })
            .collect()
    }

    fn step(&mut self) {
        for p in &mut self.particles {
            p.vel[1] += GRAVITY * DT;
            for axis in 0..2 {
                p.pos[axis] += p.vel[axis] * DT;
                if p.pos[axis] < 0.0 {
                    p.pos[axis] = -p.pos[axis];
                    p.vel[axis] = -p.vel[axis] * RESTITUTION;
                } else if p.pos[axis] > BOX_SIZE {
                    p.pos[axis] = 2.0 * BOX_SIZE - p.pos[axis];
                    p.vel[axis] = -p.vel[axis] * RESTITUTION;
                }
            }
        }
    }

    fn contained(&self) -> bool {
        self.particles.iter().all(|p| {
            p.pos
                .iter()
                .all(|&c| c.is_finite() && (0.0..=BOX_SIZE).contains(&c))
        })
    }
}

impl Default for ParticleMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for ParticleMotion {
    fn name(&self) -> &str {
        "ParticleMotion"
    }

    fn setup(&mut self) -> KernelResult {
        self.particles = Self::initial(self.count);
        Ok(())
    }

    fn run(&mut self) -> KernelResult {
        for _ in 0..self.steps {
            self.step();
        }
        anyhow::ensure!(self.contained(), "a particle escaped the box");
        Ok(())
    }

    fn teardown(&mut self) -> KernelResult {
        self.particles.clear();
        Ok(())
    }
}
