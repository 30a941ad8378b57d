//! Per-frame simulation tick
//!
//! One tick, driven by an externally measured `dt`:
//! 1. Draw every body, then integrate it
//! 2. Test every unordered pair `i < j` that involves a ball
//! 3. Resolve contacts according to the configured policy
//!
//! Contacts are resolved in pair index order and mutate state in place, so
//! later pairs see bodies already moved by earlier ones.

use serde::{Deserialize, Serialize};

use super::collision::{Contact, detect};
use super::forces::ForceModel;
use super::integrator::{check_step, integrate};
use super::resolve::{check_restitution, resolve};
use super::scene::Scene;
use super::state::{Body, BodyDesc};
use crate::error::Result;
use crate::render::Renderer;
use crate::settings::SimConfig;

/// How the contacts found in one tick are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResolutionPolicy {
    /// Resolve each colliding pair as soon as it is found
    #[default]
    Immediate,
    /// Detect everything first, then resolve at most one contact per ball:
    /// the deepest one, claimed greedily in pair order
    DeepestPerBody,
}

/// Counters for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickStats {
    pub tick: u64,
    /// Pairs handed to the detector
    pub pairs_tested: usize,
    /// Pairs found overlapping
    pub contacts: usize,
    /// Contacts actually resolved
    pub resolved: usize,
    /// Balls removed for leaving the bounds
    pub removed: usize,
}

/// Mutable references to two distinct bodies, `i < j`
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Advance the scene by one frame of `dt` seconds
pub fn tick(
    scene: &mut Scene,
    config: &SimConfig,
    forces: &ForceModel,
    renderer: &mut dyn Renderer,
    dt: f32,
) -> Result<TickStats> {
    check_step(dt)?;
    check_restitution(config.restitution)?;
    if dt > config.large_step_warning {
        log::warn!(
            "Large step dt={:.3}s (> {:.3}s): deep penetration or tunneling possible",
            dt,
            config.large_step_warning
        );
    }

    for body in scene.bodies_mut() {
        body.draw(renderer);
        integrate(body, forces, dt)?;
    }

    let mut stats = match config.policy {
        ResolutionPolicy::Immediate => resolve_immediate(scene, config)?,
        ResolutionPolicy::DeepestPerBody => resolve_deepest_per_body(scene, config)?,
    };

    if let Some(bounds) = &config.bounds {
        stats.removed = scene.retain_within(bounds);
    }

    Ok(stats)
}

fn resolve_immediate(scene: &mut Scene, config: &SimConfig) -> Result<TickStats> {
    let mut stats = TickStats::default();
    let bodies = scene.bodies_mut();
    let n = bodies.len();

    for i in 0..n {
        for j in (i + 1)..n {
            if !bodies[i].is_movable() && !bodies[j].is_movable() {
                continue;
            }
            stats.pairs_tested += 1;
            let contact = detect(&bodies[i], &bodies[j])?;
            if !contact.collided {
                continue;
            }
            stats.contacts += 1;
            log::debug!(
                "Contact {}#{} / {}#{}: depth={:.4} normal={}",
                bodies[i].kind().as_str(),
                i,
                bodies[j].kind().as_str(),
                j,
                contact.penetration,
                contact.normal
            );
            let (a, b) = pair_mut(bodies, i, j);
            resolve(a, b, &contact, config.restitution, config.split)?;
            stats.resolved += 1;
        }
    }

    Ok(stats)
}

fn resolve_deepest_per_body(scene: &mut Scene, config: &SimConfig) -> Result<TickStats> {
    let mut stats = TickStats::default();
    let bodies = scene.bodies_mut();
    let n = bodies.len();

    // Detect everything against the post-integration state
    let mut found: Vec<(usize, usize, Contact)> = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if !bodies[i].is_movable() && !bodies[j].is_movable() {
                continue;
            }
            stats.pairs_tested += 1;
            let contact = detect(&bodies[i], &bodies[j])?;
            if contact.collided {
                found.push((i, j, contact));
            }
        }
    }
    stats.contacts = found.len();

    // Greedy claim: a contact takes its balls only if it is deeper than each
    // ball's current claim; displaced contacts release both of their bodies
    let mut claims: Vec<Option<usize>> = vec![None; n];
    let mut accepted = vec![false; found.len()];
    for (k, &(i, j, contact)) in found.iter().enumerate() {
        let movable: Vec<usize> = [i, j]
            .into_iter()
            .filter(|&b| bodies[b].is_movable())
            .collect();
        let wins = movable.iter().all(|&b| match claims[b] {
            None => true,
            Some(other) => contact.penetration > found[other].2.penetration,
        });
        if !wins {
            continue;
        }
        for &b in &movable {
            if let Some(other) = claims[b] {
                accepted[other] = false;
                let (oi, oj, _) = found[other];
                for x in [oi, oj] {
                    if claims[x] == Some(other) {
                        claims[x] = None;
                    }
                }
            }
        }
        for &b in &movable {
            claims[b] = Some(k);
        }
        accepted[k] = true;
    }

    for (&(i, j, contact), _) in found.iter().zip(&accepted).filter(|(_, a)| **a) {
        log::debug!(
            "Deepest contact {}#{} / {}#{}: depth={:.4}",
            bodies[i].kind().as_str(),
            i,
            bodies[j].kind().as_str(),
            j,
            contact.penetration
        );
        let (a, b) = pair_mut(bodies, i, j);
        resolve(a, b, &contact, config.restitution, config.split)?;
        stats.resolved += 1;
    }

    Ok(stats)
}

/// A scene plus everything needed to advance it
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    scene: Scene,
    forces: ForceModel,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: SimConfig, descs: &[BodyDesc]) -> Result<Self> {
        config.validate()?;
        let scene = Scene::build(&config, descs)?;
        let forces = ForceModel::from_config(&config);
        Ok(Self {
            config,
            scene,
            forces,
            ticks: 0,
        })
    }

    /// Advance by one externally timed frame
    pub fn update(&mut self, dt: f32, renderer: &mut dyn Renderer) -> Result<TickStats> {
        let mut stats = tick(&mut self.scene, &self.config, &self.forces, renderer, dt)?;
        self.ticks += 1;
        stats.tick = self.ticks;
        log::trace!(
            "Tick {}: dt={:.4} tested={} contacts={} resolved={} removed={}",
            stats.tick,
            dt,
            stats.pairs_tested,
            stats.contacts,
            stats.resolved,
            stats.removed
        );
        Ok(stats)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
