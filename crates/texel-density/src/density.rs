//! Worst-case screen-pixel-per-UV-area ratio across a mesh.
//!
//! Each face is culled, projected, clipped to the viewport and measured on
//! its own; the only shared state is the running maximum. [`DensityResult`]
//! is a monoid (identity = no sample, operation = max), so faces can be
//! visited in any order, split across threads, or streamed in batches and the
//! merged result is the same.

use std::borrow::Borrow;

use glam::DVec3;
use tracing::trace;

use crate::area::{screen_area, uv_area};
use crate::camera::{Camera, Projector};
use crate::clip::{ClipRect, clip_polygon};
use crate::constants::{MIN_POLYGON_VERTICES, SCREEN_AREA_EPSILON, UV_AREA_EPSILON};
use crate::types::{Face, ScreenUvPolygon, ScreenUvVertex, Viewport};
use crate::visibility::{VisibilityCheck, check_depths, check_orientation};

/// Density measured on one face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensitySample {
    /// Position of the face in visitation input
    pub face_index: usize,
    /// Clipped screen area in square pixels
    pub screen_area: f64,
    /// Clipped UV area in UV units
    pub uv_area: f64,
    /// `screen_area / uv_area`
    pub ratio: f64,
}

impl DensitySample {
    /// Build a sample, or `None` when either area is too small to trust.
    pub fn new(face_index: usize, screen_area: f64, uv_area: f64) -> Option<Self> {
        if !(screen_area > SCREEN_AREA_EPSILON) || !(uv_area > UV_AREA_EPSILON) {
            return None;
        }
        Some(Self {
            face_index,
            screen_area,
            uv_area,
            ratio: screen_area / uv_area,
        })
    }

    /// Higher ratio wins; equal ratios go to the lower face index so the
    /// winner never depends on visitation order.
    fn beats(&self, other: &DensitySample) -> bool {
        self.ratio > other.ratio
            || (self.ratio == other.ratio && self.face_index < other.face_index)
    }
}

/// Why a face produced no sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Fewer than three vertices
    Degenerate,
    /// Normal points along the camera's forward direction
    FacesAway,
    /// Every vertex has non-positive depth
    BehindCamera,
    /// Less than a triangle survived the viewport clip
    ClippedAway,
    /// Screen or UV area at or below its epsilon
    ZeroArea,
}

/// Result of measuring one face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceOutcome {
    Sample(DensitySample),
    Excluded(Exclusion),
}

/// Aggregate over any number of faces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DensityResult {
    /// Worst-case sample so far
    pub max_sample: Option<DensitySample>,
    /// Faces folded in
    pub faces_visited: usize,
    /// Faces that produced a sample
    pub faces_sampled: usize,
    /// Faces dropped by the orientation or behind-camera tests
    pub faces_culled: usize,
    /// Faces clipped away entirely
    pub faces_clipped: usize,
    /// Faces with too few vertices or near-zero area
    pub faces_degenerate: usize,
}

impl DensityResult {
    /// Maximum ratio, or `None` when no face produced a sample.
    pub fn max_ratio(&self) -> Option<f64> {
        self.max_sample.map(|sample| sample.ratio)
    }

    pub fn has_sample(&self) -> bool {
        self.max_sample.is_some()
    }

    /// Fold one face outcome in.
    pub fn record(mut self, outcome: FaceOutcome) -> Self {
        self.faces_visited += 1;
        match outcome {
            FaceOutcome::Sample(sample) => {
                self.faces_sampled += 1;
                self.offer(sample);
            }
            FaceOutcome::Excluded(Exclusion::FacesAway | Exclusion::BehindCamera) => {
                self.faces_culled += 1;
            }
            FaceOutcome::Excluded(Exclusion::ClippedAway) => self.faces_clipped += 1,
            FaceOutcome::Excluded(Exclusion::Degenerate | Exclusion::ZeroArea) => {
                self.faces_degenerate += 1;
            }
        }
        self
    }

    /// Combine two partial results. Commutative and associative, with
    /// `DensityResult::default()` as identity.
    pub fn merge(mut self, other: Self) -> Self {
        if let Some(sample) = other.max_sample {
            self.offer(sample);
        }
        self.faces_visited += other.faces_visited;
        self.faces_sampled += other.faces_sampled;
        self.faces_culled += other.faces_culled;
        self.faces_clipped += other.faces_clipped;
        self.faces_degenerate += other.faces_degenerate;
        self
    }

    fn offer(&mut self, sample: DensitySample) {
        match &self.max_sample {
            Some(current) if !sample.beats(current) => {}
            _ => self.max_sample = Some(sample),
        }
    }
}

/// Project a face into pixels, pairing every vertex with its UV.
/// Also returns the per-vertex depths for the behind-camera test.
pub fn project_face(face: &Face, projector: &Projector) -> (ScreenUvPolygon, Vec<f64>) {
    face.vertices
        .iter()
        .map(|vertex| {
            let (screen, depth) = projector.world_to_screen(vertex.position);
            (ScreenUvVertex::from_screen_uv(screen, vertex.uv), depth)
        })
        .unzip()
}

/// Measure one face. `camera_forward` is passed in so it is computed once
/// per pass rather than per face.
pub fn face_density(
    face_index: usize,
    face: &Face,
    projector: &Projector,
    camera_forward: DVec3,
) -> FaceOutcome {
    if let Some(reason) = exclusion(check_orientation(face, camera_forward)) {
        return FaceOutcome::Excluded(reason);
    }

    let (polygon, depths) = project_face(face, projector);
    if let Some(reason) = exclusion(check_depths(depths)) {
        return FaceOutcome::Excluded(reason);
    }

    let clipped = clip_polygon(&polygon, &ClipRect::from_viewport(projector.viewport()));
    if clipped.len() < MIN_POLYGON_VERTICES {
        return FaceOutcome::Excluded(Exclusion::ClippedAway);
    }

    match DensitySample::new(face_index, screen_area(&clipped), uv_area(&clipped)) {
        Some(sample) => FaceOutcome::Sample(sample),
        None => FaceOutcome::Excluded(Exclusion::ZeroArea),
    }
}

fn exclusion(check: VisibilityCheck) -> Option<Exclusion> {
    match check {
        VisibilityCheck::Visible => None,
        VisibilityCheck::FacesAway => Some(Exclusion::FacesAway),
        VisibilityCheck::BehindCamera => Some(Exclusion::BehindCamera),
        VisibilityCheck::Degenerate => Some(Exclusion::Degenerate),
    }
}

fn trace_outcome(face_index: usize, outcome: &FaceOutcome) {
    match outcome {
        FaceOutcome::Sample(sample) => trace!(
            "face {}: screen {:.3} px^2, uv {:.6}, ratio {:.3}",
            face_index,
            sample.screen_area,
            sample.uv_area,
            sample.ratio
        ),
        FaceOutcome::Excluded(reason) => trace!("face {} excluded: {:?}", face_index, reason),
    }
}

/// Fold every face into a [`DensityResult`], in iteration order.
pub fn accumulate_density<I>(faces: I, camera: &Camera, viewport: &Viewport) -> DensityResult
where
    I: IntoIterator,
    I::Item: Borrow<Face>,
{
    let projector = camera.projector(viewport);
    let forward = camera.forward();

    faces
        .into_iter()
        .enumerate()
        .fold(DensityResult::default(), |result, (index, face)| {
            let outcome = face_density(index, face.borrow(), &projector, forward);
            trace_outcome(index, &outcome);
            result.record(outcome)
        })
}

/// Same as [`accumulate_density`], with faces spread over the rayon pool.
#[cfg(feature = "parallel")]
pub fn accumulate_density_par(
    faces: &[Face],
    camera: &Camera,
    viewport: &Viewport,
) -> DensityResult {
    use rayon::prelude::*;

    let projector = camera.projector(viewport);
    let forward = camera.forward();

    faces
        .par_iter()
        .enumerate()
        .fold(DensityResult::default, |result, (index, face)| {
            let outcome = face_density(index, face, &projector, forward);
            trace_outcome(index, &outcome);
            result.record(outcome)
        })
        .reduce(DensityResult::default, DensityResult::merge)
}
