//! Retained display lists and the per-frame scene they are submitted to.
//!
//! Widgets record their geometry once into a [`DisplayList`] and resubmit it
//! every frame with a fresh transform and transparency. The scene collects
//! submissions into depth layers; the renderer drains layers in ascending
//! order and converts each submission to a [`GpuInstance`] at upload time.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::geometry::Transform;
use crate::skin::PipelineId;

/// One textured vertex of a recorded display list.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuVertex {
    /// Position in the list's local coordinate space, logical pixels.
    pub position: [f32; 2],
    /// Normalized atlas coordinates.
    pub uv: [f32; 2],
}

/// Recorded triangle-strip geometry, shared between frames.
///
/// Vertices live behind an `Arc`, so resubmitting a list each frame copies a
/// pointer rather than the geometry.
#[derive(Clone, Debug)]
pub struct DisplayList {
    vertices: Arc<[GpuVertex]>,
    pipeline: PipelineId,
}

impl DisplayList {
    pub fn new(vertices: Vec<GpuVertex>, pipeline: PipelineId) -> Self {
        Self {
            vertices: vertices.into(),
            pipeline,
        }
    }

    pub fn vertices(&self) -> &[GpuVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn pipeline(&self) -> PipelineId {
        self.pipeline
    }
}

/// A display list queued for drawing this frame.
#[derive(Clone, Debug)]
pub struct Submission {
    pub list: DisplayList,
    /// Local-to-screen transform, logical pixels.
    pub transform: Transform,
    /// Fade alpha forwarded to the shader, 1.0 fully opaque.
    pub transparency: f32,
}

/// GPU-ready instance data for one submission.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuInstance {
    /// Row-major 2x3 local-to-physical matrix.
    pub matrix: [f32; 6],
    pub transparency: f32,
    pub _pad: f32,
}

impl GpuInstance {
    /// Create a GPU instance from a submission.
    /// This is the GPU boundary where we scale from logical to physical pixels.
    pub fn from_submission(submission: &Submission, scale_factor: f32) -> Self {
        Self {
            matrix: submission.transform.scaled(scale_factor).to_array(),
            transparency: submission.transparency,
            _pad: 0.0,
        }
    }
}

#[derive(Default)]
pub struct Scene {
    submissions: Vec<(u32, Submission)>, // (layer, submission)
    current_layer: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.submissions.clear();
        self.current_layer = 0;
    }

    /// Set the current layer for subsequent submissions.
    /// Higher layers are rendered on top of lower layers.
    pub fn set_layer(&mut self, layer: u32) {
        self.current_layer = layer;
    }

    /// Get the current layer.
    pub fn layer(&self) -> u32 {
        self.current_layer
    }

    /// Queue a display list for this frame on the current layer.
    pub fn submit(&mut self, list: &DisplayList, transform: Transform, transparency: f32) {
        self.submissions.push((
            self.current_layer,
            Submission {
                list: list.clone(),
                transform,
                transparency,
            },
        ));
    }

    /// Get all unique layers used in this scene, sorted.
    pub fn layers(&self) -> Vec<u32> {
        let mut layers: Vec<u32> = self.submissions.iter().map(|(l, _)| *l).collect();
        layers.sort();
        layers.dedup();
        layers
    }

    pub fn submissions_for_layer(&self, layer: u32) -> Vec<&Submission> {
        self.submissions
            .iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, s)| s)
            .collect()
    }

    /// Get GPU instances for a specific layer.
    /// This is the GPU boundary where we scale from logical to physical pixels.
    pub fn gpu_instances_for_layer(&self, layer: u32, scale_factor: f32) -> Vec<GpuInstance> {
        self.submissions
            .iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, s)| GpuInstance::from_submission(s, scale_factor))
            .collect()
    }

    pub fn submissions(&self) -> Vec<&Submission> {
        self.submissions.iter().map(|(_, s)| s).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::skin::PipelineId;

    fn test_list() -> DisplayList {
        DisplayList::new(
            vec![
                GpuVertex {
                    position: [-1.0, -1.0],
                    uv: [0.0, 0.0],
                },
                GpuVertex {
                    position: [-1.0, 1.0],
                    uv: [0.0, 1.0],
                },
                GpuVertex {
                    position: [1.0, -1.0],
                    uv: [1.0, 0.0],
                },
                GpuVertex {
                    position: [1.0, 1.0],
                    uv: [1.0, 1.0],
                },
            ],
            PipelineId(0),
        )
    }

    #[test]
    fn test_display_list_clone_shares_vertices() {
        let list = test_list();
        let copy = list.clone();
        assert_eq!(copy.vertex_count(), 4);
        assert_eq!(list.vertices().as_ptr(), copy.vertices().as_ptr());
    }

    #[test]
    fn test_scene_submit() {
        let mut scene = Scene::new();
        let list = test_list();
        scene.submit(&list, Transform::IDENTITY, 1.0);

        assert_eq!(scene.submissions().len(), 1);
        assert_eq!(scene.layers(), vec![0]);
    }

    #[test]
    fn test_scene_layers_sorted() {
        let mut scene = Scene::new();
        let list = test_list();

        scene.set_layer(5);
        scene.submit(&list, Transform::IDENTITY, 1.0);
        scene.set_layer(1);
        scene.submit(&list, Transform::IDENTITY, 0.5);
        scene.submit(&list, Transform::IDENTITY, 0.25);

        assert_eq!(scene.layers(), vec![1, 5]);
        assert_eq!(scene.submissions_for_layer(1).len(), 2);
        assert_eq!(scene.submissions_for_layer(5).len(), 1);
        assert!(scene.submissions_for_layer(3).is_empty());
    }

    #[test]
    fn test_gpu_instance_conversion() {
        let submission = Submission {
            list: test_list(),
            transform: Transform::translation(Point::new(10.0, 20.0)),
            transparency: 0.5,
        };

        // Test with scale_factor 1.0 (no scaling)
        let instance = GpuInstance::from_submission(&submission, 1.0);
        assert!((instance.matrix[4] - 10.0).abs() < 0.001);
        assert!((instance.matrix[5] - 20.0).abs() < 0.001);
        assert!((instance.transparency - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_gpu_instance_scaling() {
        let submission = Submission {
            list: test_list(),
            transform: Transform::translation(Point::new(10.0, 20.0)),
            transparency: 1.0,
        };

        // Test with scale_factor 2.0 (2x scaling)
        let instance = GpuInstance::from_submission(&submission, 2.0);

        // Every matrix entry should be scaled by 2x
        assert!((instance.matrix[0] - 2.0).abs() < 0.001); // 1 * 2 = 2
        assert!((instance.matrix[3] - 2.0).abs() < 0.001);
        assert!((instance.matrix[4] - 20.0).abs() < 0.001); // 10 * 2 = 20
        assert!((instance.matrix[5] - 40.0).abs() < 0.001); // 20 * 2 = 40
        // Transparency is not a length and stays untouched.
        assert!((instance.transparency - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_scene_clear() {
        let mut scene = Scene::new();
        let list = test_list();
        scene.set_layer(3);
        scene.submit(&list, Transform::IDENTITY, 1.0);

        scene.clear();

        assert!(scene.is_empty());
        assert_eq!(scene.layer(), 0);
    }
}
