/// glsteps Core Library - 4x4 transform math and the tutorial scenes
///
/// This library provides the stateless transform functions (identity,
/// composition, rotation, projection, look-at, inverse), the geometry of the
/// tutorial meshes, and the per-frame scene description that front-ends draw.

pub mod angle;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use angle::{deg_to_rad, rad_to_deg};
pub use error::{TransformError, TransformResult};
pub use geometry::{Mesh, Triangle, Vertex};
pub use projection::{look_at, orthographic, perspective, Camera, ProjectionMode};
pub use scene::{DrawItem, SceneState, Tutorial};
