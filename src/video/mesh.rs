use crate::errors::*;

use super::assets::prelude::*;
use super::system::VideoSystem;

/// A vertex buffer and an index buffer, together with the vertex layout that
/// describes how the GPU reads the vertex buffer. Deleted on drop.
#[derive(Debug)]
pub struct Mesh {
    video: VideoSystem,
    handle: MeshHandle,
    params: MeshParams,
}

impl Mesh {
    /// Uploads `data`. The byte sizes must match `params` exactly.
    pub fn new(video: &VideoSystem, params: MeshParams, data: MeshData) -> Result<Self> {
        let handle = video.create_mesh(params, data)?;
        Ok(Mesh {
            video: video.clone(),
            handle,
            params,
        })
    }

    #[inline]
    pub fn handle(&self) -> MeshHandle {
        self.handle
    }

    #[inline]
    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    /// Draws `index` with the active program, returns the number of primitives.
    pub fn draw(&self, index: MeshIndex) -> Result<u32> {
        self.video.draw(self.handle, index)
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if let Err(err) = self.video.delete_mesh(self.handle) {
            warn!("[Mesh] failed to delete {}: {}", self.handle, err);
        }
    }
}
