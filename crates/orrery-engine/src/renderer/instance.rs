use bytemuck::{Pod, Zeroable};

/// World-space transform of one entity, read by the host renderer straight
/// out of wasm memory. 12 floats = 48 bytes per instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TransformInstance {
    /// Entity id, stored as a float so the whole record is one f32 array.
    pub id: f32,
    pub position: [f32; 3],
    /// Rotation quaternion, xyzw.
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// 1.0 when the host should draw the entity, 0.0 otherwise.
    pub visible: f32,
}

impl TransformInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Per-frame buffer of transform instances.
pub struct TransformBuffer {
    instances: Vec<TransformInstance>,
}

impl TransformBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(max: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: TransformInstance) {
        self.instances.push(instance);
    }

    pub fn instances(&self) -> &[TransformInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Flat float view of the buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for direct reads from wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for TransformBuffer {
    fn default() -> Self {
        Self::new()
    }
}
