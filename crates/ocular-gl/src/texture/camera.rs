use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Mat4;

use super::{Texture, TextureOptions, TextureTarget};
use crate::driver::{GlContext, Handle};
use crate::error::{BoxError, GlError, Result};

/// Camera preview surface feeding an external-OES texture.
pub trait FrameSource {
    /// Latches the newest available image into the attached texture.
    fn update_tex_image(&mut self) -> std::result::Result<(), BoxError>;

    /// Texture-coordinate transform for the latched image.
    fn transform_matrix(&self) -> Mat4;
}

/// Count of frames the producer has signalled but the renderer has not latched.
///
/// Written from the producer's callback thread, consumed on the render thread.
#[derive(Debug, Default)]
pub struct FrameSignal {
    pending: AtomicU32,
}

impl FrameSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer side: one more frame is ready.
    pub fn notify(&self) {
        self.pending.fetch_add(1, Ordering::Release);
    }

    pub fn pending(&self) -> u32 {
        self.pending.load(Ordering::Acquire)
    }

    /// Clears the signal, returning how many frames were pending.
    pub fn take_all(&self) -> u32 {
        self.pending.swap(0, Ordering::AcqRel)
    }

    /// Consumes a single pending frame, if any.
    pub fn take_one(&self) -> bool {
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// How pending frames are latched before each bind.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum LatchPolicy {
    /// Latch once per signalled frame until none are pending.
    ///
    /// Keeps the producer's queue empty; preview surfaces that are left with
    /// unconsumed frames can stall.
    #[default]
    Drain,
    /// Latch at most once, dropping intermediate frames. Lowest latency.
    Coalesce,
}

/// External-OES texture fed by a camera preview surface.
pub struct CameraTexture<S: FrameSource> {
    texture: Texture,
    source: S,
    signal: Arc<FrameSignal>,
    policy: LatchPolicy,
}

impl<S: FrameSource> CameraTexture<S> {
    /// Allocates the texture and hands its handle plus the frame signal to
    /// `attach`, which creates the preview surface and wires the producer's
    /// frame-available notification to [`FrameSignal::notify`].
    pub fn new<F>(ctx: GlContext, policy: LatchPolicy, attach: F) -> Result<Self>
    where
        F: FnOnce(Handle, Arc<FrameSignal>) -> std::result::Result<S, BoxError>,
    {
        let texture = Texture::new(ctx, TextureTarget::ExternalOes, TextureOptions::default())?;
        let signal = Arc::new(FrameSignal::new());
        let source = attach(texture.id(), Arc::clone(&signal)).map_err(GlError::Attach)?;

        log::debug!("attached camera source to texture {} ({policy:?})", texture.id());
        Ok(Self {
            texture,
            source,
            signal,
            policy,
        })
    }

    #[inline]
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub fn policy(&self) -> LatchPolicy {
        self.policy
    }

    /// Handle for the producer side; clone it into the frame-available callback.
    #[inline]
    pub fn signal(&self) -> &Arc<FrameSignal> {
        &self.signal
    }

    #[inline]
    pub fn transform_matrix(&self) -> &Mat4 {
        self.texture.transform_matrix()
    }

    /// Latches pending frames per the policy and refreshes the transform.
    ///
    /// Never blocks; returns the number of images latched.
    pub fn latch(&mut self) -> Result<u32> {
        let mut latched = 0;
        match self.policy {
            LatchPolicy::Coalesce => {
                let pending = self.signal.take_all();
                if pending > 0 {
                    self.source.update_tex_image().map_err(GlError::Latch)?;
                    latched = 1;
                    if pending > 1 {
                        log::trace!("coalesced {pending} camera frames into one latch");
                    }
                }
            }
            LatchPolicy::Drain => {
                while self.signal.take_one() {
                    self.source.update_tex_image().map_err(GlError::Latch)?;
                    latched += 1;
                }
            }
        }
        let transform = self.source.transform_matrix();
        self.texture.set_transform_matrix(transform);
        Ok(latched)
    }

    /// Latches pending frames per the policy, then binds to texture unit `unit`.
    pub fn bind(&mut self, unit: u32) -> Result<()> {
        self.latch()?;
        self.texture.bind(unit)
    }

    pub fn release(&mut self) -> Result<()> {
        self.texture.release()
    }
}

impl<S: FrameSource> fmt::Debug for CameraTexture<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraTexture")
            .field("texture", &self.texture)
            .field("pending", &self.signal.pending())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
