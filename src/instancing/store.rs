use crate::error::ParameterError;
use crate::instancing::layout::{grid_layout, InstanceTransform};

/// Largest instance ceiling: the transforms must fit one storage binding
/// under wgpu's default `max_storage_buffer_binding_size` (128 MiB).
pub const MAX_INSTANCE_CEILING: u32 =
    (128 << 20) / size_of::<InstanceTransform>() as u32;

/// Current instance set: count, spacing, and the transforms laid out from
/// them.
///
/// The transform sequence is always regenerated wholesale and always holds
/// exactly `count` entries. Every regeneration raises the dirty flag so the
/// GPU-resident copy is republished before the next draw.
#[derive(Debug, Clone)]
pub struct InstanceStore {
    count: u32,
    spacing: f32,
    max_count: u32,
    transforms: Vec<InstanceTransform>,
    generation: u64,
    dirty: bool,
}

impl InstanceStore {
    /// Build a store and lay out its initial grid.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::ZeroMaxCount`] for a zero ceiling,
    /// [`ParameterError::MaxCountTooLarge`] above [`MAX_INSTANCE_CEILING`],
    /// [`ParameterError::CountOutOfRange`] when `count` is outside
    /// `1..=max_count`, and [`ParameterError::NonPositiveSpacing`] for a
    /// spacing that is not a positive finite number.
    pub fn new(
        count: u32,
        spacing: f32,
        max_count: u32,
    ) -> Result<Self, ParameterError> {
        if max_count == 0 {
            return Err(ParameterError::ZeroMaxCount);
        }
        if max_count > MAX_INSTANCE_CEILING {
            return Err(ParameterError::MaxCountTooLarge {
                max_count,
                limit: MAX_INSTANCE_CEILING,
            });
        }
        if count == 0 || count > max_count {
            return Err(ParameterError::CountOutOfRange {
                count,
                max: max_count,
            });
        }
        validate_spacing(spacing)?;

        Ok(Self {
            count,
            spacing,
            max_count,
            transforms: grid_layout(count, spacing),
            generation: 0,
            dirty: true,
        })
    }

    /// Change the instance count.
    ///
    /// Counts of zero or above the ceiling are ignored. Returns `true` when
    /// the set was regenerated.
    pub fn set_count(&mut self, count: u32) -> bool {
        if count == 0 || count > self.max_count {
            log::warn!(
                "ignoring instance count {count} (allowed 1..={})",
                self.max_count
            );
            return false;
        }
        if count == self.count {
            return false;
        }
        self.count = count;
        self.regenerate();
        true
    }

    /// Change the grid spacing. Returns `Ok(true)` when the set was
    /// regenerated.
    ///
    /// # Errors
    ///
    /// [`ParameterError::NonPositiveSpacing`] when `spacing` is not a
    /// positive finite number; the current layout is kept.
    pub fn set_spacing(&mut self, spacing: f32) -> Result<bool, ParameterError> {
        validate_spacing(spacing)?;
        if spacing == self.spacing {
            return Ok(false);
        }
        self.spacing = spacing;
        self.regenerate();
        Ok(true)
    }

    fn regenerate(&mut self) {
        self.transforms = grid_layout(self.count, self.spacing);
        self.generation += 1;
        self.dirty = true;
        log::debug!(
            "instance layout regenerated: {} instances, spacing {} (gen {})",
            self.count,
            self.spacing,
            self.generation
        );
    }

    /// Current instance count.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Configured ceiling, fixed at construction.
    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Current grid spacing.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Transforms, one per instance, in instance-ID order.
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Number of regenerations since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the GPU copy is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning its previous value.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Force the next publish to re-upload, e.g. after the GPU buffer was
    /// recreated.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn validate_spacing(spacing: f32) -> Result<(), ParameterError> {
    if spacing.is_finite() && spacing > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NonPositiveSpacing(spacing))
    }
}
