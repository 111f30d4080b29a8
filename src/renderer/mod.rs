mod machinery;
mod worker;

use std::num::NonZeroUsize;

pub use crate::renderer::machinery::{RenderProgress, render};

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    /// Maximum number of reflection / refraction bounces per primary ray
    pub max_depth: u32,
    /// Number of worker threads, all CPUs if None
    pub threads: Option<NonZeroUsize>,
}

impl RenderSettings {
    pub fn thread_count(&self) -> usize {
        self.threads.map_or_else(num_cpus::get, NonZeroUsize::get)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            max_depth: 5,
            threads: None,
        }
    }
}
