//! Orchestration: template selection, single renders and multi-platform batches.

pub(crate) mod composer;
pub(crate) mod renderer;
pub(crate) mod select;
