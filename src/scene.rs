pub(crate) mod presets;
pub(crate) mod product;
pub(crate) mod store;
pub(crate) mod template;
