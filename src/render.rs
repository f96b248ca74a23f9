pub(crate) mod background;
pub(crate) mod contrast;
pub(crate) mod product;
pub(crate) mod surface;
pub(crate) mod text;
