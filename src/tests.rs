mod properties;
pub(crate) mod utils;
