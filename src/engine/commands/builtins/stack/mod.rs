pub mod dirs;
pub mod popd;
pub mod pushd;
