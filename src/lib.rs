pub mod config;
pub mod error;
pub mod native;
pub mod runtime;
pub mod shim;
#[cfg(test)]
mod test;
