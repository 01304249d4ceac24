//! Retrieves information about the version of the engine from Git and the build
//! environment. The generated module is exposed at runtime as `crate::build`
//! and reported in the `uci` handshake.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
