#![allow(dead_code)]

pub mod board;
pub mod server;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::collections::{HashMap, HashSet};
    }
}

pub mod prelude {
    pub use super::board::*;
    pub use super::server::*;
    pub use super::utils::prelude::*;
}
