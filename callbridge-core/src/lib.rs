pub mod broker;
pub mod error;
pub mod host;
pub mod request;
pub mod response;
pub mod transport;
pub mod value;

pub mod calls {
    pub use super::error::*;
    pub use super::request::*;
    pub use super::response::*;
}
