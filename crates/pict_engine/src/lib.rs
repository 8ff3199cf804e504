#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_lossless,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

mod error;
pub use error::*;

mod color;
pub use color::*;

mod pattern;
pub use pattern::*;

mod transfer_mode;
pub use transfer_mode::*;

mod composite;
pub use composite::*;

mod text_style;
pub use text_style::*;
