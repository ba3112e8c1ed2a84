// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by every part of the renderer.

use failure::Fail;

/// Everything that can go wrong while configuring or running a render.
/// Reaching the iteration limit is not in here: that's the interior
/// sentinel, and it is a perfectly good answer.
#[derive(Clone, Debug, Fail, PartialEq)]
pub enum Error {
    /// A complex reciprocal or division whose divisor has a squared
    /// modulus of zero.
    #[fail(display = "division by zero")]
    DivisionByZero,

    /// A camera, histogram, engine or grid was built with values it
    /// cannot work with.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfiguration(String),

    /// The render noticed its cancellation token between batches.
    #[fail(display = "render cancelled")]
    Cancelled,

    /// One of the scoped render threads panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn invalid<T, S: Into<String>>(message: S) -> Result<T> {
    Err(Error::InvalidConfiguration(message.into()))
}
