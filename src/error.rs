// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Consolidated error handling types.

use derive_more::{Display, Error, From};

use crate::{pattern::InvalidPattern, step::AmbiguousMatch, tagexpr};

/// Top-level error of loading definitions and matching step lines.
///
/// Consolidates the failure domains of all the operations into a single,
/// structured hierarchy.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Malformed step definition pattern.
    ///
    /// Fatal to the loading phase: a broken pattern cannot be skipped
    /// without affecting match sets of real steps.
    #[display("Invalid step pattern: {_0}")]
    Pattern(InvalidPattern),

    /// Malformed tag filter expression on a hook definition.
    #[display("Invalid tag filter: {_0}")]
    Filter(tagexpr::ParseError),

    /// Step line matched by multiple step definitions.
    #[display("Ambiguous step: {_0}")]
    Ambiguous(AmbiguousMatch),
}

/// Result type alias using the crate's `Error`.
pub type Result<T> = std::result::Result<T, Error>;
