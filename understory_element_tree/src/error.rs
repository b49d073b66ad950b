// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by structural mutations.
//!
//! Queries never fail: a stale key or a missing match is reported as `None`,
//! `false`, or an empty list. Only mutations return [`TreeResult`], and every
//! rejected mutation leaves the tree exactly as it was.

use thiserror::Error;

use crate::types::{ElementKey, EntityId};

/// Reasons a structural mutation was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The key refers to an element that was destroyed (or never existed in this canvas).
    #[error("element {0:?} is not alive")]
    StaleElement(ElementKey),

    /// The new parent is the element itself or one of its descendants.
    #[error("cannot move {element:?} under {new_parent:?}: would create a cycle")]
    CycleRejected {
        /// Element being moved.
        element: ElementKey,
        /// Requested parent.
        new_parent: ElementKey,
    },

    /// An insertion anchor is not a direct child of the target parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Target parent, or `None` for the canvas.
        parent: Option<ElementKey>,
        /// Offending anchor.
        child: ElementKey,
    },

    /// The element still has an owner; detach it before adding it elsewhere.
    #[error("element {0:?} is already attached")]
    AlreadyAttached(ElementKey),

    /// No element in this canvas is hosted by the given entity.
    #[error("no element for entity {0}")]
    UnknownEntity(EntityId),

    /// The entity already hosts an element.
    #[error("entity {0} already hosts an element")]
    DuplicateEntity(EntityId),

    /// The element already has a handler registered for this capability.
    #[error("element {0:?} already has a handler for this capability")]
    DuplicateHandler(ElementKey),
}

/// Result type for element tree mutations.
pub type TreeResult<T> = Result<T, TreeError>;
