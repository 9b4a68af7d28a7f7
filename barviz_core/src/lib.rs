// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `barviz_core`: a small retained SVG scene graph.
//!
//! Charts draw into a [`Scene`] the way D3-style code draws into a DOM subtree:
//! - nodes are appended under a parent and addressed by a stable [`NodeId`],
//! - every node carries a class list (styling hooks) and an optional translation,
//! - nodes can be selected by class, measured ([`Scene::bbox`]), mutated, and removed,
//! - the whole tree serializes to SVG text ([`Scene::to_svg_string`]).
//!
//! Visual appearance beyond geometry is left to an external stylesheet: paints are
//! optional on every node and omitted from the output when unset.

#![no_std]

extern crate alloc;

mod node;
mod scene;
mod svg;

pub use node::{
    LineNode, Node, NodeKind, PathNode, RectNode, Stroke, SvgRoot, TextAnchor, TextNode, Tspan,
};
pub use scene::Scene;

/// Stable identifier for a node in a [`Scene`].
///
/// Ids are allocated monotonically and never reused within one scene, so a stale id
/// held after [`Scene::remove`] simply stops resolving.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);
