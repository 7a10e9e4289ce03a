//! Declarative scene-graph loading, validation and animated render traversal.
//!
//! The flow mirrors how a scene is used at runtime:
//!
//! - Load a [`Declaration`] (JSON attribute tree)
//! - Build a validated [`SceneGraph`] with [`SceneGraph::build`]
//! - Call [`SceneGraph::display`] once per frame against a [`Renderer`]
#![forbid(unsafe_code)]

mod decl;
mod foundation;

/// Linear and circular animations.
pub mod animation;
pub(crate) mod eval;
pub(crate) mod graph;
/// Renderer boundary and the in-memory recording renderer.
pub mod render;

pub use crate::decl::node::{AttrValue, DeclNode, Declaration};
pub use crate::eval::clock::FrameClock;
pub use crate::foundation::core::{Axis, DMat4, DVec3, DVec4, Rgba, TransformOp, compose};
pub use crate::foundation::error::{SceneError, SceneResult};
pub use crate::foundation::ids::{
    AnimationIdx, ComponentIdx, EntityKind, Handle, LightIdx, MaterialIdx, PrimitiveIdx,
    TextureIdx, TransformIdx, ViewIdx,
};
pub use crate::graph::builder::BuildOutput;
pub use crate::graph::diag::Warning;
pub use crate::graph::model::{
    Ambient, AnimationTemplate, Component, Light, LightColors, Material, MaterialList,
    MaterialSlot, Primitive, SceneMeta, Shape, Texture, TextureRef, TextureSlot,
    TransformTemplate, View,
};
pub use crate::graph::opts::{GraphOpts, HeadingMode};
pub use crate::graph::scene::SceneGraph;
pub use crate::graph::table::EntityTable;
pub use crate::render::backend::{DrawCall, MaterialBinding, Renderer, TextureBinding};
pub use crate::render::recording::{RecordingRenderer, RenderCall};
pub use crate::render::traversal::FrameStats;
