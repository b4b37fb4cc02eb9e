//! Node definitions for the host's plugin registration contract.
//!
//! Each node declares a typed input schema, named outputs, and a category
//! for UI grouping, and exposes one async entry point. The host supplies
//! input values keyed by the declared names and consumes the outputs in
//! declared order.

mod generator;
mod preview;

pub use generator::{GeneratorInputs, GeneratorOutput, VideoGeneratorNode};
pub use preview::VideoPreviewNode;

use crate::error::{Result, RunwayError};
use async_trait::async_trait;
use image::DynamicImage;
use std::collections::HashMap;

/// Category tag both nodes register under.
pub const CATEGORY: &str = "runway";

/// Kind and defaults of one declared input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    /// Host-native image buffer.
    Image,
    /// Free-form text with a default.
    Text {
        /// Default value shown by the host.
        default: &'static str,
    },
    /// Integer with host-enforced bounds.
    Int {
        /// Default value.
        default: i64,
        /// Minimum accepted value.
        min: i64,
        /// Maximum accepted value.
        max: i64,
    },
    /// One of a fixed set of options.
    Select {
        /// Accepted option strings.
        options: &'static [&'static str],
        /// Default option.
        default: &'static str,
    },
    /// Boolean toggle.
    Bool {
        /// Default value.
        default: bool,
    },
}

/// One entry of a node's input schema.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    /// Input name the host keys values by.
    pub name: &'static str,
    /// Kind and defaults.
    pub kind: InputKind,
}

/// Type of one declared output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// String output.
    Text,
    /// Image output.
    Image,
}

/// One entry of a node's output declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSpec {
    /// Output name shown by the host.
    pub name: &'static str,
    /// Output type.
    pub kind: OutputKind,
}

/// Registration record for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    /// Internal node name.
    pub name: &'static str,
    /// Display name shown in the host UI.
    pub display_name: &'static str,
    /// Category tag for UI grouping.
    pub category: &'static str,
    /// Declared inputs.
    pub inputs: Vec<InputSpec>,
    /// Declared outputs, in the order `execute` yields them.
    pub outputs: Vec<OutputSpec>,
}

/// A value supplied by the host for one declared input.
#[derive(Debug, Clone)]
pub enum InputValue {
    /// Image buffer.
    Image(DynamicImage),
    /// Text or select value.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
}

/// A value yielded for one declared output.
#[derive(Debug, Clone)]
pub enum OutputValue {
    /// String output.
    Text(String),
    /// Image output.
    Image(DynamicImage),
}

/// Input values keyed by declared name.
#[derive(Debug, Clone, Default)]
pub struct NodeInputs(HashMap<String, InputValue>);

impl NodeInputs {
    /// Creates an empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an input value, replacing any previous value of the same name.
    pub fn set(&mut self, name: impl Into<String>, value: InputValue) -> &mut Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Returns the image input of the given name.
    pub fn image(&self, name: &str) -> Result<&DynamicImage> {
        match self.0.get(name) {
            Some(InputValue::Image(img)) => Ok(img),
            Some(_) => Err(mistyped(name, "image")),
            None => Err(missing(name)),
        }
    }

    /// Returns the text input of the given name, or the default.
    pub fn text(&self, name: &str, default: &str) -> Result<String> {
        match self.0.get(name) {
            Some(InputValue::Text(s)) => Ok(s.clone()),
            Some(_) => Err(mistyped(name, "text")),
            None => Ok(default.to_string()),
        }
    }

    /// Returns the integer input of the given name clamped to `[min, max]`,
    /// or the default. Clamping mirrors what the host schema enforces.
    pub fn int(&self, name: &str, default: i64, min: i64, max: i64) -> Result<i64> {
        match self.0.get(name) {
            Some(InputValue::Int(v)) => Ok((*v).clamp(min, max)),
            Some(_) => Err(mistyped(name, "int")),
            None => Ok(default),
        }
    }

    /// Returns the boolean input of the given name, or the default.
    pub fn bool(&self, name: &str, default: bool) -> Result<bool> {
        match self.0.get(name) {
            Some(InputValue::Bool(v)) => Ok(*v),
            Some(_) => Err(mistyped(name, "bool")),
            None => Ok(default),
        }
    }
}

fn missing(name: &str) -> RunwayError {
    RunwayError::InvalidInput(format!("missing required input '{name}'"))
}

fn mistyped(name: &str, expected: &str) -> RunwayError {
    RunwayError::InvalidInput(format!("input '{name}' is not a {expected} value"))
}

/// One registrable node.
#[async_trait]
pub trait Node: Send + Sync {
    /// Registration record: schema, outputs, category.
    fn descriptor(&self) -> NodeDescriptor;

    /// Entry point invoked by the host. Yields one value per declared
    /// output, in declaration order.
    async fn execute(&self, inputs: NodeInputs) -> Result<Vec<OutputValue>>;
}

/// All nodes this crate registers with the host.
pub fn registry() -> Vec<Box<dyn Node>> {
    vec![
        Box::new(VideoGeneratorNode::new()),
        Box::new(VideoPreviewNode::new()),
    ]
}
