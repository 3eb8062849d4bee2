//! Inference sessions over exported models, backed by tract-onnx.
//!
//! tract optimizes for concrete shapes, so a session pins batch and time at
//! load. The declared feature width stays whatever the file says; feeding a
//! mismatching width fails inside tract when the plan is built.

use crate::error::{OnnxError, Result};
use crate::FEATURE_WIDTH;
use rand::Rng;
use std::path::Path;
use tract_onnx::prelude::*;

type RunnableOnnx = RunnableModel<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// One forward-pass result: shape plus flat data.
#[derive(Debug, Clone)]
pub struct SessionOutput {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// A loaded, optimized model pinned to a concrete input shape.
pub struct ActivationSession {
    plan: RunnableOnnx,
    input_name: String,
    input_shape: [usize; 3],
}

impl ActivationSession {
    /// Load a model for `(batch, time_steps, FEATURE_WIDTH)` inputs.
    pub fn load(path: impl AsRef<Path>, batch: usize, time_steps: usize) -> Result<Self> {
        Self::load_with_shape(path, [batch, time_steps, FEATURE_WIDTH])
    }

    /// Load a model pinned to an explicit input shape.
    ///
    /// The shape is taken at face value; a feature width the model was not
    /// exported with surfaces as a runtime error here.
    pub fn load_with_shape(path: impl AsRef<Path>, shape: [usize; 3]) -> Result<Self> {
        let path = path.as_ref();
        let inference = tract_onnx::onnx().model_for_path(path)?;

        // Discover the declared input name rather than assuming it.
        let outlet = inference.input_outlets()?[0];
        let input_name = inference.node(outlet.node).name.clone();

        let plan = inference
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(shape[0], shape[1], shape[2])),
            )?
            .into_optimized()?
            .into_runnable()?;

        tracing::debug!(
            path = %path.display(),
            input = %input_name,
            ?shape,
            "session ready"
        );

        Ok(Self {
            plan,
            input_name,
            input_shape: shape,
        })
    }

    /// Name of the model's declared input tensor.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// The pinned input shape.
    pub fn input_shape(&self) -> [usize; 3] {
        self.input_shape
    }

    /// Run one forward pass over flat row-major input data.
    pub fn run(&self, input: &[f32]) -> Result<SessionOutput> {
        let [batch, time, features] = self.input_shape;
        let expected = batch * time * features;
        if input.len() != expected {
            return Err(OnnxError::Shape(format!(
                "input has {} values, session expects {} ({:?})",
                input.len(),
                expected,
                self.input_shape
            )));
        }

        let array = tract_ndarray::Array3::from_shape_vec((batch, time, features), input.to_vec())?;
        let result = self.plan.run(tvec!(Tensor::from(array).into()))?;
        let output = &result[0];
        let view = output.to_array_view::<f32>()?;

        Ok(SessionOutput {
            shape: output.shape().to_vec(),
            data: view.iter().copied().collect(),
        })
    }

    /// Run one forward pass over a uniformly random input tensor.
    pub fn run_random(&self) -> Result<SessionOutput> {
        let [batch, time, features] = self.input_shape;
        let mut rng = rand::thread_rng();
        let input: Vec<f32> = (0..batch * time * features)
            .map(|_| rng.gen::<f32>() * 2.0 - 1.0)
            .collect();
        self.run(&input)
    }
}
