//! Structural validation of exported model files.
//!
//! Decodes the protobuf and walks the graph: node references must resolve,
//! names must be unique, the opset must match, and the declared interface
//! must be the one consumers rely on (named tensors, dynamic batch/time
//! axes, fixed feature width). Every failure is a specific error kind, never
//! a swallowed generic message.

use crate::graph::{BATCH_AXIS, TIME_AXIS};
use crate::pb::{
    data_type, tensor_shape_proto, type_proto, ModelProto, ValueInfoProto,
};
use crate::{FEATURE_WIDTH, INPUT_NAME, NUM_CLASSES, OPSET_VERSION, OUTPUT_NAME};
use prost::Message;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// A specific structural defect in an exported model.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error reading model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model protobuf failed to decode: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Model carries no graph")]
    MissingGraph,

    #[error("Default-domain opset {expected} not declared (found {found:?})")]
    OpsetMismatch { expected: i64, found: Option<i64> },

    #[error("Node '{0}' has an empty op type")]
    EmptyOpType(String),

    #[error("Value name '{0}' declared more than once")]
    DuplicateValue(String),

    #[error("Node '{node}' reads '{input}' which nothing produces")]
    UnresolvedInput { node: String, input: String },

    #[error("Graph output '{0}' is not produced by any node")]
    UnproducedOutput(String),

    #[error("Graph declares no inputs")]
    MissingModelInput,

    #[error("Input tensor is named '{0}', expected '{INPUT_NAME}'")]
    BadInputName(String),

    #[error("Output tensor is named '{0}', expected '{OUTPUT_NAME}'")]
    BadOutputName(String),

    #[error("Tensor '{tensor}' has element type {found}, expected float")]
    BadElemType { tensor: String, found: i32 },

    #[error("Tensor '{tensor}' has no shape information")]
    MissingShape { tensor: String },

    #[error("Input feature width is {found:?}, expected {expected}")]
    BadFeatureWidth { expected: i64, found: Option<i64> },

    #[error("Output class count is {found:?}, expected {expected}")]
    BadClassCount { expected: i64, found: Option<i64> },

    #[error("Tensor '{tensor}' axis {axis} should be the dynamic '{param}' axis")]
    MissingDynamicAxis {
        tensor: String,
        axis: usize,
        param: &'static str,
    },
}

/// Read and validate a model file.
pub fn check_model_file(path: impl AsRef<Path>) -> Result<(), ValidationError> {
    let bytes = std::fs::read(path)?;
    let model = ModelProto::decode(bytes.as_slice())?;
    check_model(&model)
}

/// Validate a decoded model.
pub fn check_model(model: &ModelProto) -> Result<(), ValidationError> {
    let declared = model
        .opset_import
        .iter()
        .find(|o| o.domain.is_empty())
        .map(|o| o.version);
    if declared != Some(OPSET_VERSION) {
        return Err(ValidationError::OpsetMismatch {
            expected: OPSET_VERSION,
            found: declared,
        });
    }

    let graph = model.graph.as_ref().ok_or(ValidationError::MissingGraph)?;

    // Every value name must be introduced exactly once.
    let mut known: HashSet<&str> = HashSet::new();
    for input in &graph.input {
        if !known.insert(&input.name) {
            return Err(ValidationError::DuplicateValue(input.name.clone()));
        }
    }
    for init in &graph.initializer {
        if !known.insert(&init.name) {
            return Err(ValidationError::DuplicateValue(init.name.clone()));
        }
    }

    // Node inputs must resolve to something already produced; outputs extend
    // the known set (nodes are stored in topological order).
    for node in &graph.node {
        if node.op_type.is_empty() {
            return Err(ValidationError::EmptyOpType(node.name.clone()));
        }
        for input in &node.input {
            // Empty names mark skipped optional inputs.
            if !input.is_empty() && !known.contains(input.as_str()) {
                return Err(ValidationError::UnresolvedInput {
                    node: node.name.clone(),
                    input: input.clone(),
                });
            }
        }
        for output in &node.output {
            if !known.insert(output) {
                return Err(ValidationError::DuplicateValue(output.clone()));
            }
        }
    }

    for output in &graph.output {
        if !known.contains(output.name.as_str()) {
            return Err(ValidationError::UnproducedOutput(output.name.clone()));
        }
    }

    // Declared interface: input (batch, time, 272), output (batch, 3, time).
    let input = graph.input.first().ok_or(ValidationError::MissingModelInput)?;
    if input.name != INPUT_NAME {
        return Err(ValidationError::BadInputName(input.name.clone()));
    }
    let input_dims = tensor_dims(input)?;
    expect_dynamic(input, input_dims, 0, BATCH_AXIS)?;
    expect_dynamic(input, input_dims, 1, TIME_AXIS)?;
    let width = fixed_dim(input_dims, 2);
    if width != Some(FEATURE_WIDTH as i64) {
        return Err(ValidationError::BadFeatureWidth {
            expected: FEATURE_WIDTH as i64,
            found: width,
        });
    }

    let output = graph.output.first().ok_or(ValidationError::UnproducedOutput(
        OUTPUT_NAME.to_string(),
    ))?;
    if output.name != OUTPUT_NAME {
        return Err(ValidationError::BadOutputName(output.name.clone()));
    }
    let output_dims = tensor_dims(output)?;
    expect_dynamic(output, output_dims, 0, BATCH_AXIS)?;
    expect_dynamic(output, output_dims, 2, TIME_AXIS)?;
    let classes = fixed_dim(output_dims, 1);
    if classes != Some(NUM_CLASSES as i64) {
        return Err(ValidationError::BadClassCount {
            expected: NUM_CLASSES as i64,
            found: classes,
        });
    }

    Ok(())
}

fn tensor_dims(
    value: &ValueInfoProto,
) -> Result<&[tensor_shape_proto::Dimension], ValidationError> {
    let tensor = match value.r#type.as_ref().and_then(|t| t.value.as_ref()) {
        Some(type_proto::Value::TensorType(tensor)) => tensor,
        None => {
            return Err(ValidationError::MissingShape {
                tensor: value.name.clone(),
            })
        }
    };
    if tensor.elem_type != data_type::FLOAT {
        return Err(ValidationError::BadElemType {
            tensor: value.name.clone(),
            found: tensor.elem_type,
        });
    }
    tensor
        .shape
        .as_ref()
        .map(|s| s.dim.as_slice())
        .ok_or(ValidationError::MissingShape {
            tensor: value.name.clone(),
        })
}

fn expect_dynamic(
    value: &ValueInfoProto,
    dims: &[tensor_shape_proto::Dimension],
    axis: usize,
    param: &'static str,
) -> Result<(), ValidationError> {
    let missing = || ValidationError::MissingDynamicAxis {
        tensor: value.name.clone(),
        axis,
        param,
    };
    match dims.get(axis).and_then(|d| d.value.as_ref()) {
        Some(tensor_shape_proto::dimension::Value::DimParam(p)) if p.as_str() == param => Ok(()),
        _ => Err(missing()),
    }
}

fn fixed_dim(dims: &[tensor_shape_proto::Dimension], axis: usize) -> Option<i64> {
    match dims.get(axis).and_then(|d| d.value.as_ref()) {
        Some(tensor_shape_proto::dimension::Value::DimValue(v)) => Some(*v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimatorConfig;
    use crate::graph::Estimator;

    fn valid_model() -> ModelProto {
        Estimator::with_seed(EstimatorConfig::default(), 3)
            .unwrap()
            .network()
            .to_model_proto(true, &[])
    }

    #[test]
    fn test_valid_model_passes() {
        check_model(&valid_model()).unwrap();
    }

    #[test]
    fn test_missing_opset_detected() {
        let mut model = valid_model();
        model.opset_import.clear();
        assert!(matches!(
            check_model(&model),
            Err(ValidationError::OpsetMismatch { found: None, .. })
        ));
    }

    #[test]
    fn test_wrong_opset_detected() {
        let mut model = valid_model();
        model.opset_import[0].version = 9;
        assert!(matches!(
            check_model(&model),
            Err(ValidationError::OpsetMismatch {
                found: Some(9),
                ..
            })
        ));
    }

    #[test]
    fn test_dangling_node_input_detected() {
        let mut model = valid_model();
        let graph = model.graph.as_mut().unwrap();
        graph.node[2].input[0] = "nonexistent".into();
        assert!(matches!(
            check_model(&model),
            Err(ValidationError::UnresolvedInput { .. })
        ));
    }

    #[test]
    fn test_renamed_input_detected() {
        let mut model = valid_model();
        let graph = model.graph.as_mut().unwrap();
        graph.input[0].name = "x".into();
        // Renaming also breaks the first node's reference.
        graph.node[0].input[0] = "x".into();
        assert!(matches!(
            check_model(&model),
            Err(ValidationError::BadInputName(_))
        ));
    }

    #[test]
    fn test_duplicate_output_name_detected() {
        let mut model = valid_model();
        let graph = model.graph.as_mut().unwrap();
        let stolen = graph.node[1].output[0].clone();
        graph.node[3].output[0] = stolen;
        assert!(matches!(
            check_model(&model),
            Err(ValidationError::DuplicateValue(_))
        ));
    }

    #[test]
    fn test_wrong_feature_width_detected() {
        let mut model = valid_model();
        let graph = model.graph.as_mut().unwrap();
        let dims = match graph.input[0]
            .r#type
            .as_mut()
            .and_then(|t| t.value.as_mut())
        {
            Some(type_proto::Value::TensorType(t)) => {
                &mut t.shape.as_mut().unwrap().dim
            }
            None => unreachable!(),
        };
        dims[2].value = Some(tensor_shape_proto::dimension::Value::DimValue(100));
        assert!(matches!(
            check_model(&model),
            Err(ValidationError::BadFeatureWidth {
                found: Some(100),
                ..
            })
        ));
    }

    #[test]
    fn test_static_time_axis_detected() {
        let mut model = valid_model();
        let graph = model.graph.as_mut().unwrap();
        let dims = match graph.input[0]
            .r#type
            .as_mut()
            .and_then(|t| t.value.as_mut())
        {
            Some(type_proto::Value::TensorType(t)) => {
                &mut t.shape.as_mut().unwrap().dim
            }
            None => unreachable!(),
        };
        dims[1].value = Some(tensor_shape_proto::dimension::Value::DimValue(256));
        assert!(matches!(
            check_model(&model),
            Err(ValidationError::MissingDynamicAxis { axis: 1, .. })
        ));
    }
}
