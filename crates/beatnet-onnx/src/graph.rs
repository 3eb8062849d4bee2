//! The BDA network and its lowering to an ONNX graph.
//!
//! The network is two stacked LSTM layers over the feature sequence followed
//! by an affine projection to the three classes. The ONNX graph is built
//! time-major internally (ONNX LSTM convention) and transposed back so the
//! exported interface stays `(batch, time, features)` in and
//! `(batch, classes, time)` out.

use crate::config::EstimatorConfig;
use crate::error::Result;
use crate::pb::{
    attribute_type, data_type, tensor_shape_proto, type_proto, AttributeProto, GraphProto,
    ModelProto, NodeProto, OperatorSetIdProto, StringStringEntryProto, TensorProto,
    TensorShapeProto, TypeProto, ValueInfoProto,
};
use crate::{FEATURE_WIDTH, HIDDEN_SIZE, INPUT_NAME, NUM_CLASSES, OPSET_VERSION, OUTPUT_NAME};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// ONNX IR version written alongside [`OPSET_VERSION`].
const IR_VERSION: i64 = 8;

/// Dynamic-axis names declared on the exported tensors.
pub const BATCH_AXIS: &str = "batch";
pub const TIME_AXIS: &str = "time";

struct LstmLayer {
    input_size: usize,
    hidden_size: usize,
    /// `[1, 4*hidden, input]`
    weight: Vec<f32>,
    /// `[1, 4*hidden, hidden]`
    recurrence: Vec<f32>,
    /// `[1, 8*hidden]`
    bias: Vec<f32>,
}

impl LstmLayer {
    fn init(rng: &mut StdRng, input_size: usize, hidden_size: usize) -> Self {
        let bound = 1.0 / (hidden_size as f32).sqrt();
        Self {
            input_size,
            hidden_size,
            weight: uniform(rng, 4 * hidden_size * input_size, bound),
            recurrence: uniform(rng, 4 * hidden_size * hidden_size, bound),
            bias: uniform(rng, 8 * hidden_size, bound),
        }
    }
}

fn uniform(rng: &mut StdRng, len: usize, bound: f32) -> Vec<f32> {
    (0..len).map(|_| rng.gen_range(-bound..bound)).collect()
}

/// The beat / downbeat / no-beat activation network.
pub struct BdaNetwork {
    dim_in: usize,
    num_classes: usize,
    lstm1: LstmLayer,
    lstm2: LstmLayer,
    /// `[hidden, classes]`
    classifier_weight: Vec<f32>,
    /// `[classes]`
    classifier_bias: Vec<f32>,
}

impl BdaNetwork {
    fn init(rng: &mut StdRng) -> Self {
        let bound = 1.0 / (HIDDEN_SIZE as f32).sqrt();
        Self {
            dim_in: FEATURE_WIDTH,
            num_classes: NUM_CLASSES,
            lstm1: LstmLayer::init(rng, FEATURE_WIDTH, HIDDEN_SIZE),
            lstm2: LstmLayer::init(rng, HIDDEN_SIZE, HIDDEN_SIZE),
            classifier_weight: uniform(rng, HIDDEN_SIZE * NUM_CLASSES, bound),
            classifier_bias: uniform(rng, NUM_CLASSES, bound),
        }
    }

    /// Expected feature width of the input.
    pub fn dim_in(&self) -> usize {
        self.dim_in
    }

    /// Number of output classes.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Lower the network to an ONNX model.
    ///
    /// With `append_softmax` the class scores pass through a softmax over
    /// axis 1, so each time step carries a probability distribution.
    pub fn to_model_proto(
        &self,
        append_softmax: bool,
        metadata: &[(&str, String)],
    ) -> ModelProto {
        let mut nodes = Vec::new();
        let initializers = vec![
            float_tensor("lstm1.weight", &[1, 4 * HIDDEN_SIZE as i64, self.dim_in as i64], &self.lstm1.weight),
            float_tensor("lstm1.recurrence", &[1, 4 * HIDDEN_SIZE as i64, HIDDEN_SIZE as i64], &self.lstm1.recurrence),
            float_tensor("lstm1.bias", &[1, 8 * HIDDEN_SIZE as i64], &self.lstm1.bias),
            float_tensor("lstm2.weight", &[1, 4 * HIDDEN_SIZE as i64, HIDDEN_SIZE as i64], &self.lstm2.weight),
            float_tensor("lstm2.recurrence", &[1, 4 * HIDDEN_SIZE as i64, HIDDEN_SIZE as i64], &self.lstm2.recurrence),
            float_tensor("lstm2.bias", &[1, 8 * HIDDEN_SIZE as i64], &self.lstm2.bias),
            float_tensor("classifier.weight", &[HIDDEN_SIZE as i64, self.num_classes as i64], &self.classifier_weight),
            float_tensor("classifier.bias", &[self.num_classes as i64], &self.classifier_bias),
            int64_tensor("squeeze_axes", &[1], &[1]),
        ];

        // (batch, time, feat) -> (time, batch, feat) for the ONNX LSTM.
        nodes.push(node_with_attrs(
            "Transpose",
            "transpose_input",
            &[INPUT_NAME],
            &["input_tm"],
            vec![attr_ints("perm", &[1, 0, 2])],
        ));

        nodes.push(node_with_attrs(
            "LSTM",
            "lstm1",
            &["input_tm", "lstm1.weight", "lstm1.recurrence", "lstm1.bias"],
            &["lstm1_y"],
            vec![attr_int("hidden_size", HIDDEN_SIZE as i64)],
        ));
        nodes.push(node(
            "Squeeze",
            "squeeze1",
            &["lstm1_y", "squeeze_axes"],
            &["hidden1"],
        ));

        nodes.push(node_with_attrs(
            "LSTM",
            "lstm2",
            &["hidden1", "lstm2.weight", "lstm2.recurrence", "lstm2.bias"],
            &["lstm2_y"],
            vec![attr_int("hidden_size", HIDDEN_SIZE as i64)],
        ));
        nodes.push(node(
            "Squeeze",
            "squeeze2",
            &["lstm2_y", "squeeze_axes"],
            &["hidden2"],
        ));

        nodes.push(node(
            "MatMul",
            "classifier_matmul",
            &["hidden2", "classifier.weight"],
            &["logits_tm"],
        ));
        nodes.push(node(
            "Add",
            "classifier_bias_add",
            &["logits_tm", "classifier.bias"],
            &["scores_tm"],
        ));

        // (time, batch, classes) -> (batch, classes, time).
        let transpose_target = if append_softmax { "scores" } else { OUTPUT_NAME };
        nodes.push(node_with_attrs(
            "Transpose",
            "transpose_output",
            &["scores_tm"],
            &[transpose_target],
            vec![attr_ints("perm", &[1, 2, 0])],
        ));

        if append_softmax {
            nodes.push(node_with_attrs(
                "Softmax",
                "softmax",
                &["scores"],
                &[OUTPUT_NAME],
                vec![attr_int("axis", 1)],
            ));
        }

        let graph = GraphProto {
            node: nodes,
            name: "beatnet_bda".into(),
            initializer: initializers,
            input: vec![value_info(
                INPUT_NAME,
                &[
                    Dim::Named(BATCH_AXIS),
                    Dim::Named(TIME_AXIS),
                    Dim::Fixed(self.dim_in as i64),
                ],
            )],
            output: vec![value_info(
                OUTPUT_NAME,
                &[
                    Dim::Named(BATCH_AXIS),
                    Dim::Fixed(self.num_classes as i64),
                    Dim::Named(TIME_AXIS),
                ],
            )],
            ..Default::default()
        };

        ModelProto {
            ir_version: IR_VERSION,
            producer_name: "beatnet".into(),
            producer_version: env!("CARGO_PKG_VERSION").into(),
            graph: Some(graph),
            opset_import: vec![OperatorSetIdProto {
                domain: String::new(),
                version: OPSET_VERSION,
            }],
            metadata_props: metadata
                .iter()
                .map(|(key, value)| StringStringEntryProto {
                    key: (*key).into(),
                    value: value.clone(),
                })
                .collect(),
            ..Default::default()
        }
    }
}

/// Owns the configuration and the network, mirroring how the upstream
/// estimator hands out its internal model.
pub struct Estimator {
    config: EstimatorConfig,
    network: BdaNetwork,
}

impl Estimator {
    /// Construct with entropy-seeded weights.
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::from_entropy();
        Ok(Self {
            config,
            network: BdaNetwork::init(&mut rng),
        })
    }

    /// Construct with a fixed weight seed, for reproducible exports.
    pub fn with_seed(config: EstimatorConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(Self {
            config,
            network: BdaNetwork::init(&mut rng),
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn network(&self) -> &BdaNetwork {
        &self.network
    }
}

enum Dim {
    Fixed(i64),
    Named(&'static str),
}

fn value_info(name: &str, dims: &[Dim]) -> ValueInfoProto {
    ValueInfoProto {
        name: name.into(),
        r#type: Some(TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: data_type::FLOAT,
                shape: Some(TensorShapeProto {
                    dim: dims
                        .iter()
                        .map(|d| tensor_shape_proto::Dimension {
                            denotation: String::new(),
                            value: Some(match d {
                                Dim::Fixed(v) => {
                                    tensor_shape_proto::dimension::Value::DimValue(*v)
                                }
                                Dim::Named(p) => tensor_shape_proto::dimension::Value::DimParam(
                                    (*p).into(),
                                ),
                            }),
                        })
                        .collect(),
                }),
            })),
        }),
        ..Default::default()
    }
}

fn node(op_type: &str, name: &str, inputs: &[&str], outputs: &[&str]) -> NodeProto {
    node_with_attrs(op_type, name, inputs, outputs, Vec::new())
}

fn node_with_attrs(
    op_type: &str,
    name: &str,
    inputs: &[&str],
    outputs: &[&str],
    attribute: Vec<AttributeProto>,
) -> NodeProto {
    NodeProto {
        input: inputs.iter().map(|s| (*s).into()).collect(),
        output: outputs.iter().map(|s| (*s).into()).collect(),
        name: name.into(),
        op_type: op_type.into(),
        attribute,
        ..Default::default()
    }
}

fn attr_int(name: &str, value: i64) -> AttributeProto {
    AttributeProto {
        name: name.into(),
        i: value,
        r#type: attribute_type::INT,
        ..Default::default()
    }
}

fn attr_ints(name: &str, values: &[i64]) -> AttributeProto {
    AttributeProto {
        name: name.into(),
        ints: values.to_vec(),
        r#type: attribute_type::INTS,
        ..Default::default()
    }
}

fn float_tensor(name: &str, dims: &[i64], data: &[f32]) -> TensorProto {
    debug_assert_eq!(dims.iter().product::<i64>(), data.len() as i64);
    TensorProto {
        dims: dims.to_vec(),
        data_type: data_type::FLOAT,
        float_data: data.to_vec(),
        name: name.into(),
        ..Default::default()
    }
}

fn int64_tensor(name: &str, dims: &[i64], data: &[i64]) -> TensorProto {
    TensorProto {
        dims: dims.to_vec(),
        data_type: data_type::INT64,
        int64_data: data.to_vec(),
        name: name.into(),
        ..Default::default()
    }
}
