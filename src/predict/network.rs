//! Multi-head risk network, inference only.
//!
//! Shared trunk of Linear → BatchNorm → ReLU blocks followed by four
//! independent single-unit heads, each squashed through a logistic
//! sigmoid. Weights are loaded from the training artifact; batch norm
//! runs in eval mode on the recorded running statistics, and dropout
//! exists only as artifact metadata. Inference is fully deterministic.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::PredictError;

/// BatchNorm epsilon used at training time.
const BN_EPS: f32 = 1e-5;

/// One trunk layer as serialized by the training job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrunkLayerSpec {
    /// Row-major [out][in] weight matrix.
    pub weight: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub bn_gamma: Vec<f32>,
    pub bn_beta: Vec<f32>,
    pub bn_mean: Vec<f32>,
    pub bn_var: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadSpec {
    pub weight: Vec<f32>,
    pub bias: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadsSpec {
    pub heart_disease: HeadSpec,
    pub diabetes: HeadSpec,
    pub cancer: HeadSpec,
    pub stroke: HeadSpec,
}

/// The serialized model state: weights plus architecture metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub version: String,
    pub input_size: usize,
    pub hidden_sizes: Vec<usize>,
    #[serde(default = "default_dropout")]
    pub dropout_rate: f32,
    pub trunk: Vec<TrunkLayerSpec>,
    pub heads: HeadsSpec,
}

fn default_dropout() -> f32 {
    0.3
}

struct TrunkLayer {
    weight: Array2<f32>,
    bias: Array1<f32>,
    bn_gamma: Array1<f32>,
    bn_beta: Array1<f32>,
    bn_mean: Array1<f32>,
    /// Precomputed `sqrt(var + eps)`.
    bn_std: Array1<f32>,
}

struct Head {
    weight: Array1<f32>,
    bias: f32,
}

/// Per-condition probabilities, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadOutputs {
    pub heart_disease: f32,
    pub diabetes: f32,
    pub cancer: f32,
    pub stroke: f32,
}

/// Compiled network ready for inference.
pub struct RiskNetwork {
    input_size: usize,
    trunk: Vec<TrunkLayer>,
    heart_disease: Head,
    diabetes: Head,
    cancer: Head,
    stroke: Head,
}

impl RiskNetwork {
    /// Compile a serialized spec, validating every declared shape.
    pub fn from_spec(spec: &NetworkSpec) -> Result<Self, PredictError> {
        if spec.trunk.len() != spec.hidden_sizes.len() {
            return Err(PredictError::ArtifactMismatch(format!(
                "{} trunk layers declared but {} hidden sizes",
                spec.trunk.len(),
                spec.hidden_sizes.len()
            )));
        }

        let mut trunk = Vec::with_capacity(spec.trunk.len());
        let mut in_width = spec.input_size;
        for (i, layer) in spec.trunk.iter().enumerate() {
            let out_width = spec.hidden_sizes[i];
            trunk.push(compile_trunk_layer(layer, i, in_width, out_width)?);
            in_width = out_width;
        }

        Ok(Self {
            input_size: spec.input_size,
            heart_disease: compile_head(&spec.heads.heart_disease, "heart_disease", in_width)?,
            diabetes: compile_head(&spec.heads.diabetes, "diabetes", in_width)?,
            cancer: compile_head(&spec.heads.cancer, "cancer", in_width)?,
            stroke: compile_head(&spec.heads.stroke, "stroke", in_width)?,
            trunk,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Forward pass. Deterministic: identical input yields identical
    /// output.
    pub fn infer(&self, features: &Array1<f32>) -> HeadOutputs {
        let mut x = features.clone();
        for layer in &self.trunk {
            let z = layer.weight.dot(&x) + &layer.bias;
            let z = (z - &layer.bn_mean) / &layer.bn_std * &layer.bn_gamma + &layer.bn_beta;
            x = z.mapv(|v| v.max(0.0));
        }

        HeadOutputs {
            heart_disease: head_output(&self.heart_disease, &x),
            diabetes: head_output(&self.diabetes, &x),
            cancer: head_output(&self.cancer, &x),
            stroke: head_output(&self.stroke, &x),
        }
    }
}

fn head_output(head: &Head, x: &Array1<f32>) -> f32 {
    sigmoid(head.weight.dot(x) + head.bias)
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

fn compile_trunk_layer(
    spec: &TrunkLayerSpec,
    index: usize,
    in_width: usize,
    out_width: usize,
) -> Result<TrunkLayer, PredictError> {
    if spec.weight.len() != out_width || spec.weight.iter().any(|row| row.len() != in_width) {
        return Err(PredictError::ArtifactMismatch(format!(
            "trunk layer {index} weight is not {out_width}x{in_width}"
        )));
    }
    for (name, values) in [
        ("bias", &spec.bias),
        ("bn_gamma", &spec.bn_gamma),
        ("bn_beta", &spec.bn_beta),
        ("bn_mean", &spec.bn_mean),
        ("bn_var", &spec.bn_var),
    ] {
        if values.len() != out_width {
            return Err(PredictError::ArtifactMismatch(format!(
                "trunk layer {index} {name} has {} components, expected {out_width}",
                values.len()
            )));
        }
    }

    let flat: Vec<f32> = spec.weight.iter().flatten().copied().collect();
    let weight = Array2::from_shape_vec((out_width, in_width), flat)
        .map_err(|e| PredictError::ArtifactMismatch(e.to_string()))?;

    Ok(TrunkLayer {
        weight,
        bias: Array1::from(spec.bias.clone()),
        bn_gamma: Array1::from(spec.bn_gamma.clone()),
        bn_beta: Array1::from(spec.bn_beta.clone()),
        bn_mean: Array1::from(spec.bn_mean.clone()),
        bn_std: Array1::from_iter(spec.bn_var.iter().map(|v| (v + BN_EPS).sqrt())),
    })
}

fn compile_head(spec: &HeadSpec, name: &str, in_width: usize) -> Result<Head, PredictError> {
    if spec.weight.len() != in_width {
        return Err(PredictError::ArtifactMismatch(format!(
            "{name} head has {} weights, expected {in_width}",
            spec.weight.len()
        )));
    }
    Ok(Head {
        weight: Array1::from(spec.weight.clone()),
        bias: spec.bias,
    })
}
