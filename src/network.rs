//! The decision network: a small feed-forward policy each agent owns
//! exclusively.
//!
//! Structurally a single-hidden-layer MLP with logistic activations,
//! generalizing the reference design's fixed 2-4-4 perceptron
//! (`examples/original_source/evosim-simple/src/neural_network.py`) to the
//! configured sensory input length and hidden width. Gaussian mutation
//! noise is sampled with `rand_distr::StandardNormal`, the idiomatic
//! `rand`-ecosystem companion crate for distributions beyond what `rand`
//! itself ships (pulled in because `examples/other_examples/rgilks-battleo`
//! shows the same crate used for this purpose).

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::constants::ACTION_COUNT;

/// Default weight initialization range, matching the reference design's
/// `weight_range = (-1.0, 1.0)`.
pub const DEFAULT_WEIGHT_RANGE: (f32, f32) = (-1.0, 1.0);

/// A single-hidden-layer feed-forward policy.
///
/// Shape is fixed at construction time; `mutate` and `crossover` never
/// change `input_size`/`hidden_size`/`output_size`, so offspring always
/// inherit their parents' shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    weights_input_hidden: Vec<f32>,
    weights_hidden_output: Vec<f32>,
    bias_hidden: Vec<f32>,
    bias_output: Vec<f32>,
}

impl DecisionNetwork {
    pub fn new_random(input_size: usize, hidden_size: usize, rng: &mut impl Rng) -> Self {
        let (lo, hi) = DEFAULT_WEIGHT_RANGE;
        let output_size = ACTION_COUNT;
        Self {
            input_size,
            hidden_size,
            output_size,
            weights_input_hidden: (0..input_size * hidden_size)
                .map(|_| rng.gen_range(lo..=hi))
                .collect(),
            weights_hidden_output: (0..hidden_size * output_size)
                .map(|_| rng.gen_range(lo..=hi))
                .collect(),
            bias_hidden: vec![0.0; hidden_size],
            bias_output: vec![0.0; output_size],
        }
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Forward pass. `input` is zero-padded or truncated to `input_size`
    /// before multiplication, matching the sensory encoder's own
    /// pad/truncate contract.
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut padded = vec![0.0f32; self.input_size];
        for (dst, src) in padded.iter_mut().zip(input.iter()) {
            *dst = src.clamp(0.0, 1.0);
        }

        let mut hidden = vec![0.0f32; self.hidden_size];
        for h in 0..self.hidden_size {
            let mut sum = self.bias_hidden[h];
            for i in 0..self.input_size {
                sum += padded[i] * self.weights_input_hidden[i * self.hidden_size + h];
            }
            hidden[h] = sigmoid(sum);
        }

        let mut output = vec![0.0f32; self.output_size];
        for o in 0..self.output_size {
            let mut sum = self.bias_output[o];
            for h in 0..self.hidden_size {
                sum += hidden[h] * self.weights_hidden_output[h * self.output_size + o];
            }
            output[o] = sigmoid(sum);
        }
        output
    }

    /// Index of the largest output, the action the policy decodes to.
    pub fn decide(&self, input: &[f32]) -> usize {
        let output = self.forward(input);
        argmax(&output)
    }

    /// With independent probability `rate` per parameter, add Gaussian
    /// noise with standard deviation `strength`.
    pub fn mutate(&mut self, rate: f32, strength: f32, rng: &mut impl Rng) {
        for w in self.weights_input_hidden.iter_mut() {
            if rng.gen::<f32>() < rate {
                *w += gaussian(rng) * strength;
            }
        }
        for w in self.weights_hidden_output.iter_mut() {
            if rng.gen::<f32>() < rate {
                *w += gaussian(rng) * strength;
            }
        }
        for b in self.bias_hidden.iter_mut() {
            if rng.gen::<f32>() < rate {
                *b += gaussian(rng) * strength;
            }
        }
        for b in self.bias_output.iter_mut() {
            if rng.gen::<f32>() < rate {
                *b += gaussian(rng) * strength;
            }
        }
    }

    /// Produce an offspring of identical shape; for each parameter
    /// independently, take the value from `other` with probability `p`,
    /// else from `self`.
    pub fn crossover(&self, other: &DecisionNetwork, p: f32, rng: &mut impl Rng) -> DecisionNetwork {
        assert_eq!(self.input_size, other.input_size, "shape mismatch in crossover");
        assert_eq!(self.hidden_size, other.hidden_size, "shape mismatch in crossover");
        assert_eq!(self.output_size, other.output_size, "shape mismatch in crossover");

        DecisionNetwork {
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            output_size: self.output_size,
            weights_input_hidden: mix_vec(&self.weights_input_hidden, &other.weights_input_hidden, p, rng),
            weights_hidden_output: mix_vec(&self.weights_hidden_output, &other.weights_hidden_output, p, rng),
            bias_hidden: mix_vec(&self.bias_hidden, &other.bias_hidden, p, rng),
            bias_output: mix_vec(&self.bias_output, &other.bias_output, p, rng),
        }
    }

    pub fn serialize(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn deserialize(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}

fn mix_vec(a: &[f32], b: &[f32], p: f32, rng: &mut impl Rng) -> Vec<f32> {
    a.iter()
        .zip(b.iter())
        .map(|(&sa, &sb)| if rng.gen::<f32>() < p { sb } else { sa })
        .collect()
}

fn gaussian(rng: &mut impl Rng) -> f32 {
    let sample: f64 = StandardNormal.sample(rng);
    sample as f32
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for i in 1..values.len() {
        if values[i] > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn forward_output_matches_action_count() {
        let mut rng = Pcg64::seed_from_u64(1);
        let net = DecisionNetwork::new_random(10, 6, &mut rng);
        let out = net.forward(&vec![0.5; 10]);
        assert_eq!(out.len(), ACTION_COUNT);
    }

    #[test]
    fn forward_pads_short_input() {
        let mut rng = Pcg64::seed_from_u64(1);
        let net = DecisionNetwork::new_random(10, 6, &mut rng);
        let short = net.forward(&[0.1, 0.2]);
        let padded = net.forward(&[0.1, 0.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(short, padded);
    }

    #[test]
    fn crossover_preserves_shape() {
        let mut rng = Pcg64::seed_from_u64(1);
        let a = DecisionNetwork::new_random(10, 6, &mut rng);
        let b = DecisionNetwork::new_random(10, 6, &mut rng);
        let child = a.crossover(&b, 0.5, &mut rng);
        assert_eq!(child.input_size, a.input_size);
        assert_eq!(child.hidden_size, a.hidden_size);
        assert_eq!(child.output_size, a.output_size);
    }

    #[test]
    fn serialize_roundtrip_preserves_forward_output() {
        let mut rng = Pcg64::seed_from_u64(1);
        let net = DecisionNetwork::new_random(10, 6, &mut rng);
        let json = net.serialize().unwrap();
        let restored = DecisionNetwork::deserialize(&json).unwrap();
        assert_eq!(net.forward(&vec![0.3; 10]), restored.forward(&vec![0.3; 10]));
    }

    #[test]
    fn clone_is_structurally_identical() {
        let mut rng = Pcg64::seed_from_u64(1);
        let net = DecisionNetwork::new_random(10, 6, &mut rng);
        let cloned = net.clone();
        assert_eq!(net.forward(&vec![0.4; 10]), cloned.forward(&vec![0.4; 10]));
    }
}
