use std::fmt;
use std::hash::{Hash, Hasher};

use nalgebra::DMatrix;

/// Payload carried by every tree node: parse labels plus the numeric state
/// assigned by the training pipeline.
///
/// Equality and hashing are local to the node. `head_word` and `tags` are
/// treated as annotations and do not take part in either; floating point
/// state is compared bitwise so that `Eq` and `Hash` agree.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// Word embedding / hidden activation for this node
    pub vector: Option<DMatrix<f64>>,
    /// Class distribution predicted for this node
    pub prediction: Option<DMatrix<f64>>,
    /// Prediction error for this node
    pub error: f64,
    pub head_word: Option<String>,
    pub value: Option<String>,
    pub label: Option<String>,
    /// Free-form node kind, extra metadata only
    pub node_type: Option<String>,
    /// Ground-truth class used for supervised training
    pub gold_label: i32,
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
}

impl NodeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_error(mut self, error: f64) -> Self {
        self.error = error;
        self
    }

    pub fn with_gold_label(mut self, gold_label: i32) -> Self {
        self.gold_label = gold_label;
        self
    }

    pub fn with_vector(mut self, vector: DMatrix<f64>) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Fields kept by a node copy: everything except error, head word,
    /// tags and structure.
    pub(crate) fn copied(&self) -> Self {
        Self {
            vector: self.vector.clone(),
            prediction: self.prediction.clone(),
            value: self.value.clone(),
            label: self.label.clone(),
            node_type: self.node_type.clone(),
            gold_label: self.gold_label,
            tokens: self.tokens.clone(),
            ..Self::default()
        }
    }
}

fn matrix_bits_eq(a: &Option<DMatrix<f64>>, b: &Option<DMatrix<f64>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.shape() == b.shape()
                && a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
        }
        _ => false,
    }
}

fn hash_matrix<H: Hasher>(m: &Option<DMatrix<f64>>, state: &mut H) {
    match m {
        None => 0u8.hash(state),
        Some(m) => {
            1u8.hash(state);
            m.shape().hash(state);
            for x in m.iter() {
                x.to_bits().hash(state);
            }
        }
    }
}

impl PartialEq for NodeData {
    fn eq(&self, other: &Self) -> bool {
        self.error.to_bits() == other.error.to_bits()
            && self.gold_label == other.gold_label
            && self.label == other.label
            && matrix_bits_eq(&self.prediction, &other.prediction)
            && self.tokens == other.tokens
            && self.node_type == other.node_type
            && self.value == other.value
            && matrix_bits_eq(&self.vector, &other.vector)
    }
}

impl Eq for NodeData {}

impl Hash for NodeData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_matrix(&self.vector, state);
        hash_matrix(&self.prediction, state);
        self.error.to_bits().hash(state);
        self.value.hash(state);
        self.label.hash(state);
        self.node_type.hash(state);
        self.gold_label.hash(state);
        self.tokens.hash(state);
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, &self.value) {
            (Some(label), Some(value)) => write!(f, "{} {}", label, value),
            (Some(label), None) => write!(f, "{}", label),
            (None, Some(value)) => write!(f, "{}", value),
            (None, None) => write!(f, "<none>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(data: &NodeData) -> u64 {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn given_same_fields_when_comparing_then_equal_and_same_hash() {
        let a = NodeData::with_tokens(vec!["dog".into()])
            .with_label("NN")
            .with_error(0.5)
            .with_vector(DMatrix::from_element(3, 1, 0.25));
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn given_different_head_word_and_tags_when_comparing_then_still_equal() {
        let a = NodeData::new().with_label("NP");
        let mut b = a.clone();
        b.head_word = Some("dog".into());
        b.tags = vec!["DT".into(), "NN".into()];
        assert_eq!(a, b);
    }

    #[test]
    fn given_nan_error_when_comparing_then_equal_to_itself() {
        let a = NodeData::new().with_error(f64::NAN);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn given_vectors_of_different_shape_when_comparing_then_not_equal() {
        let a = NodeData::new().with_vector(DMatrix::zeros(2, 1));
        let b = NodeData::new().with_vector(DMatrix::zeros(1, 2));
        assert_ne!(a, b);
    }

    #[test]
    fn given_node_when_copied_then_drops_error_and_annotations() {
        let mut a = NodeData::with_tokens(vec!["x".into()])
            .with_label("S")
            .with_value("v")
            .with_gold_label(3)
            .with_error(1.5);
        a.head_word = Some("x".into());
        a.tags = vec!["T".into()];

        let copy = a.copied();
        assert_eq!(copy.label.as_deref(), Some("S"));
        assert_eq!(copy.value.as_deref(), Some("v"));
        assert_eq!(copy.gold_label, 3);
        assert_eq!(copy.tokens, vec!["x".to_string()]);
        assert_eq!(copy.error, 0.0);
        assert!(copy.head_word.is_none());
        assert!(copy.tags.is_empty());
    }

    #[test]
    fn given_label_and_value_when_displayed_then_joins_both() {
        assert_eq!(NodeData::new().with_label("NN").with_value("dog").to_string(), "NN dog");
        assert_eq!(NodeData::new().to_string(), "<none>");
    }
}
