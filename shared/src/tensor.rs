use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{len} values do not fit shape {dims:?}")]
pub struct ShapeMismatch {
    pub len: usize,
    pub dims: Vec<usize>,
}

/// Dense f32 buffer with its shape, the unit exchanged with the execution runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub(crate) data: Vec<f32>,
    pub(crate) dims: Vec<usize>,
}

/// Named tensors, used both for runtime feeds and for its outputs.
pub type TensorMap = HashMap<String, Tensor>;

impl Tensor {
    pub fn new(data: Vec<f32>, dims: Vec<usize>) -> Result<Self, ShapeMismatch> {
        let expected: usize = dims.iter().product();
        if expected != data.len() {
            return Err(ShapeMismatch {
                len: data.len(),
                dims,
            });
        }
        Ok(Self { data, dims })
    }

    /// A 1-D tensor, the shape the classifier uses for its logits.
    pub fn vector(data: Vec<f32>) -> Self {
        let dims = vec![data.len()];
        Self { data, dims }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_element_count() {
        assert!(Tensor::new(vec![0.0; 6], vec![1, 2, 3]).is_ok());

        let err = Tensor::new(vec![0.0; 5], vec![1, 2, 3]).unwrap_err();
        assert_eq!(err.len, 5);
        assert_eq!(err.to_string(), "5 values do not fit shape [1, 2, 3]");
    }

    #[test]
    fn vector_is_one_dimensional() {
        let t = Tensor::vector(vec![1.0, 2.0, 3.0]);
        assert_eq!(t.dims(), &[3]);
        assert_eq!(t.len(), 3);
    }
}
