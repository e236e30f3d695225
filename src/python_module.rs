//! Python bindings for byte-bloom using PyO3

use crate::{BloomError, BloomFilter};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

fn to_py_err(e: BloomError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

/// Python wrapper for BloomFilter
#[pyclass(name = "BloomFilter")]
struct PyBloomFilter {
    inner: BloomFilter,
}

#[pymethods]
impl PyBloomFilter {
    #[new]
    fn new(false_positive_rate: f64, expected_elements: usize) -> PyResult<Self> {
        let filter = BloomFilter::new(false_positive_rate, expected_elements).map_err(to_py_err)?;
        Ok(PyBloomFilter { inner: filter })
    }

    /// Build a filter with an explicit bit count and hash count
    #[staticmethod]
    fn with_size(num_bits: u64, num_hashes: u32) -> PyResult<Self> {
        let filter = BloomFilter::with_size(num_bits, num_hashes).map_err(to_py_err)?;
        Ok(PyBloomFilter { inner: filter })
    }

    fn add(&mut self, element: &[u8]) -> PyResult<()> {
        self.inner.add(element).map_err(to_py_err)
    }

    fn test(&self, element: &[u8]) -> PyResult<bool> {
        self.inner.test(element).map_err(to_py_err)
    }

    fn __contains__(&self, element: &[u8]) -> PyResult<bool> {
        self.test(element)
    }

    fn fill_ratio(&self) -> f64 {
        self.inner.fill_ratio()
    }

    fn estimated_false_positive_rate(&self) -> f64 {
        self.inner.estimated_false_positive_rate()
    }

    fn load_factor(&self) -> f64 {
        self.inner.load_factor()
    }

    fn num_bits(&self) -> u64 {
        self.inner.num_bits()
    }

    fn num_hashes(&self) -> u32 {
        self.inner.num_hashes()
    }

    fn serialize<'py>(&self, py: Python<'py>) -> &'py PyBytes {
        PyBytes::new(py, &self.inner.serialize())
    }

    #[staticmethod]
    fn deserialize(data: &[u8]) -> PyResult<Self> {
        let filter = BloomFilter::deserialize(data).map_err(to_py_err)?;
        Ok(PyBloomFilter { inner: filter })
    }

    fn stats(&self) -> String {
        self.inner.stats().to_string()
    }

    fn __len__(&self) -> PyResult<usize> {
        usize::try_from(self.inner.len()).map_err(|_| {
            PyErr::new::<pyo3::exceptions::PyOverflowError, _>(format!(
                "insertion count {} does not fit in usize",
                self.inner.len()
            ))
        })
    }

    fn __repr__(&self) -> String {
        format!(
            "BloomFilter(bits={}, hashes={}, inserted={}, fpr={:.6})",
            self.inner.num_bits(),
            self.inner.num_hashes(),
            self.inner.len(),
            self.inner.estimated_false_positive_rate()
        )
    }
}

/// Python module definition
#[pymodule]
fn byte_bloom(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyBloomFilter>()?;

    m.add("MAX_NUM_BITS", crate::utils::MAX_NUM_BITS)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
