//! CPU compute backend using Rayon for shared-memory parallelism.

use crate::backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};

/// CPU backend that parallelises work across threads via Rayon.
pub struct CpuBackend {
    num_threads: usize,
}

impl CpuBackend {
    /// Create a new CPU backend using all available threads.
    pub fn new() -> Self {
        Self {
            num_threads: rayon::current_num_threads(),
        }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: format!("CPU ({} threads)", self.num_threads),
            backend_type: BackendType::Cpu,
            compute_units: Some(self.num_threads),
        }
    }

    fn parallel_collect(
        &self,
        n_items: usize,
        chunk: usize,
        task: &(dyn Fn(usize) -> Vec<(f64, f64)> + Send + Sync),
    ) -> Result<Vec<(f64, f64)>, ComputeError> {
        use rayon::prelude::*;

        if chunk == 0 {
            return Err(ComputeError::DeviceError("Chunk size must be non-zero".into()));
        }

        let n_chunks = n_items.div_ceil(chunk);

        // Each chunk owns its partial list; ordered concatenation at the end
        // reproduces sequential output order without a shared accumulator.
        let partials: Vec<Vec<(f64, f64)>> = (0..n_chunks)
            .into_par_iter()
            .map(|c| {
                let start = c * chunk;
                let end = (start + chunk).min(n_items);
                let mut out = Vec::new();
                for idx in start..end {
                    out.extend(task(idx));
                }
                out
            })
            .collect();

        Ok(partials.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_preserves_index_order() {
        let backend = CpuBackend::new();
        let result = backend
            .parallel_collect(1000, 7, &|i| vec![(i as f64, 2.0 * i as f64)])
            .unwrap();

        assert_eq!(result.len(), 1000);
        for (i, &(a, b)) in result.iter().enumerate() {
            assert_eq!(a, i as f64);
            assert_eq!(b, 2.0 * i as f64);
        }
    }

    #[test]
    fn test_collect_with_uneven_final_chunk() {
        let backend = CpuBackend::new();
        let result = backend
            .parallel_collect(10, 4, &|i| vec![(i as f64, 0.0)])
            .unwrap();
        assert_eq!(result.len(), 10);
        assert_eq!(result[9].0, 9.0);
    }

    #[test]
    fn test_tasks_may_emit_zero_or_many_pairs() {
        let backend = CpuBackend::new();
        // Even indices emit two pairs, odd none.
        let result = backend
            .parallel_collect(6, 2, &|i| {
                if i % 2 == 0 {
                    vec![(i as f64, 1.0), (i as f64, 2.0)]
                } else {
                    Vec::new()
                }
            })
            .unwrap();
        assert_eq!(
            result,
            vec![(0.0, 1.0), (0.0, 2.0), (2.0, 1.0), (2.0, 2.0), (4.0, 1.0), (4.0, 2.0)]
        );
    }

    #[test]
    fn test_zero_chunk_is_rejected() {
        let backend = CpuBackend::new();
        assert!(backend.parallel_collect(10, 0, &|_| Vec::new()).is_err());
    }

    #[test]
    fn test_device_info_reports_cpu() {
        let backend = CpuBackend::new();
        let info = backend.device_info();
        assert_eq!(info.backend_type, BackendType::Cpu);
        assert!(info.compute_units.unwrap_or(0) >= 1);
    }
}
