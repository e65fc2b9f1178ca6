// src/job/parallelism.rs

//! Resource shape of a job: how many nodes and processors it asks for.

use crate::errors::{BatchsubError, Result};
use crate::types::ParallelismMode;

/// One parallelism mode together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parallelism {
    /// One processor on one node.
    Serial,
    /// Shared-memory job: one node, `processors` cores.
    OpenMp { processors: u32 },
    /// Distributed job: `nodes` nodes with one process each.
    Mpi { nodes: u32 },
    /// `nodes` nodes with `processors_per_node` cores each.
    Hybrid { nodes: u32, processors_per_node: u32 },
}

impl Parallelism {
    /// Build a mode from its name and a parameter list, checking arity.
    ///
    /// Every parameter must be at least 1.
    pub fn from_mode(mode: ParallelismMode, params: &[u32]) -> Result<Self> {
        if params.len() != mode.arity() {
            return Err(BatchsubError::InvalidParallelism(format!(
                "{mode} expects {} parameter(s), got {}",
                mode.arity(),
                params.len()
            )));
        }

        if params.iter().any(|&p| p == 0) {
            return Err(BatchsubError::InvalidParallelism(format!(
                "{mode} parameters must be at least 1, got {params:?}"
            )));
        }

        Ok(match mode {
            ParallelismMode::Serial => Parallelism::Serial,
            ParallelismMode::OpenMp => Parallelism::OpenMp {
                processors: params[0],
            },
            ParallelismMode::Mpi => Parallelism::Mpi { nodes: params[0] },
            ParallelismMode::Hybrid => Parallelism::Hybrid {
                nodes: params[0],
                processors_per_node: params[1],
            },
        })
    }

    /// Re-check a value built directly from its fields.
    pub fn validated(self) -> Result<Self> {
        Self::from_mode(self.mode(), &self.params())
    }

    /// Parameters in the order [`Parallelism::from_mode`] takes them.
    pub fn params(&self) -> Vec<u32> {
        match *self {
            Parallelism::Serial => Vec::new(),
            Parallelism::OpenMp { processors } => vec![processors],
            Parallelism::Mpi { nodes } => vec![nodes],
            Parallelism::Hybrid {
                nodes,
                processors_per_node,
            } => vec![nodes, processors_per_node],
        }
    }

    pub fn mode(&self) -> ParallelismMode {
        match self {
            Parallelism::Serial => ParallelismMode::Serial,
            Parallelism::OpenMp { .. } => ParallelismMode::OpenMp,
            Parallelism::Mpi { .. } => ParallelismMode::Mpi,
            Parallelism::Hybrid { .. } => ParallelismMode::Hybrid,
        }
    }

    /// Factor turning per-process wall time into aggregate cpu time.
    pub fn cpu_time_multiplier(&self) -> u64 {
        match *self {
            Parallelism::Serial => 1,
            Parallelism::OpenMp { processors } => u64::from(processors),
            Parallelism::Mpi { nodes } => u64::from(nodes),
            Parallelism::Hybrid {
                nodes,
                processors_per_node,
            } => u64::from(nodes) * u64::from(processors_per_node),
        }
    }
}
