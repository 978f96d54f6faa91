// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for SNP association dataset formats
// Author: Matt Barham
// Created: 2025-11-03
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

pub mod dataset;

pub use dataset::{ColumnMap, Dataset, DatasetError, DatasetLoader, SelectionError};
