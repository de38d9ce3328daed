//! Browser binding.

use wasm_bindgen::prelude::*;

use crate::engine::{AllocationOptimizer, OptimizationRequest, OptimizerConfig};

/// Runs one optimization request with the default configuration.
///
/// `request` is an `OptimizationRequest` object; the result is an
/// `OptimizationResponse` object. Structural input errors come back as an
/// aborted response, so only (de)serialization failures reject.
#[wasm_bindgen(js_name = optimizeAllocation)]
pub fn optimize_allocation(request: JsValue) -> Result<JsValue, JsValue> {
    let request: OptimizationRequest = serde_wasm_bindgen::from_value(request)?;
    let optimizer = AllocationOptimizer::new(OptimizerConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let response = optimizer.optimize(&request);
    Ok(serde_wasm_bindgen::to_value(&response)?)
}
