// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod density_engine;
pub mod readability_engine;
pub mod traits;

use crate::engines::density_engine::DensityEngine;
use crate::engines::readability_engine::ReadabilityEngine;
use crate::engines::traits::{EngineError, ExtractionEngine};
use std::sync::Arc;

/// 可用引擎名称
pub const AVAILABLE_ENGINES: &[&str] = &["readability", "density"];

/// 按配置顺序构建提取引擎列表
///
/// 名称不区分大小写；未知名称在启动时即报错
pub fn build_engines(names: &[String]) -> Result<Vec<Arc<dyn ExtractionEngine>>, EngineError> {
    if names.is_empty() {
        return Err(EngineError::NoEngines);
    }

    names
        .iter()
        .map(|name| -> Result<Arc<dyn ExtractionEngine>, EngineError> {
            match name.trim().to_ascii_lowercase().as_str() {
                "readability" => Ok(Arc::new(ReadabilityEngine::new())),
                "density" => Ok(Arc::new(DensityEngine::new())),
                _ => Err(EngineError::UnknownEngine(name.clone())),
            }
        })
        .collect()
}
