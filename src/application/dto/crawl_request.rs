// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_request::CrawlRequest;
use crate::utils::errors::CrawlError;
use serde::Deserialize;
use serde_json::Value;

pub const URL_REQUIRED: &str = "url is required and must be a string";
pub const CALLBACK_REQUIRED: &str = "callback_url is required when test is false";

/// 抓取请求 DTO
///
/// 字段保持为原始 JSON 值，以便对类型错误给出明确的校验信息
#[derive(Debug, Default, Deserialize)]
pub struct CrawlRequestDto {
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub callback_url: Option<Value>,
    #[serde(default)]
    pub test: Option<Value>,
}

impl CrawlRequestDto {
    /// 从任意 JSON 值构建；非对象视为空请求
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// 校验并转换为领域请求
    ///
    /// 校验失败时不会触及任何浏览器资源
    pub fn validate(self) -> Result<CrawlRequest, CrawlError> {
        let url = match self.url {
            Some(Value::String(url)) if !url.trim().is_empty() => url,
            _ => return Err(CrawlError::InvalidInput(URL_REQUIRED.to_string())),
        };

        let test = self.test.as_ref().is_some_and(is_truthy);

        let callback_url = match self.callback_url {
            Some(Value::String(callback)) if !callback.trim().is_empty() => Some(callback),
            _ if test => None,
            _ => return Err(CrawlError::InvalidInput(CALLBACK_REQUIRED.to_string())),
        };

        Ok(CrawlRequest {
            url,
            callback_url,
            test,
        })
    }
}

/// JSON 值的真值判断：`false`、`0`、空字符串与 `null` 为假
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
