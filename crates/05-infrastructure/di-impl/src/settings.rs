//! 容器配置

use crate::interception::DEFAULT_PROXY_PREFIX;
use infrastructure_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ADSP";

/// 配置节名称
pub const SETTINGS_SECTION: &str = "container";

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 依赖图构建与解析的最大递归深度
    pub max_resolution_depth: usize,
    /// 是否使用进程级共享的拦截器注册表
    pub share_global_interceptors: bool,
    /// 代理类型名称前缀
    pub proxy_name_prefix: String,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            max_resolution_depth: 256,
            share_global_interceptors: false,
            proxy_name_prefix: DEFAULT_PROXY_PREFIX.to_string(),
        }
    }
}

impl ContainerSettings {
    /// 从配置文件与 `ADSP_` 前缀的环境变量加载 `container` 配置节
    ///
    /// 文件不存在时只使用环境变量，配置节缺失时使用默认值
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("加载容器配置: {}", path.display());

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;

        let loaded = match settings.get::<ContainerSettings>(SETTINGS_SECTION) {
            Ok(loaded) => loaded,
            Err(config::ConfigError::NotFound(_)) => Self::default(),
            Err(e) => {
                return Err(ConfigError::ParseError {
                    source: Box::new(e),
                })
            }
        };

        loaded.validate()?;
        Ok(loaded)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        if self.proxy_name_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "proxy_name_prefix 不能为空".to_string(),
            });
        }
        Ok(())
    }
}
