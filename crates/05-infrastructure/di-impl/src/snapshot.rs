//! 容器状态持久化
//!
//! 只保存类型映射与依赖图，实例绑定、代理标记与拦截器仅在进程内有效

use di_abstractions::DependencyGraph;
use infrastructure_common::{DependencyResult, TypeName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 容器状态快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    /// 类型映射
    pub type_mappings: BTreeMap<TypeName, TypeName>,
    /// 依赖图
    pub dependency_graph: DependencyGraph,
}

impl ContainerSnapshot {
    /// 编码为 JSON
    pub fn to_json(&self) -> DependencyResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从 JSON 解码
    pub fn from_json(json: &str) -> DependencyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
