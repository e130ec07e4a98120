//! 依赖图数据结构

use infrastructure_common::TypeName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 依赖图
///
/// 类型名称到其构造依赖（按构造参数顺序）的映射。
/// 未声明构造函数或无法识别的类型对应空列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph(BTreeMap<TypeName, Vec<TypeName>>);

impl DependencyGraph {
    /// 创建空依赖图
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取类型的直接依赖
    pub fn get(&self, type_name: &str) -> Option<&[TypeName]> {
        self.0.get(type_name).map(Vec::as_slice)
    }

    /// 是否已有该类型的条目
    pub fn contains(&self, type_name: &str) -> bool {
        self.0.contains_key(type_name)
    }

    /// 写入类型的依赖条目
    pub fn insert(&mut self, type_name: TypeName, dependencies: Vec<TypeName>) {
        self.0.insert(type_name, dependencies);
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按类型名称顺序遍历条目
    pub fn iter(&self) -> impl Iterator<Item = (&TypeName, &Vec<TypeName>)> {
        self.0.iter()
    }
}

impl From<BTreeMap<TypeName, Vec<TypeName>>> for DependencyGraph {
    fn from(map: BTreeMap<TypeName, Vec<TypeName>>) -> Self {
        Self(map)
    }
}

impl FromIterator<(TypeName, Vec<TypeName>)> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = (TypeName, Vec<TypeName>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
