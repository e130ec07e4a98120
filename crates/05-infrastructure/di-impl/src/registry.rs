//! 类型映射与实例绑定注册表

use infrastructure_common::{Instance, TypeName};
use std::collections::{BTreeMap, HashMap};

/// 注册表
///
/// 仅保存数据，校验由容器负责
#[derive(Debug, Default)]
pub struct Registry {
    mappings: BTreeMap<TypeName, TypeName>,
    instances: HashMap<TypeName, Instance>,
}

impl Registry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有映射恢复
    pub fn with_mappings(mappings: BTreeMap<TypeName, TypeName>) -> Self {
        Self {
            mappings,
            instances: HashMap::new(),
        }
    }

    /// 添加类型映射，后写入的覆盖先写入的
    pub fn add_mapping(&mut self, abstract_type: TypeName, concrete: TypeName) {
        self.mappings.insert(abstract_type, concrete);
    }

    /// 抽象类型映射到的具体类型
    pub fn mapping(&self, abstract_type: &str) -> Option<&TypeName> {
        self.mappings.get(abstract_type)
    }

    /// 全部类型映射
    pub fn mappings(&self) -> &BTreeMap<TypeName, TypeName> {
        &self.mappings
    }

    /// 绑定实例，后写入的覆盖先写入的
    pub fn add_instance(&mut self, abstract_type: TypeName, instance: Instance) {
        self.instances.insert(abstract_type, instance);
    }

    /// 抽象类型绑定的实例
    pub fn instance(&self, abstract_type: &str) -> Option<&Instance> {
        self.instances.get(abstract_type)
    }

    /// 是否存在实例绑定
    pub fn has_instance(&self, abstract_type: &str) -> bool {
        self.instances.contains_key(abstract_type)
    }
}
