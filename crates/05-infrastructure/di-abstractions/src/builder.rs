//! 对象构建器抽象接口
//!
//! 容器对标记为需要代理的类型不直接构造，而是交给对象构建器

use infrastructure_common::{DependencyResult, Instance, TypeDescriptor};

/// 对象构建器 trait
pub trait ObjectBuilder: Send + Sync {
    /// 使用构造参数动态创建给定类的实例
    fn build(&self, class: &TypeDescriptor, arguments: Vec<Instance>) -> DependencyResult<Instance>;
}
