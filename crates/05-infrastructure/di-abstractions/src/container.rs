//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::graph::DependencyGraph;
use crate::interceptor::{Interceptor, MethodMatcher};
use infrastructure_common::{
    downcast_instance, Component, DependencyResult, Instance, TypeName,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 依赖注入容器 trait
///
/// 提供类型映射、实例绑定、代理标记与按类型名称的解析
pub trait DiContainer: Send + Sync {
    /// 将抽象类型映射到具体类型
    ///
    /// 具体类型必须是已知的可实例化类，并继承或实现抽象类型（或与之相同）
    fn register_type(
        &mut self,
        abstract_type: &TypeName,
        concrete: &TypeName,
    ) -> DependencyResult<&mut Self>;

    /// 将抽象类型绑定到已有实例，解析时总是返回该实例
    fn register_instance(
        &mut self,
        abstract_type: &TypeName,
        instance: Instance,
    ) -> DependencyResult<&mut Self>;

    /// 标记类型在构造时需要代理
    fn proxy_type(&mut self, type_name: &TypeName) -> &mut Self;

    /// 注册拦截器
    fn register_interceptor(
        &mut self,
        interceptor: Arc<dyn Interceptor>,
        matcher: MethodMatcher,
    ) -> &mut Self;

    /// 按类型名称解析实例
    fn resolve(&self, type_name: &TypeName) -> DependencyResult<Instance>;

    /// 解析并转换为具体类型
    fn resolve_as<T: Component>(&self, type_name: &TypeName) -> DependencyResult<Arc<T>>
    where
        Self: Sized,
    {
        downcast_instance::<T>(self.resolve(type_name)?)
    }

    /// 当前的类型映射
    fn get_mappings(&self) -> BTreeMap<TypeName, TypeName>;

    /// 当前的依赖图快照
    fn get_dependency_graph(&self) -> DependencyGraph;
}
