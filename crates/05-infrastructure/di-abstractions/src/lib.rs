//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义类型内省、依赖解析与方法拦截的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeIntrospector`] - 类型内省接口
//! - [`DiContainer`] - 依赖注入容器接口
//! - [`ObjectBuilder`] - 对象构建器接口（代理工厂实现）
//! - [`Interceptor`] - 方法拦截器接口

pub mod builder;
pub mod container;
pub mod graph;
pub mod interceptor;
pub mod introspector;

pub use builder::*;
pub use container::*;
pub use graph::*;
pub use interceptor::*;
pub use introspector::*;
