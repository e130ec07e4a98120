//! # 依赖注入具体实现
//!
//! 提供依赖注入容器、类型目录、依赖图构建器以及方法拦截运行时
//!
//! ## 核心组件
//!
//! - [`Container`] - 依赖注入容器
//! - [`TypeCatalog`] - 默认的类型内省实现
//! - [`DependencyGraphBuilder`] - 依赖图构建与循环依赖检测
//! - [`InterceptorRegistry`] / [`InterceptionPipeline`] / [`ProxyFactory`] - 方法拦截
//! - [`ContainerSettings`] - 容器配置
//!
//! ## 示例
//!
//! ```
//! use di_impl::{Container, TypeCatalog};
//! use infrastructure_common::TypeDescriptor;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(TypeCatalog::new());
//! catalog.register(TypeDescriptor::interface("Greeter"));
//!
//! let container = Container::new(catalog);
//! assert!(container.resolve("Greeter").is_err());
//! ```

pub mod catalog;
pub mod container;
pub mod graph;
pub mod interception;
pub mod registry;
pub mod settings;
pub mod snapshot;

pub use catalog::TypeCatalog;
pub use container::{Container, ContainerBuilder};
pub use graph::DependencyGraphBuilder;
pub use interception::{
    InterceptionPipeline, InterceptorRegistry, Proxy, ProxyFactory, ProxyType,
};
pub use registry::Registry;
pub use settings::ContainerSettings;
pub use snapshot::ContainerSnapshot;
