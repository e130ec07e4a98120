//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖注入容器与方法拦截层共用的类型与 traits。
//!
//! ## 核心组件
//!
//! - [`Component`] - 运行时对象基础 trait，方法调用按名称分发
//! - [`Injectable`] - 可注入组件 trait，提供类型描述与构造工厂
//! - [`TypeDescriptor`] - 类型元数据，替代运行时反射
//! - [`Value`] / [`Arguments`] - 动态调用使用的值与参数列表
//! - [`DependencyError`] - 依赖注入错误分类
//!
//! ## 设计原则
//!
//! - 构造方式由显式注册（或派生宏生成）的工厂提供
//! - 类型名称按字符串结构比较
//! - 所有共享类型均为 `Send + Sync`

pub mod component;
pub mod errors;
pub mod metadata;
pub mod value;

pub use component::*;
pub use errors::*;
pub use metadata::*;
pub use value::*;
