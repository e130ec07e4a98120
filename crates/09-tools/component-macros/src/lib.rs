//! # Component Macros
//!
//! 这个 crate 提供了在编译时生成类型描述与方法分发的过程宏，
//! 容器据此完成构造函数注入与代理拦截，无需运行时反射。
//!
//! ## 核心宏
//!
//! - [`Injectable`] - 生成类型描述、构造参数与构造工厂
//! - [`component_methods`] - 生成方法描述与 `Component::invoke` 分发
//!
//! ## 使用示例
//!
//! ```rust
//! use component_macros::{component_methods, Injectable};
//! use infrastructure_common::{Component, Injectable};
//! use std::sync::Arc;
//!
//! #[derive(Injectable, Default)]
//! pub struct Clock;
//!
//! #[component_methods]
//! impl Clock {
//!     pub fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! #[derive(Injectable)]
//! #[injectable(name = "app::Greeter")]
//! pub struct Greeter {
//!     #[inject]
//!     clock: Arc<Clock>,
//!     greeting: String,
//! }
//!
//! #[component_methods]
//! impl Greeter {
//!     pub fn greet(&self, #[default("world".to_string())] name: &str) -> String {
//!         format!("{}{} @{}", self.greeting, name, self.clock.now())
//!     }
//! }
//!
//! let descriptor = Greeter::descriptor();
//! assert_eq!(descriptor.name.as_str(), "app::Greeter");
//! assert_eq!(descriptor.constructor.unwrap().parameters[0].name, "clock");
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod methods;
mod utils;

/// 可注入组件派生宏
///
/// 为结构体实现 `Injectable`：带 `#[inject]` 的字段按声明顺序成为构造参数，
/// 其余字段使用 `Default::default()`。没有注入字段且未指定 `constructor` 时
/// 视为未声明构造函数。
///
/// # 类型参数
///
/// - `name = "类型名称"` - 类型名称（默认为结构体名称）
/// - `extends = "父类"` - 父类
/// - `implements = "A, B"` - 实现的接口
/// - `sealed` - final 类型，不可被代理
/// - `constructor = "public" | "protected" | "private"` - 构造函数可见性
///
/// # 字段参数
///
/// - `#[inject]` - 从 `Arc<T>` 推断依赖类型
/// - `#[inject("类型名称")]` - 显式指定依赖类型，字段类型实现 `Inject` 即可
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Injectable)]
/// #[injectable(implements = "app::Repository")]
/// pub struct SqlRepository {
///     #[inject("app::Connection")]
///     connection: Instance,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
}

/// 组件方法宏
///
/// 用于固有 impl 块，为其中的 `pub` 方法实现 `Component`：
/// 生成方法描述（`Component::methods`）与按名称分发的 `Component::invoke`。
/// 类型还需要实现 `Injectable`。
///
/// # 方法属性
///
/// - `#[sealed]` - final 方法，代理不会拦截
/// - `#[skip]` - 不对外分发
///
/// # 参数属性
///
/// - `#[default(表达式)]` - 可选参数的默认值
///
/// `&mut T` 参数视为按引用传递，调用后写回参数列表。
#[proc_macro_attribute]
pub fn component_methods(args: TokenStream, input: TokenStream) -> TokenStream {
    methods::component_methods_impl(args, input)
}
