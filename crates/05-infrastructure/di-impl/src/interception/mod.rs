//! 方法拦截运行时
//!
//! - [`InterceptorRegistry`] - 拦截器绑定与适用性缓存
//! - [`InterceptionPipeline`] - 围绕真实调用执行拦截器
//! - [`ProxyFactory`] - 代理类型合成与实例化

pub mod pipeline;
pub mod proxy;
pub mod registry;

pub use pipeline::InterceptionPipeline;
pub use proxy::{Proxy, ProxyFactory, ProxyType, DEFAULT_PROXY_PREFIX};
pub use registry::{ApplicableInterceptors, InterceptorRegistry};
