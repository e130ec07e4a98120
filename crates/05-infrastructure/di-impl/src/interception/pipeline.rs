//! 拦截执行管道

use super::registry::InterceptorRegistry;
use di_abstractions::InterceptionContext;
use infrastructure_common::{Arguments, MethodResult};
use std::sync::Arc;

/// 拦截执行管道
///
/// 执行顺序:
/// 1. 按注册顺序调用 before 钩子，`call_next(false)` 后停止
/// 2. 仍允许继续时执行真实调用，失败被记录到上下文而不是立即返回
/// 3. 从第一个拦截器重新开始调用 after 钩子，`call_next(false)` 后停止
/// 4. 上下文中有失败时返回该失败，否则返回上下文中的返回值
#[derive(Debug, Clone)]
pub struct InterceptionPipeline {
    interceptors: Arc<InterceptorRegistry>,
}

impl InterceptionPipeline {
    /// 创建拦截管道
    pub fn new(interceptors: Arc<InterceptorRegistry>) -> Self {
        Self { interceptors }
    }

    /// 拦截器注册表
    pub fn interceptors(&self) -> &Arc<InterceptorRegistry> {
        &self.interceptors
    }

    /// 围绕真实调用执行拦截器
    pub fn run<F>(&self, context: &mut InterceptionContext, proceed: F) -> MethodResult
    where
        F: FnOnce(&mut Arguments) -> MethodResult,
    {
        let interceptors = self.interceptors.get_applicable(context.method());

        for interceptor in interceptors.iter() {
            if !context.should_call_next() {
                break;
            }
            interceptor.on_before_method_call(context);
        }

        if context.should_call_next() {
            match proceed(context.arguments_mut()) {
                Ok(value) => context.set_return_value(value),
                Err(failure) => context.set_failure(failure),
            }
        }

        for interceptor in interceptors.iter() {
            if !context.should_call_next() {
                break;
            }
            interceptor.on_after_method_call(context);
        }

        match context.take_failure() {
            Some(failure) => Err(failure),
            None => Ok(context.take_return_value()),
        }
    }
}
