//! 方法拦截抽象接口
//!
//! 代理类型的方法被调用时，与该方法匹配的每个拦截器都会在真实调用前后被触发

use infrastructure_common::{Arguments, Instance, MethodDescriptor, MethodFailure, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 拦截器 trait
pub trait Interceptor: Send + Sync {
    /// 在方法调用前触发
    fn on_before_method_call(&self, context: &mut InterceptionContext);

    /// 在方法调用后触发
    fn on_after_method_call(&self, context: &mut InterceptionContext);
}

/// 方法匹配谓词
pub type MethodMatcher = Arc<dyn Fn(&MethodDescriptor) -> bool + Send + Sync>;

/// 拦截上下文
///
/// 每次调用创建一次，拦截器之间通过它共享数据、修改返回值或失败，
/// 也可以通过 [`InterceptionContext::call_next`] 中止后续拦截器与真实调用
#[derive(Debug)]
pub struct InterceptionContext {
    target: Option<Instance>,
    method: MethodDescriptor,
    arguments: Arguments,
    data: BTreeMap<String, Value>,
    next_index: usize,
    call_next: bool,
    failure: Option<MethodFailure>,
    return_value: Option<Value>,
}

impl InterceptionContext {
    /// 创建新的拦截上下文，静态方法没有目标实例
    pub fn new(target: Option<Instance>, method: MethodDescriptor, arguments: Arguments) -> Self {
        Self {
            target,
            method,
            arguments,
            data: BTreeMap::new(),
            next_index: 0,
            call_next: true,
            failure: None,
            return_value: None,
        }
    }

    /// 目标实例，静态方法调用时为 `None`
    pub fn target(&self) -> Option<&Instance> {
        self.target.as_ref()
    }

    /// 被调用的方法
    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// 当前参数
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// 可修改的参数，修改会传递给真实调用
    pub fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.arguments
    }

    /// 取出参数
    pub fn into_arguments(self) -> Arguments {
        self.arguments
    }

    /// 获取共享数据
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// 获取全部共享数据
    pub fn all_data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// 设置共享数据，数字键会推进自动索引
    pub fn set_datum(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Ok(index) = key.parse::<usize>() {
            self.next_index = self.next_index.max(index + 1);
        }
        self.data.insert(key, value);
    }

    /// 以自动递增的数字键追加共享数据，返回使用的键
    pub fn push_datum(&mut self, value: Value) -> String {
        let key = self.next_index.to_string();
        self.set_datum(key.clone(), value);
        key
    }

    /// 设置是否继续执行后续拦截器与真实调用
    pub fn call_next(&mut self, should_call_next: bool) {
        self.call_next = should_call_next;
    }

    /// 是否继续调用后续拦截器与真实方法
    pub fn should_call_next(&self) -> bool {
        self.call_next
    }

    /// 捕获的失败
    pub fn failure(&self) -> Option<&MethodFailure> {
        self.failure.as_ref()
    }

    /// 设置失败，拦截链结束后重新抛出
    pub fn set_failure(&mut self, failure: MethodFailure) {
        self.failure = Some(failure);
    }

    /// 取出并清除失败
    pub fn take_failure(&mut self) -> Option<MethodFailure> {
        self.failure.take()
    }

    /// 返回值
    pub fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }

    /// 设置返回值，`None` 表示无返回值
    pub fn set_return_value(&mut self, value: impl Into<Option<Value>>) {
        self.return_value = value.into();
    }

    /// 取出返回值
    pub fn take_return_value(&mut self) -> Option<Value> {
        self.return_value.take()
    }
}
