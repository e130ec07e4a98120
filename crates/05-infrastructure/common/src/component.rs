//! 组件基础接口定义
//!
//! 提供容器中所有运行时对象必须实现的基础 trait

use crate::errors::{DependencyError, MethodResult};
use crate::metadata::{MethodDescriptor, TypeDescriptor, TypeName};
use crate::value::Arguments;
use std::any::Any;
use std::sync::Arc;

/// 容器解析得到的实例
pub type Instance = Arc<dyn Component>;

/// 类型擦除辅助 trait，对所有 `'static` 类型自动实现
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// 组件基础 trait
///
/// 容器构造的对象与代理对象都实现此 trait，方法调用统一经由 [`Component::invoke`]
/// 分发，代理可以据此在调用前后插入拦截器
pub trait Component: AsAny {
    /// 运行时类型名称
    fn type_name(&self) -> TypeName;

    /// 按名称调用方法
    ///
    /// 按引用传递的参数由方法写回 `arguments`
    fn invoke(&self, method: &str, arguments: &mut Arguments) -> MethodResult;

    /// 本类型声明的方法
    fn methods() -> Vec<MethodDescriptor>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

impl dyn Component {
    /// 按具体类型借用
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// 使用按值传入的参数调用方法
    pub fn call(&self, method: &str, arguments: Arguments) -> MethodResult {
        let mut arguments = arguments;
        self.invoke(method, &mut arguments)
    }
}

impl std::fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Component({})", self.type_name())
    }
}

/// 可注入组件 trait
///
/// 通常由 `#[derive(Injectable)]` 生成，提供类型描述与构造工厂
pub trait Injectable: Component + Sized {
    /// 类型名称
    const TYPE_NAME: &'static str;

    /// 类型描述
    fn descriptor() -> TypeDescriptor;
}

/// 从解析得到的实例转换为构造参数
pub trait Inject: Sized {
    fn inject(instance: Instance) -> Result<Self, DependencyError>;
}

impl Inject for Instance {
    fn inject(instance: Instance) -> Result<Self, DependencyError> {
        Ok(instance)
    }
}

impl<T: Component> Inject for Arc<T> {
    fn inject(instance: Instance) -> Result<Self, DependencyError> {
        let actual = instance.type_name();
        instance
            .into_any()
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                expected: std::any::type_name::<T>().to_string(),
                actual,
            })
    }
}

/// 将实例转换为具体类型
pub fn downcast_instance<T: Component>(instance: Instance) -> Result<Arc<T>, DependencyError> {
    <Arc<T> as Inject>::inject(instance)
}
