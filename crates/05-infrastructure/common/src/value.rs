//! 动态调用使用的值与参数列表

use crate::errors::InvocationError;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// 动态值
///
/// 可廉价克隆的类型擦除值，用于方法参数、返回值与拦截上下文数据
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    /// 包装一个值
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// 按具体类型借用
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// 是否为指定类型
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// 按具体类型克隆取出
    pub fn get<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// 两个值是否指向同一份数据
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Value(..)")
    }
}

/// 按位置排列的方法参数
#[derive(Debug, Clone, Default)]
pub struct Arguments(Vec<Value>);

impl Arguments {
    /// 创建空参数列表
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 获取指定位置的参数
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.0.get(position)
    }

    /// 按具体类型借用指定位置的参数
    pub fn get_as<T: Any>(&self, position: usize) -> Option<&T> {
        self.0.get(position).and_then(Value::downcast_ref::<T>)
    }

    /// 取出必需参数，缺失或类型不符时返回错误
    pub fn required<T: Any + Clone>(
        &self,
        method: &str,
        position: usize,
    ) -> Result<T, InvocationError> {
        let value = self.0.get(position).ok_or(InvocationError::ArgumentCount {
            method: method.to_string(),
            expected: position + 1,
            actual: self.0.len(),
        })?;
        value
            .get::<T>()
            .ok_or_else(|| InvocationError::ArgumentType {
                method: method.to_string(),
                position: position + 1,
                expected: type_name::<T>(),
            })
    }

    /// 取出可选参数，缺失时使用默认值
    pub fn value_or<T, F>(&self, method: &str, position: usize, default: F) -> Result<T, InvocationError>
    where
        T: Any + Clone,
        F: FnOnce() -> T,
    {
        if position < self.0.len() {
            self.required(method, position)
        } else {
            Ok(default())
        }
    }

    /// 覆盖指定位置的参数，超出长度时追加
    pub fn set(&mut self, position: usize, value: Value) {
        if position < self.0.len() {
            self.0[position] = value;
        } else {
            self.0.push(value);
        }
    }

    /// 追加参数
    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Arguments {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 构造参数列表
///
/// ```
/// use infrastructure_common::arguments;
///
/// let args = arguments![1_i64, "name".to_string()];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! arguments {
    () => {
        $crate::Arguments::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Arguments::from(vec![$($crate::Value::new($value)),+])
    };
}
