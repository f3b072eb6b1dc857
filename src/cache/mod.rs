//! 对象缓存层
//!
//! 通过名称注册缓存后端（moka / redis），启动时按配置选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法确定键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    /// 按键读取原始字符串
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// 写入原始字符串，`ttl` 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
    /// 后端名称，用于系统信息展示
    fn backend_name(&self) -> &'static str;
}

/// 声明一个缓存插件，生成 `register()` 函数把构造器放入注册表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        match <$ty>::new() {
                            Ok(cache) => Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>),
                            Err(e) => Err($crate::errors::SchoolSysError::cache_connection(e)),
                        }
                    })
                }),
            );
        }
    };
}
