//! 实例生命周期定义

/// 实例生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// 共享模式（单例）- 在所属对象管理器的生命周期内只创建一个实例
    Shared,
    /// 瞬时模式 - 每次请求都创建新实例
    Transient,
}

impl Lifetime {
    /// 从配置中的共享标记转换
    pub fn from_shared_flag(shared: bool) -> Self {
        if shared {
            Self::Shared
        } else {
            Self::Transient
        }
    }

    /// 是否为共享生命周期
    pub fn is_shared(self) -> bool {
        matches!(self, Self::Shared)
    }
}
