/// 存储库实现
pub mod character;
