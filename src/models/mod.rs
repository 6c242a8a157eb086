// 数据模型
// 上游 API 的记录与分页结构

pub mod character;

pub use character::{Character, LocationRef, Page, PageInfo};
