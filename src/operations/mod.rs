// 业务操作
// 抓取、过滤、持久化、缓存的编排

pub mod characters;

pub use characters::CharacterService;
