use serde::{Deserialize, Serialize};

use crate::models::Character;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Id,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

// 列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct CharacterQuery {
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub order: SortOrder,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// 分页后的展示结果
#[derive(Debug, Serialize, Deserialize)]
pub struct CharacterPage {
    pub items: Vec<Character>,
    pub total: usize,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}

impl CharacterQuery {
    pub fn validate(&self) -> Result<(u32, u32), String> {
        let page = self.page.unwrap_or(1);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 {
            return Err("page must be >= 1".into());
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(format!("size must be between 1 and {}", MAX_PAGE_SIZE));
        }
        Ok((page, size))
    }
}

impl CharacterPage {
    /// 对聚合结果排序并取出一页
    pub fn build(mut characters: Vec<Character>, query: &CharacterQuery, page: u32, size: u32) -> Self {
        characters.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Name => a.name.cmp(&b.name).then(a.id.cmp(&b.id)),
            };
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = characters.len();
        let pages = total.div_ceil(size as usize) as u32;
        let offset = (page as usize - 1).saturating_mul(size as usize);
        let items = characters.into_iter().skip(offset).take(size as usize).collect();

        CharacterPage {
            items,
            total,
            page,
            size,
            pages,
        }
    }
}
