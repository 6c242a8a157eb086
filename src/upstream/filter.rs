use crate::models::Character;

/// 按来源名称过滤，区分大小写的子串匹配
#[derive(Debug, Clone)]
pub struct OriginFilter {
    marker: String,
}

impl OriginFilter {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn matches(&self, character: &Character) -> bool {
        character.origin.name.contains(&self.marker)
    }

    /// 惰性过滤，不持有状态，可对同一输入重复调用
    pub fn apply<'a>(&'a self, characters: &'a [Character]) -> impl Iterator<Item = &'a Character> {
        characters.iter().filter(move |c| self.matches(c))
    }
}
