/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateGroupDto {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub max_members: Option<u32>,
}
