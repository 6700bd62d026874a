#[derive(Debug, Clone)]
pub struct CreateGroupDto {
    pub title: String,
    pub subject: String,
    pub description: String,
    pub image: Option<String>,
    pub max_members: Option<u32>,
}
