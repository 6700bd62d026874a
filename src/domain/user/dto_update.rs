#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub name: Option<String>,
    pub contact_number: Option<String>,
}
